//! Live preview of captured frames.
//!
//! Two implementations of [`Preview`] exist:
//! - [`HeadlessPreview`] - no window; "closing" it means pressing Ctrl+C
//! - `HighguiPreview` - an OpenCV highgui window (`highgui` feature)

mod headless;
#[cfg(feature = "highgui")]
mod highgui;

use std::time::Duration;

use crate::camera::Frame;

pub use headless::HeadlessPreview;
#[cfg(feature = "highgui")]
pub use highgui::HighguiPreview;

/// Key code reported by [`Preview::poll_key`] for the Escape key.
pub const KEY_ESCAPE: i32 = 27;

/// Default title of the preview window.
pub const DEFAULT_WINDOW_TITLE: &str = "CSI Camera";

/// Errors raised by a preview surface.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Failed to create preview window: {0}")]
    CreateFailed(String),
    #[error("Failed to display frame: {0}")]
    ShowFailed(String),
    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// A display surface the grab loop shows frames on and polls keys from.
///
/// Creating the window is the implementor's constructor.
pub trait Preview {
    /// Whether the window still exists. Checked at the top of every iteration.
    fn is_open(&self) -> bool;

    /// Display a frame.
    fn show(&mut self, frame: &Frame) -> Result<(), PreviewError>;

    /// Wait up to `timeout` for a key press and return its code (masked to 8 bits).
    fn poll_key(&mut self, timeout: Duration) -> Option<i32>;

    /// Destroy all windows. Calling this more than once must be harmless.
    fn close(&mut self);
}

impl<P: Preview + ?Sized> Preview for Box<P> {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn show(&mut self, frame: &Frame) -> Result<(), PreviewError> {
        (**self).show(frame)
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<i32> {
        (**self).poll_key(timeout)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Open the preview surface for this run.
///
/// A highgui window is used when `windowed` is set and the crate was built
/// with the `highgui` feature; otherwise the run is headless.
pub fn open_preview(windowed: bool, title: &str) -> Result<Box<dyn Preview>, PreviewError> {
    #[cfg(feature = "highgui")]
    if windowed {
        return Ok(Box::new(HighguiPreview::open(title)?));
    }

    #[cfg(not(feature = "highgui"))]
    if windowed {
        log::warn!(
            "built without the `highgui` feature; running headless instead of opening '{}'",
            title
        );
    }
    Ok(Box::new(HeadlessPreview::new()?))
}
