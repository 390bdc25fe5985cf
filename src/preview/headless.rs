//! Window-less preview stopped with Ctrl+C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{Preview, PreviewError};
use crate::camera::Frame;

/// Stands in for a window when none can or should be shown.
///
/// The "window" stays open until the interrupt flag is raised, which the
/// Ctrl+C handler installed by [`HeadlessPreview::new`] does.
#[derive(Debug)]
pub struct HeadlessPreview {
    interrupted: Arc<AtomicBool>,
    closed: bool,
}

impl HeadlessPreview {
    /// Create a headless preview and install the Ctrl+C handler.
    ///
    /// The handler can only be installed once per process.
    pub fn new() -> Result<Self, PreviewError> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            eprintln!("\nReceived Ctrl+C, shutting down...");
        })?;
        log::info!("running headless, press Ctrl+C to stop");
        Ok(Self::with_flag(interrupted))
    }

    /// Create a headless preview driven by an externally owned flag.
    pub fn with_flag(interrupted: Arc<AtomicBool>) -> Self {
        Self {
            interrupted,
            closed: false,
        }
    }
}

impl Preview for HeadlessPreview {
    fn is_open(&self) -> bool {
        !self.closed && !self.interrupted.load(Ordering::SeqCst)
    }

    fn show(&mut self, frame: &Frame) -> Result<(), PreviewError> {
        log::debug!("captured {}x{} frame", frame.width, frame.height);
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<i32> {
        thread::sleep(timeout);
        None
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_until_interrupted() {
        let flag = Arc::new(AtomicBool::new(false));
        let preview = HeadlessPreview::with_flag(Arc::clone(&flag));
        assert!(preview.is_open());

        flag.store(true, Ordering::SeqCst);
        assert!(!preview.is_open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut preview = HeadlessPreview::with_flag(Arc::new(AtomicBool::new(false)));
        preview.close();
        preview.close();
        assert!(!preview.is_open());
    }

    #[test]
    fn test_poll_key_never_reports_a_key() {
        let mut preview = HeadlessPreview::with_flag(Arc::new(AtomicBool::new(false)));
        assert_eq!(preview.poll_key(Duration::ZERO), None);
    }
}
