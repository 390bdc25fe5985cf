//! The frame grabbing loop.
//!
//! One iteration reads a frame, saves it as `image_<n>.png`, shows it, polls
//! for Escape and then pauses. The loop runs until the preview window goes
//! away, Escape is pressed, or a fatal error occurs. The capture device and
//! the preview are released by a guard on every exit path.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::camera::{CameraError, FrameSource};
use crate::preview::{Preview, PreviewError, KEY_ESCAPE};
use crate::storage::{FrameStore, StorageError};

/// Default pause between captures.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Default time to wait for a key press each iteration.
pub const DEFAULT_KEY_TIMEOUT: Duration = Duration::from_millis(30);

/// What to do when a frame cannot be read from an open device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFailurePolicy {
    /// Log the failure, pause and try again. No file is written and the
    /// frame counter is not advanced.
    #[default]
    Skip,
    /// Stop the loop with [`GrabError::FrameRead`].
    Abort,
}

impl FromStr for ReadFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "Unknown read failure policy '{}'. Use 'skip' or 'abort'",
                other
            )),
        }
    }
}

/// Timing and failure handling of the grab loop.
#[derive(Debug, Clone)]
pub struct GrabSettings {
    /// Pause after each iteration
    pub interval: Duration,
    /// How long to wait for a key press each iteration
    pub key_timeout: Duration,
    /// Handling of frames that fail to read
    pub on_read_failure: ReadFailurePolicy,
}

impl Default for GrabSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            key_timeout: DEFAULT_KEY_TIMEOUT,
            on_read_failure: ReadFailurePolicy::default(),
        }
    }
}

/// State of a grab session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    /// Device open, window valid
    Running,
    /// Terminal
    Stopped,
}

/// Why a grab session ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The preview window was closed (or Ctrl+C in headless mode)
    WindowClosed,
    /// The Escape key was pressed
    EscapePressed,
    /// The capture device could not be opened; the loop never ran
    DeviceOpenFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::WindowClosed => write!(f, "window closed"),
            StopReason::EscapePressed => write!(f, "escape pressed"),
            StopReason::DeviceOpenFailed => write!(f, "unable to open camera"),
        }
    }
}

/// Outcome of a grab session that ended cleanly.
#[derive(Debug)]
pub struct GrabSummary {
    /// Files written, in capture order
    pub saved: Vec<PathBuf>,
    pub stop_reason: StopReason,
    /// Frames that failed to read and were skipped
    pub skipped: u64,
    /// Set when `stop_reason` is `DeviceOpenFailed`
    pub open_error: Option<CameraError>,
}

impl GrabSummary {
    pub fn frames_saved(&self) -> usize {
        self.saved.len()
    }
}

/// Fatal errors of a grab session.
#[derive(Debug, thiserror::Error)]
pub enum GrabError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Preview(#[from] PreviewError),
    #[error("Aborting after failed frame read: {0}")]
    FrameRead(CameraError),
}

/// Owns the device and the preview for the duration of the loop and
/// releases both when dropped.
struct Session<S: FrameSource, P: Preview> {
    source: S,
    preview: P,
}

impl<S: FrameSource, P: Preview> Drop for Session<S, P> {
    fn drop(&mut self) {
        self.source.release();
        self.preview.close();
        log::debug!("released capture device and closed preview");
    }
}

/// Drives one grab session.
#[derive(Debug, Clone, Default)]
pub struct FrameGrabber {
    settings: GrabSettings,
}

impl FrameGrabber {
    pub fn new(settings: GrabSettings) -> Self {
        Self { settings }
    }

    /// Run a full session writing into `output_dir`.
    ///
    /// The output directory is created first. `open_source` is then called
    /// once; if it fails, the session ends with
    /// [`StopReason::DeviceOpenFailed`] without calling `open_preview`.
    /// Otherwise `open_preview` creates the window and the loop runs.
    pub fn run<S, P, OS, OP>(
        &self,
        output_dir: impl Into<PathBuf>,
        open_source: OS,
        open_preview: OP,
    ) -> Result<GrabSummary, GrabError>
    where
        S: FrameSource,
        P: Preview,
        OS: FnOnce() -> Result<S, CameraError>,
        OP: FnOnce() -> Result<P, PreviewError>,
    {
        let store = FrameStore::create(output_dir)?;

        let source = match open_source() {
            Ok(source) => source,
            Err(e) => {
                log::error!("{}", e);
                return Ok(GrabSummary {
                    saved: Vec::new(),
                    stop_reason: StopReason::DeviceOpenFailed,
                    skipped: 0,
                    open_error: Some(e),
                });
            }
        };

        // release() is idempotent, so sources that also release on drop are fine.
        let preview = match open_preview() {
            Ok(preview) => preview,
            Err(e) => {
                let mut source = source;
                source.release();
                return Err(e.into());
            }
        };

        let mut session = Session { source, preview };
        self.grab_loop(&store, &mut session)
    }

    fn grab_loop<S: FrameSource, P: Preview>(
        &self,
        store: &FrameStore,
        session: &mut Session<S, P>,
    ) -> Result<GrabSummary, GrabError> {
        let mut counter: u64 = 0;
        let mut saved = Vec::new();
        let mut skipped = 0;
        let mut state = GrabState::Running;
        let mut stop_reason = StopReason::WindowClosed;

        while state == GrabState::Running {
            if !session.preview.is_open() {
                stop_reason = StopReason::WindowClosed;
                state = GrabState::Stopped;
                continue;
            }

            let frame = session
                .source
                .read_frame()
                .and_then(|frame| {
                    if frame.is_complete() {
                        Ok(frame)
                    } else {
                        Err(CameraError::ReadFailed(format!(
                            "incomplete {}x{} frame ({} bytes)",
                            frame.width,
                            frame.height,
                            frame.data.len()
                        )))
                    }
                });
            let frame = match (frame, self.settings.on_read_failure) {
                (Ok(frame), _) => frame,
                (Err(e), ReadFailurePolicy::Skip) => {
                    log::warn!("skipping frame: {}", e);
                    skipped += 1;
                    // The key poll also pumps window events, so it runs on every pass.
                    if session.preview.poll_key(self.settings.key_timeout) == Some(KEY_ESCAPE) {
                        log::info!("escape pressed, stopping");
                        stop_reason = StopReason::EscapePressed;
                        state = GrabState::Stopped;
                        continue;
                    }
                    thread::sleep(self.settings.interval);
                    continue;
                }
                (Err(e), ReadFailurePolicy::Abort) => return Err(GrabError::FrameRead(e)),
            };

            let path = store.save(&frame, counter)?;
            log::debug!(
                "frame {} saved {:?} after capture",
                counter,
                frame.timestamp.elapsed()
            );
            saved.push(path);

            if let Err(e) = session.preview.show(&frame) {
                log::warn!("{}", e);
            }

            if session.preview.poll_key(self.settings.key_timeout) == Some(KEY_ESCAPE) {
                log::info!("escape pressed, stopping");
                stop_reason = StopReason::EscapePressed;
                state = GrabState::Stopped;
                continue;
            }

            counter += 1;
            thread::sleep(self.settings.interval);
        }

        log::info!(
            "saved {} frame(s) to {} ({})",
            saved.len(),
            store.dir().display(),
            stop_reason
        );
        Ok(GrabSummary {
            saved,
            stop_reason,
            skipped,
            open_error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_settings_default() {
        let settings = GrabSettings::default();
        assert_eq!(settings.interval, Duration::from_millis(1000));
        assert_eq!(settings.key_timeout, Duration::from_millis(30));
        assert_eq!(settings.on_read_failure, ReadFailurePolicy::Skip);
    }

    #[test]
    fn test_read_failure_policy_from_str() {
        assert_eq!("skip".parse::<ReadFailurePolicy>(), Ok(ReadFailurePolicy::Skip));
        assert_eq!("ABORT".parse::<ReadFailurePolicy>(), Ok(ReadFailurePolicy::Abort));
        assert!("retry".parse::<ReadFailurePolicy>().is_err());
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::WindowClosed.to_string(), "window closed");
        assert_eq!(StopReason::EscapePressed.to_string(), "escape pressed");
        assert_eq!(
            StopReason::DeviceOpenFailed.to_string(),
            "unable to open camera"
        );
    }
}
