//! OpenCV highgui preview window.

use std::time::Duration;

use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use super::{Preview, PreviewError};
use crate::camera::Frame;

/// A named highgui window.
#[derive(Debug)]
pub struct HighguiPreview {
    title: String,
    closed: bool,
}

impl HighguiPreview {
    /// Create the window. It is auto-sized to the first frame shown.
    pub fn open(title: &str) -> Result<Self, PreviewError> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)
            .map_err(|e| PreviewError::CreateFailed(e.to_string()))?;
        log::debug!("created preview window '{}'", title);
        Ok(Self {
            title: title.to_string(),
            closed: false,
        })
    }
}

impl Preview for HighguiPreview {
    fn is_open(&self) -> bool {
        if self.closed {
            return false;
        }
        // A destroyed window reports a negative property value (or an error).
        highgui::get_window_property(&self.title, highgui::WND_PROP_FULLSCREEN)
            .map(|value| value >= 0.0)
            .unwrap_or(false)
    }

    fn show(&mut self, frame: &Frame) -> Result<(), PreviewError> {
        let mat = frame_to_bgr_mat(frame).map_err(|e| PreviewError::ShowFailed(e.to_string()))?;
        highgui::imshow(&self.title, &mat).map_err(|e| PreviewError::ShowFailed(e.to_string()))
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<i32> {
        // wait_key(0) blocks forever, so never pass zero.
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        match highgui::wait_key(delay) {
            Ok(code) if code >= 0 => Some(code & 0xFF),
            Ok(_) => None,
            Err(e) => {
                log::warn!("key poll failed: {}", e);
                None
            }
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("failed to destroy preview windows: {}", e);
        }
    }
}

impl Drop for HighguiPreview {
    fn drop(&mut self) {
        self.close();
    }
}

/// Copy an RGB frame into a BGR `Mat`, the channel order highgui expects.
fn frame_to_bgr_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height as i32,
        frame.width as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    let bytes = mat.data_bytes_mut()?;
    for (dst, src) in bytes.chunks_exact_mut(3).zip(frame.data.chunks_exact(3)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
    }
    Ok(mat)
}
