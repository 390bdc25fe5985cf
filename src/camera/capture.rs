//! nokhwa-backed webcam.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use super::device::{find_device, list_devices};
use super::frame_utils::{convert_to_rgb, mirror_horizontal};
use super::source::FrameSource;
use super::types::{CameraError, CameraSettings, Frame};

/// An open webcam stream.
///
/// The stream is started by [`Webcam::open`] and stopped by
/// [`FrameSource::release`] or on drop, whichever comes first.
pub struct Webcam {
    camera: Camera,
    settings: CameraSettings,
    released: bool,
}

impl std::fmt::Debug for Webcam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webcam")
            .field("settings", &self.settings)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Webcam {
    /// Open the camera at `settings.device_index` and start streaming.
    ///
    /// # Errors
    /// * `CameraError::NoDevices` - If no camera is connected at all
    /// * `CameraError::DeviceNotFound` - If the device index doesn't exist
    /// * `CameraError::PermissionDenied` - If camera access is denied (macOS)
    /// * `CameraError::OpenFailed` - If camera fails to open for other reasons
    /// * `CameraError::StreamFailed` - If the camera stream fails to start
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        let device = find_device(&devices, settings.device_index)?;
        log::debug!("opening {}", device);

        let index = CameraIndex::Index(settings.device_index);
        let mut camera = open_camera_with_fallback(&index)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let res = camera.resolution();
        log::info!(
            "opened camera {} at {}x{} @ {} fps",
            settings.device_index,
            res.width(),
            res.height(),
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            settings,
            released: false,
        })
    }
}

impl FrameSource for Webcam {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        if self.released {
            return Err(CameraError::ReadFailed("camera already released".to_string()));
        }
        let raw = self
            .camera
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;
        let mut frame = convert_to_rgb(&raw)
            .ok_or_else(|| CameraError::ReadFailed("could not decode frame".to_string()))?;
        if self.settings.mirror {
            mirror_horizontal(&mut frame);
        }
        Ok(frame)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("failed to stop camera stream: {}", e);
        }
        log::debug!("released camera {}", self.settings.device_index);
    }
}

impl Drop for Webcam {
    fn drop(&mut self) {
        self.release();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(index: &CameraIndex) -> Result<Camera, CameraError> {
    // 1. Whatever the driver considers its default format
    // 2. Highest frame rate available
    // 3. Highest resolution available
    let format_attempts = [
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("camera format attempt failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    let msg = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no format could be negotiated".to_string());
    let lower = msg.to_lowercase();
    if lower.contains("permission")
        || lower.contains("denied")
        || lower.contains("authorization")
        || lower.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(msg))
    }
}
