//! Camera module for webcam access and frame capture.
//!
//! - Device enumeration via [`list_devices`]
//! - Opening a device via [`open_camera`]
//! - The [`FrameSource`] trait the grab loop reads from

#[cfg(feature = "webcam")]
mod capture;
mod device;
mod frame_utils;
mod source;
mod types;

#[cfg(feature = "webcam")]
pub use capture::Webcam;
pub use device::{find_device, list_devices};
pub use frame_utils::mirror_horizontal;
pub use source::FrameSource;
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, FrameFormat};

/// Open the capture device described by `settings`.
#[cfg(feature = "webcam")]
pub fn open_camera(settings: CameraSettings) -> Result<Box<dyn FrameSource>, CameraError> {
    Ok(Box::new(Webcam::open(settings)?))
}

/// Open the capture device described by `settings`.
///
/// This build has no capture backend, so opening always fails.
#[cfg(not(feature = "webcam"))]
pub fn open_camera(settings: CameraSettings) -> Result<Box<dyn FrameSource>, CameraError> {
    Err(CameraError::OpenFailed(format!(
        "device {}: built without the `webcam` feature",
        settings.device_index
    )))
}
