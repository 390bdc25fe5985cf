//! Camera enumeration and index lookup.

use super::types::{CameraError, CameraInfo};

/// Enumerate the cameras the capture backend can see.
///
/// An empty list is not an error here; [`find_device`] turns it into
/// [`CameraError::NoDevices`] when a camera is actually needed.
#[cfg(feature = "webcam")]
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    use nokhwa::query;
    use nokhwa::utils::ApiBackend;

    let devices = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

    // Devices addressed by path or name have no numeric index to open them by.
    Ok(devices
        .into_iter()
        .filter_map(|d| {
            let index = d.index().as_index().ok()?;
            Some(CameraInfo {
                index,
                name: d.human_name(),
                description: d.description().to_string(),
            })
        })
        .collect())
}

#[cfg(not(feature = "webcam"))]
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    log::debug!("built without the `webcam` feature; no devices to list");
    Ok(Vec::new())
}

/// Pick the camera with `index` out of `devices`.
pub fn find_device(devices: &[CameraInfo], index: u32) -> Result<&CameraInfo, CameraError> {
    if devices.is_empty() {
        return Err(CameraError::NoDevices);
    }
    devices
        .iter()
        .find(|d| d.index == index)
        .ok_or(CameraError::DeviceNotFound(index))
}
