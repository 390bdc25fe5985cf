//! The capture-device seam used by the grab loop.

use super::types::{CameraError, Frame};

/// A source of frames that is owned by exactly one grab loop.
///
/// Opening happens in the implementor's constructor; a value of this type
/// always refers to an open device.
pub trait FrameSource {
    /// Read the next frame from the device, blocking until one is available.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Release the device. Calling this more than once must be harmless.
    fn release(&mut self);
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}
