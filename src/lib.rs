//! frame-grabber library crate.
//!
//! Captures frames from a webcam, saves each one as `image_<n>.png` and shows
//! a live preview until the window is closed or Escape is pressed.
//!
//! The binary wires these modules together; they are exposed here for
//! integration testing with scripted devices and previews.

pub mod camera;
pub mod cli;
pub mod config;
pub mod grabber;
pub mod preview;
pub mod storage;
