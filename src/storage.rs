//! Output directory handling and PNG persistence of frames.

use std::io;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::camera::{Frame, FrameFormat};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "raw_images";

/// Errors raised while preparing the output directory or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create output directory '{}': {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Frame buffer does not match its {width}x{height} dimensions")]
    InvalidFrame { width: u32, height: u32 },
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// File name of the frame with sequence number `index`.
pub fn frame_file_name(index: u64) -> String {
    format!("image_{}.png", index)
}

/// A directory that captured frames are written into.
///
/// The directory exists once a `FrameStore` has been created.
#[derive(Debug, Clone)]
pub struct FrameStore {
    dir: PathBuf,
}

impl FrameStore {
    /// Create `dir` (and any missing parents) if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        log::debug!("saving frames to {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the frame with sequence number `index` is written to.
    pub fn path_for(&self, index: u64) -> PathBuf {
        self.dir.join(frame_file_name(index))
    }

    /// Encode `frame` as PNG at [`FrameStore::path_for`]`(index)`.
    pub fn save(&self, frame: &Frame, index: u64) -> Result<PathBuf, StorageError> {
        let invalid = || StorageError::InvalidFrame {
            width: frame.width,
            height: frame.height,
        };
        if !frame.is_complete() {
            return Err(invalid());
        }
        let image = match frame.format {
            FrameFormat::Rgb => RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
                .ok_or_else(invalid)?,
        };

        let path = self.path_for(index);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(0), "image_0.png");
        assert_eq!(frame_file_name(42), "image_42.png");
    }

    #[test]
    fn test_create_makes_missing_parents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("a").join("b").join("raw_images");

        let store = FrameStore::create(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());

        // Creating again is fine
        FrameStore::create(&nested).unwrap();
    }

    #[test]
    fn test_create_fails_on_file_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();

        let err = FrameStore::create(&file).unwrap_err();
        assert!(matches!(err, StorageError::CreateDir { .. }));
    }

    #[test]
    fn test_save_writes_decodable_png() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FrameStore::create(temp_dir.path()).unwrap();
        let frame = Frame::rgb(vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 9, 9, 9], 2, 2);

        let path = store.save(&frame, 7).unwrap();
        assert_eq!(path, temp_dir.path().join("image_7.png"));

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.into_raw(), frame.data);
    }

    #[test]
    fn test_save_rejects_incomplete_frame() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FrameStore::create(temp_dir.path()).unwrap();
        let frame = Frame::rgb(vec![0; 4], 2, 2);

        let err = store.save(&frame, 0).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFrame { width: 2, height: 2 }));
        assert!(!store.path_for(0).exists());
    }
}
