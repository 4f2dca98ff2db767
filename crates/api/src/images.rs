//! On-disk store for todo images.
//!
//! Uploads are validated (MIME type, byte limit), decoded, downsized to fit
//! within 800x600 without enlarging, re-encoded as JPEG quality 80 and
//! written under a collision-resistant name. Deletion is idempotent and
//! never blocks the caller's primary operation.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tasca_core::error::CoreError;

/// MIME types accepted for upload.
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Bounding box uploaded images are resized to fit within.
const MAX_WIDTH: u32 = 800;
const MAX_HEIGHT: u32 = 600;

/// Quality for the JPEG re-encode.
const JPEG_QUALITY: u8 = 80;

/// Stores processed todo images under a configured directory.
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Check an upload's declared MIME type and size.
    ///
    /// Callers run this before opening a transaction or touching the disk
    /// so rejected uploads leave no trace.
    pub fn validate(&self, mime: &str, len: usize) -> Result<(), CoreError> {
        if !ALLOWED_MIME_TYPES.contains(&mime) {
            return Err(CoreError::Validation(
                "Only PNG, JPG, and JPEG images are allowed".to_string(),
            ));
        }
        if len > self.max_bytes {
            let limit_mb = self.max_bytes / (1024 * 1024);
            return Err(CoreError::Validation(format!(
                "Image size must be {limit_mb}MB or less"
            )));
        }
        Ok(())
    }

    /// Process and persist an upload, returning the stored file name.
    ///
    /// The image is resized to fit within 800x600 preserving aspect ratio
    /// (never enlarged) and re-encoded as JPEG quality 80. The stored name
    /// is a fresh UUID keeping the upload's original extension.
    pub async fn store(
        &self,
        bytes: &[u8],
        mime: &str,
        declared_filename: Option<&str>,
    ) -> Result<String, CoreError> {
        self.validate(mime, bytes.len())?;

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| CoreError::Validation(format!("Invalid image data: {e}")))?;

        let resized = if decoded.width() > MAX_WIDTH || decoded.height() > MAX_HEIGHT {
            decoded.resize(MAX_WIDTH, MAX_HEIGHT, FilterType::Lanczos3)
        } else {
            decoded
        };

        // JPEG has no alpha channel; flatten whatever the source format was.
        let rgb = resized.to_rgb8();
        let mut encoded = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut encoded), JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CoreError::Internal(format!("JPEG encoding failed: {e}")))?;

        let extension = declared_filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or("jpg");
        let stored_name = format!("{}.{extension}", uuid::Uuid::new_v4());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to create upload dir: {e}")))?;
        tokio::fs::write(self.path_of(&stored_name), &encoded)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write image: {e}")))?;

        tracing::debug!(name = %stored_name, bytes = encoded.len(), "Stored todo image");
        Ok(stored_name)
    }

    /// Remove a stored image. A missing file is not an error; any other I/O
    /// failure is logged and swallowed.
    pub async fn delete(&self, stored_name: &str) {
        match tokio::fs::remove_file(self.path_of(stored_name)).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(name = %stored_name, error = %err, "Failed to delete image file");
            }
        }
    }

    /// Absolute path of a stored image (used for Trello attachment upload).
    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn store(dir: &Path) -> ImageStore {
        ImageStore::new(dir, 5 * 1024 * 1024)
    }

    #[tokio::test]
    async fn stores_and_downsizes_large_image() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let name = store
            .store(&png_bytes(1000, 700), "image/png", Some("big.png"))
            .await
            .unwrap();
        assert!(name.ends_with(".png"));

        // The stored name keeps the upload's extension but the content is
        // always JPEG, so decode from bytes.
        let bytes = std::fs::read(store.path_of(&name)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
        let reloaded = image::load_from_memory(&bytes).unwrap();
        // Aspect ratio preserved: 1000x700 fits as 800x560.
        assert_eq!((reloaded.width(), reloaded.height()), (800, 560));
    }

    #[tokio::test]
    async fn small_image_is_not_enlarged() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let name = store
            .store(&png_bytes(100, 80), "image/png", Some("small.png"))
            .await
            .unwrap();

        let bytes = std::fs::read(store.path_of(&name)).unwrap();
        let reloaded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (100, 80));
    }

    #[tokio::test]
    async fn rejects_disallowed_mime_type() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let err = store
            .store(&png_bytes(10, 10), "image/gif", Some("a.gif"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        // Nothing written.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn rejects_oversized_payload() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path(), 16);

        let err = store
            .store(&png_bytes(10, 10), "image/png", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_undecodable_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let err = store
            .store(b"definitely not an image", "image/png", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());

        let name = store
            .store(&png_bytes(20, 20), "image/jpeg", Some("x.jpg"))
            .await
            .unwrap();
        store.delete(&name).await;
        assert!(!store.path_of(&name).exists());
        // Second delete of a missing file is fine.
        store.delete(&name).await;
    }
}
