//! Filesystem store for the company logo image.
//!
//! Owns the upload directory and everything filename-related: validation of
//! incoming files, collision-free naming, and the mapping between public
//! `/uploads/...` references and paths on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use crate::errors::{Result, ValidationError};

/// Hard cap on the buffered upload body.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Accepted declared content types. `image/jpg` is not a registered MIME
/// type but browsers send it anyway.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// Accepted filename extensions, lowercase with the leading dot.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".png", ".jpeg", ".jpg", ".webp"];

/// Prefix of public logo references; files outside it are not ours to touch.
pub const PUBLIC_UPLOADS_PREFIX: &str = "/uploads/";

/// An incoming logo file, fully buffered.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Manages logo files under a configured upload directory.
pub struct LogoStore {
    upload_dir: PathBuf,
}

impl LogoStore {
    /// Creates the store, ensuring the upload directory exists.
    pub fn new(upload_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        fs::create_dir_all(&upload_dir)?;
        info!("Upload directory set to {}", upload_dir.display());
        Ok(Self { upload_dir })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Checks declared content type, filename extension, and size against the
    /// allow-lists. Both the type and the extension check must pass on their
    /// own. Returns the normalized extension.
    pub fn validate(&self, upload: &LogoUpload) -> Result<String> {
        if !ALLOWED_IMAGE_TYPES.contains(&upload.content_type.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid file type. Allowed types: {}",
                ALLOWED_IMAGE_TYPES.join(", ")
            ))
            .into());
        }

        let ext = Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid file extension. Allowed extensions: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
            .into());
        }

        if upload.bytes.len() > MAX_LOGO_BYTES {
            return Err(ValidationError::InvalidInput(format!(
                "File too large. Maximum size is {:.1}MB",
                MAX_LOGO_BYTES as f64 / (1024.0 * 1024.0)
            ))
            .into());
        }

        Ok(ext)
    }

    /// Writes the bytes under a collision-free name and returns the public
    /// reference path. The name carries microsecond precision so rapid
    /// repeated uploads within the same second cannot collide.
    pub fn save(&self, bytes: &[u8], ext: &str, now: DateTime<Utc>) -> Result<String> {
        let filename = format!(
            "logo_{}.{:06}{}",
            now.timestamp(),
            now.timestamp_subsec_micros(),
            ext
        );
        let path = self.upload_dir.join(&filename);
        fs::write(&path, bytes)?;
        info!("Logo file saved to {}", path.display());
        Ok(format!("{}{}", PUBLIC_UPLOADS_PREFIX, filename))
    }

    /// Maps a stored reference back to the managed file path. References
    /// outside the uploads prefix resolve to nothing.
    pub fn managed_path(&self, reference: &str) -> Option<PathBuf> {
        let name = reference.strip_prefix(PUBLIC_UPLOADS_PREFIX)?;
        let name = Path::new(name).file_name()?;
        Some(self.upload_dir.join(name))
    }

    /// Removes the referenced file when it is managed and still on disk.
    /// A file already gone is not an error.
    pub fn remove(&self, reference: &str) -> Result<()> {
        if let Some(path) = self.managed_path(reference) {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use tempfile::tempdir;

    fn png_upload(filename: &str, content_type: &str, len: usize) -> LogoUpload {
        LogoUpload {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn validate_accepts_allowed_type_and_extension() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        let ext = store
            .validate(&png_upload("logo.PNG", "image/png", 128))
            .unwrap();
        assert_eq!(ext, ".png");
    }

    #[test]
    fn validate_rejects_extension_mismatch_despite_allowed_type() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        let err = store
            .validate(&png_upload("logo.txt", "image/png", 128))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("extension"));
    }

    #[test]
    fn validate_rejects_disallowed_type() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        let err = store
            .validate(&png_upload("logo.png", "image/gif", 128))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid file type"));
    }

    #[test]
    fn validate_rejects_oversized_body() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        let err = store
            .validate(&png_upload("logo.png", "image/png", MAX_LOGO_BYTES + 1))
            .unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn save_and_remove_round_trip() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        let reference = store.save(b"fake image", ".png", Utc::now()).unwrap();
        assert!(reference.starts_with("/uploads/logo_"));
        let path = store.managed_path(&reference).unwrap();
        assert!(path.exists());

        store.remove(&reference).unwrap();
        assert!(!path.exists());
        // Removing again is a no-op.
        store.remove(&reference).unwrap();
    }

    #[test]
    fn remove_ignores_unmanaged_references() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        assert!(store.managed_path("/elsewhere/logo.png").is_none());
        store.remove("/elsewhere/logo.png").unwrap();
    }

    #[test]
    fn generated_names_carry_subsecond_precision() {
        let tmp = tempdir().unwrap();
        let store = LogoStore::new(tmp.path()).unwrap();
        let first = store.save(b"a", ".png", Utc::now()).unwrap();
        let second = store.save(b"b", ".png", Utc::now()).unwrap();
        assert_ne!(first, second);
    }
}
