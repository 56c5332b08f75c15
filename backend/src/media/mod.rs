//! Uploaded media storage
//!
//! Recipe images are written below the configured media root at
//! `upload/recipe/<uuid>.<ext>` and served back under `/media`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory, relative to the media root, holding recipe images
pub const RECIPE_UPLOAD_DIR: &str = "upload/recipe";

/// Extension used when the original one has no usable characters
const FALLBACK_EXTENSION: &str = "bin";

/// Generate a fresh storage path for an uploaded recipe image
pub fn recipe_image_file_path(filename: &str) -> String {
    recipe_image_file_path_with_id(filename, Uuid::new_v4())
}

/// Build the storage path for a recipe image with a given id.
///
/// The extension is whatever follows the last `.` (the whole name when
/// there is none), reduced to ASCII alphanumerics so it can never escape
/// the upload directory.
pub fn recipe_image_file_path_with_id(filename: &str, id: Uuid) -> String {
    let raw = filename.rsplit('.').next().unwrap_or(filename);
    let ext: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    let ext = if ext.is_empty() { FALLBACK_EXTENSION } else { ext.as_str() };
    format!("{}/{}.{}", RECIPE_UPLOAD_DIR, id, ext)
}

/// Filesystem-backed media storage
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a recipe image and return its path relative to the media root
    pub async fn save_recipe_image(&self, original_filename: &str, bytes: &[u8]) -> Result<String> {
        let relative = recipe_image_file_path(original_filename);
        let full_path = self.root.join(&relative);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&full_path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", full_path.display()))?;

        debug!(path = %relative, size = bytes.len(), "Stored recipe image");
        Ok(relative)
    }

    /// Remove a previously stored file; failures are only logged
    pub async fn remove(&self, relative: &str) {
        if !relative.starts_with(RECIPE_UPLOAD_DIR) {
            warn!(path = %relative, "Refusing to remove file outside the upload directory");
            return;
        }
        let full_path = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&full_path).await {
            warn!(path = %full_path.display(), "Failed to remove old media file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_recipe_file_name_uuid() {
        let id = Uuid::new_v4();
        let file_path = recipe_image_file_path_with_id("myimage.jpg", id);

        assert_eq!(file_path, format!("upload/recipe/{}.jpg", id));
    }

    #[rstest]
    #[case("photo.final.png", "png")]
    #[case("UPPER.JPG", "JPG")]
    #[case("image", "image")]
    #[case("trailing.", "bin")]
    #[case("evil./../../etc", "etc")]
    fn test_extension_extraction(#[case] filename: &str, #[case] ext: &str) {
        let id = Uuid::nil();
        let path = recipe_image_file_path_with_id(filename, id);
        assert_eq!(path, format!("upload/recipe/{}.{}", id, ext));
    }

    #[test]
    fn test_each_call_generates_new_id() {
        assert_ne!(
            recipe_image_file_path("myimage.jpg"),
            recipe_image_file_path("myimage.jpg")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_path_stays_in_upload_dir(filename in "\\PC{0,40}") {
            let path = recipe_image_file_path(&filename);
            let prefix = format!("{}/", RECIPE_UPLOAD_DIR);
            prop_assert!(path.starts_with(&prefix));
            let file = &path[prefix.len()..];
            prop_assert!(!file.contains('/'));
            prop_assert!(!file.contains(".."));
        }

        #[test]
        fn prop_alphanumeric_extension_preserved(
            stem in "[a-z]{1,10}",
            ext in "[a-zA-Z0-9]{1,5}"
        ) {
            let path = recipe_image_file_path(&format!("{}.{}", stem, ext));
            let expected_suffix = format!(".{}", ext);
            prop_assert!(path.ends_with(&expected_suffix));
        }
    }

    #[tokio::test]
    async fn test_save_and_remove_recipe_image() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path());

        let relative = storage.save_recipe_image("dish.png", b"\x89PNG").await.unwrap();
        assert!(relative.starts_with("upload/recipe/"));
        assert!(relative.ends_with(".png"));

        let full_path = dir.path().join(&relative);
        assert_eq!(tokio::fs::read(&full_path).await.unwrap(), b"\x89PNG");

        storage.remove(&relative).await;
        assert!(!full_path.exists());
    }

    #[tokio::test]
    async fn test_remove_ignores_paths_outside_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.txt");
        tokio::fs::write(&keep, b"x").await.unwrap();

        let storage = MediaStorage::new(dir.path());
        storage.remove("keep.txt").await;
        assert!(keep.exists());
    }
}
