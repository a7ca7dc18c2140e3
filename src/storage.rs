use std::path::PathBuf;

use image::ImageFormat;
use tokio::fs;
use uuid::Uuid;

use crate::Result;

const POST_IMAGES_DIR: &str = "posts";

/// Files uploaded through the API, kept under a single root that is also
/// served at `/media/`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes an image under a fresh name and returns its path relative to
    /// the media root.
    pub async fn save_post_image(&self, bytes: &[u8], format: ImageFormat) -> Result<String> {
        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let relative = format!("{POST_IMAGES_DIR}/{}.{extension}", Uuid::now_v7());

        let dir = self.root.join(POST_IMAGES_DIR);
        fs::create_dir_all(&dir).await?;
        fs::write(self.root.join(&relative), bytes).await?;

        tracing::info!(path = %relative, size = bytes.len(), "Stored post image");

        Ok(relative)
    }

    /// Deletes a file previously returned by `save_post_image`.
    pub async fn remove(&self, relative: &str) -> Result<()> {
        fs::remove_file(self.root.join(relative)).await?;
        tracing::info!(path = %relative, "Removed stored file");
        Ok(())
    }
}
