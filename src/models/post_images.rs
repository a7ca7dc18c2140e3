use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PostImage {
    pub id: Uuid,
    #[sqlx(rename = "post_id")]
    pub post: Uuid,
    /// Path relative to the media directory.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterPostImageDto {
    pub id: Uuid,
    pub post: Uuid,
    pub image: String,
}

impl FilterPostImageDto {
    /// Renders the stored path as an absolute URL under `/media/`.
    pub fn filter_image(image: &PostImage, base_url: &str) -> Self {
        FilterPostImageDto {
            id: image.id,
            post: image.post,
            image: format!("{}/media/{}", base_url.trim_end_matches('/'), image.image),
        }
    }

    pub fn filter_images(images: &[PostImage], base_url: &str) -> Vec<FilterPostImageDto> {
        images
            .iter()
            .map(|image| FilterPostImageDto::filter_image(image, base_url))
            .collect()
    }
}
