use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{models::post_images::PostImage, Error, Result};

use super::PostgresRepo;

#[async_trait]
pub trait PostImagesRepository: Sync + Send {
    async fn get_post_images(&self) -> Result<Vec<PostImage>>;
    async fn create_post_image(&self, post_id: Uuid, image_path: &str) -> Result<PostImage>;
}

#[async_trait]
impl PostImagesRepository for PostgresRepo {
    async fn get_post_images(&self) -> Result<Vec<PostImage>> {
        let images = sqlx::query_as::<_, PostImage>(
            r#"
            SELECT id, post_id, image, created_at FROM post_images ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(images)
    }

    #[instrument(skip(self))]
    async fn create_post_image(&self, post_id: Uuid, image_path: &str) -> Result<PostImage> {
        let image = sqlx::query_as::<_, PostImage>(
            r#"
            INSERT INTO post_images (id, post_id, image)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, image, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(post_id)
        .bind(image_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => Error::field(
                "post",
                "does_not_exist",
                "Invalid post - object does not exist.",
            ),
            err => Error::from(err),
        })?;

        Ok(image)
    }
}
