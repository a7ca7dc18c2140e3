use std::sync::Arc;

use image::ImageFormat;
use uuid::Uuid;

use crate::{
    models::post_images::PostImage,
    repositories::{post_images_repo::PostImagesRepository, posts_repo::PostsRepository},
    storage::MediaStorage,
    Error, Result,
};

/// A decoded multipart submission for `POST /post-images/`.
#[derive(Debug, Default)]
pub struct PostImageUpload {
    pub post: Option<String>,
    pub image: Option<Vec<u8>>,
}

#[derive(Clone)]
pub struct PostImagesService {
    images: Arc<dyn PostImagesRepository>,
    posts: Arc<dyn PostsRepository>,
    storage: MediaStorage,
}

impl PostImagesService {
    pub fn new(
        images: Arc<dyn PostImagesRepository>,
        posts: Arc<dyn PostsRepository>,
        storage: MediaStorage,
    ) -> Self {
        Self {
            images,
            posts,
            storage,
        }
    }

    pub async fn get_post_images(&self) -> Result<Vec<PostImage>> {
        self.images.get_post_images().await
    }

    /// Any authenticated identity may attach images to any existing post.
    pub async fn create_post_image(&self, upload: PostImageUpload) -> Result<PostImage> {
        let post_id = upload
            .post
            .ok_or_else(|| Error::field("post", "required", "This field is required."))?;
        let post_id = Uuid::parse_str(post_id.trim())
            .map_err(|_| Error::field("post", "invalid", "Invalid post id."))?;
        let bytes = upload
            .image
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| Error::field("image", "required", "No file was submitted."))?;

        if self.posts.get_post(post_id).await?.is_none() {
            return Err(Error::field(
                "post",
                "does_not_exist",
                "Invalid post - object does not exist.",
            ));
        }

        let (bytes, format) = validate_image(bytes).await?;
        let path = self.storage.save_post_image(&bytes, format).await?;

        match self.images.create_post_image(post_id, &path).await {
            Ok(image) => Ok(image),
            Err(err) => {
                if let Err(cleanup) = self.storage.remove(&path).await {
                    tracing::warn!(path = %path, ?cleanup, "Failed to remove unrecorded image");
                }
                Err(err)
            }
        }
    }
}

/// Decodes the payload off the async runtime to make sure it is a real
/// image, returning the bytes with their detected format.
async fn validate_image(bytes: Vec<u8>) -> Result<(Vec<u8>, ImageFormat)> {
    let invalid = || {
        Error::field(
            "image",
            "invalid_image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        )
    };

    let format = image::guess_format(&bytes).map_err(|_| invalid())?;

    tokio::task::spawn_blocking(move || {
        image::load_from_memory_with_format(&bytes, format)
            .map(|_| (bytes, format))
            .map_err(|_| invalid())
    })
    .await
    .map_err(|_| Error::InternalServerError)?
}
