use std::sync::Arc;

use axum::{
    extract::Multipart,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    models::post_images::FilterPostImageDto, services::post_images::PostImageUpload, AppState,
    Result,
};

use super::absolute_base;

pub fn post_images_handler() -> Router {
    Router::new().route("/post-images/", get(get_post_images).post(create_post_image))
}

async fn get_post_images(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let images = app_state.post_images_service.get_post_images().await?;
    let images = FilterPostImageDto::filter_images(&images, &absolute_base(&headers));
    Ok((StatusCode::OK, Json(images)))
}

async fn create_post_image(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut upload = PostImageUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("post") => upload.post = Some(field.text().await?),
            Some("image") => upload.image = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let image = app_state
        .post_images_service
        .create_post_image(upload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FilterPostImageDto::filter_image(
            &image,
            &absolute_base(&headers),
        )),
    ))
}
