use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    middleware::auth, models::categories::CreateCategoryDto, AppState, Error, Result,
};

/// Listing is public; creating a category needs an identity.
pub fn categories_handler() -> Router {
    Router::new().route(
        "/categories/",
        get(get_categories).merge(post(create_category).layer(middleware::from_fn(auth))),
    )
}

async fn get_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let categories = app_state.categories_service.get_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, Error>,
) -> Result<impl IntoResponse> {
    let category = app_state
        .categories_service
        .create_category(CreateCategoryDto::try_from(body)?)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}
