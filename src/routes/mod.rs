use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{
        auth::auth_handler, categories::categories_handler, post_images::post_images_handler,
        posts::posts_handler, user::users_handler,
    },
    middleware::auth,
    AppState,
};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .nest("/users", users_handler())
        .merge(posts_handler())
        .merge(post_images_handler())
        .route_layer(middleware::from_fn(auth));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .merge(categories_handler())
        .merge(protected)
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .nest("/api", api_route)
        .nest_service("/media", ServeDir::new(&app_state.config.media_dir))
}
