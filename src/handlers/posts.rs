use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    middleware::AuthUser,
    models::{
        posts::CreatePostDto,
        query::{PostListQuery, SearchQuery},
    },
    pagination::{PageLinks, PageRequest},
    AppState, Error, Result,
};

use super::absolute_base;

pub fn posts_handler() -> Router {
    Router::new()
        .route("/posts/", get(get_posts).post(create_post))
        .route("/posts/own/", get(own_posts))
        .route("/posts/search/", get(search_posts))
        .route(
            "/posts/{id}/",
            get(get_post)
                .put(update_post)
                .patch(partial_update_post)
                .delete(delete_post),
        )
}

fn parse_post_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::NotFound)
}

async fn get_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    WithRejection(Query(query), _): WithRejection<Query<PostListQuery>, Error>,
) -> Result<impl IntoResponse> {
    let page = app_state
        .posts_service
        .list_posts(user.id(), query.week, PageRequest::new(query.page))
        .await?;

    let mut params = Vec::new();
    if let Some(week) = query.week {
        params.push(("week".to_string(), week.to_string()));
    }
    let links = PageLinks::new(
        format!("{}{}", absolute_base(&headers), uri.path()),
        params,
    );

    Ok((StatusCode::OK, Json(page.render(&links))))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, Error>,
) -> Result<impl IntoResponse> {
    let post = app_state
        .posts_service
        .create_post(user.id(), CreatePostDto::try_from(body)?)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn own_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let posts = app_state.posts_service.own_posts(user.id()).await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn search_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, Error>,
) -> Result<impl IntoResponse> {
    let posts = app_state
        .posts_service
        .search_posts(user.id(), query.q.as_deref(), query.week)
        .await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse> {
    let post = app_state
        .posts_service
        .get_post(user.id(), parse_post_id(&post_id)?)
        .await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, Error>,
) -> Result<impl IntoResponse> {
    let updated_post = app_state
        .posts_service
        .replace_post(user.id(), parse_post_id(&post_id)?, body)
        .await?;
    Ok((StatusCode::OK, Json(updated_post)))
}

async fn partial_update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, Error>,
) -> Result<impl IntoResponse> {
    let updated_post = app_state
        .posts_service
        .patch_post(user.id(), parse_post_id(&post_id)?, body)
        .await?;
    Ok((StatusCode::OK, Json(updated_post)))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse> {
    app_state
        .posts_service
        .delete_post(user.id(), parse_post_id(&post_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
