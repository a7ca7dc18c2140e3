use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::{config::Config, models::users::User, AppState, Error, Result};

/// The authenticated identity of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

fn bearer_or_cookie(req: &Request) -> Option<String> {
    let cookies = CookieJar::from_headers(req.headers());

    cookies
        .get("token")
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|stripped| stripped.to_string())
                })
        })
}

/// Rejects anonymous requests and attaches an [`AuthUser`] for handlers.
pub async fn auth(mut req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or(Error::InternalServerError)?;

    let token = bearer_or_cookie(&req).ok_or(Error::Unauthorized)?;

    let user = app_state
        .auth_service
        .authenticate(&token)
        .await
        .inspect_err(|_| tracing::debug!("Rejected request with an invalid token"))?;

    req.extensions_mut().insert(AuthUser { user });

    Ok(next.run(req).await)
}

pub fn configure_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match config
        .cors_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => cors.allow_origin(origin).allow_credentials(true),
        None => cors.allow_origin(Any),
    }
}
