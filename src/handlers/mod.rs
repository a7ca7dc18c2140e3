use axum::http::{header, HeaderMap};

pub mod auth;
pub mod categories;
pub mod post_images;
pub mod posts;
pub mod user;

/// Scheme and host the client used to reach us, for building absolute links.
pub fn absolute_base(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}
