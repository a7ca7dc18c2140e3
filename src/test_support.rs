//! In-process application harness for router tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    config::Config,
    models::{categories::Category, users::User},
    repositories::{
        categories_repo::CategoriesRepository, memory::MemoryRepo, user_repo::UserRepository,
    },
    routes::create_router,
    AppState,
};

pub const TEST_HOST: &str = "testserver";

pub struct TestApp {
    pub router: Router,
    pub repo: MemoryRepo,
    pub state: Arc<AppState>,
    /// A category every seeded post can point at.
    pub category: Category,
    pub media: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let media = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: "postgres://unused".to_string(),
            database_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_maxage: 60,
            port: 0,
            media_dir: media.path().to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            cors_origin: None,
        };

        let repo = MemoryRepo::default();
        let category = repo.create_category("General").await.unwrap();
        let state = Arc::new(AppState::new(config, repo.clone()));

        Self {
            router: create_router(state.clone()),
            repo,
            state,
            category,
            media,
        }
    }

    /// Creates a user directly in the store and returns it with a valid token.
    pub async fn user(&self, email: &str) -> (User, String) {
        let user = self
            .repo
            .create_user("Test User", email, "not-a-real-hash")
            .await
            .unwrap();
        let token = self.state.auth_service.generate_token(user.id).unwrap();
        (user, token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, TEST_HOST);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}
