use std::sync::Arc;

use anyhow::Context;
use config::Config;
use middleware::configure_cors;
use repositories::{
    categories_repo::CategoriesRepository, post_images_repo::PostImagesRepository,
    posts_repo::PostsRepository, user_repo::UserRepository, PostgresRepo,
};
use routes::create_router;
use services::{
    auth::AuthService, categories::CategoriesService, post_images::PostImagesService,
    posts::PostsService,
};
use sqlx::postgres::PgPoolOptions;
use storage::MediaStorage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use self::errors::{Error, Result};

mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod pagination;
mod permissions;
mod repositories;
mod routes;
mod services;
mod storage;

#[cfg(test)]
mod test_support;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub categories_service: CategoriesService,
    pub posts_service: PostsService,
    pub post_images_service: PostImagesService,
}

impl AppState {
    pub fn new<R>(config: Config, repo: R) -> Self
    where
        R: UserRepository
            + CategoriesRepository
            + PostsRepository
            + PostImagesRepository
            + 'static,
    {
        let repo = Arc::new(repo);

        Self {
            auth_service: AuthService::new(
                repo.clone(),
                config.jwt_secret.clone(),
                config.jwt_maxage,
            ),
            categories_service: CategoriesService::new(repo.clone()),
            posts_service: PostsService::new(repo.clone(), repo.clone()),
            post_images_service: PostImagesService::new(
                repo.clone(),
                repo,
                MediaStorage::new(config.media_dir.clone()),
            ),
            config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_content_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::init()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    tracing::info!("✅ Connection to the database is successful!");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tokio::fs::create_dir_all(&config.media_dir)
        .await
        .with_context(|| format!("Failed to create media directory {:?}", config.media_dir))?;

    let app_state = Arc::new(AppState::new(config.clone(), PostgresRepo::new(pool)));

    let app = create_router(app_state).layer(configure_cors(&config));

    let addr = format!("[::]:{}", config.port);
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
