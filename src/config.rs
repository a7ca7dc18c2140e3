use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub jwt_maxage: i64,
    pub port: u16,
    pub media_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn init() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET_KEY cannot be empty");
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_maxage: parse_or("JWT_MAXAGE", 60)?,
            port: parse_or("PORT", 8080)?,
            media_dir: env::var("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
