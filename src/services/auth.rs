use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::users::User, repositories::user_repo::UserRepository, Error, Result};

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    /// Token lifetime in minutes.
    jwt_maxage: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_secret: String, jwt_maxage: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_maxage,
        }
    }

    pub fn jwt_maxage(&self) -> i64 {
        self.jwt_maxage
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(Error::field("email", "unique", "Email already exists"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        let user = self
            .user_repo
            .create_user(name, email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(Error::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| Error::Unauthorized)?;

        self.generate_token(user.id)
    }

    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.jwt_maxage)).timestamp() as usize;
        let iat = now.timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|_| Error::InternalServerError)
    }

    pub fn decode_token<T: Into<String>>(&self, token: T) -> Result<Uuid> {
        let decoded = decode::<Claims>(
            &token.into(),
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| Error::Unauthorized)?;

        Uuid::parse_str(&decoded.claims.sub).map_err(|_| Error::Unauthorized)
    }

    /// Resolves a token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self.decode_token(token)?;

        self.user_repo
            .get_user(user_id)
            .await?
            .ok_or(Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use crate::repositories::memory::MemoryRepo;

    use super::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryRepo::default()), "test-secret".to_string(), 60)
    }

    #[tokio::test]
    async fn register_then_login_issues_a_usable_token() {
        let auth = service();
        let user = auth
            .register("Jane", "jane@example.com", "secret123")
            .await
            .unwrap();
        assert_ne!(user.password, "secret123");

        let token = auth.login("jane@example.com", "secret123").await.unwrap();
        let resolved = auth.authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = service();
        auth.register("Jane", "jane@example.com", "secret123")
            .await
            .unwrap();

        let result = auth.login("jane@example.com", "nope-nope").await;
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_validation_failure() {
        let auth = service();
        auth.register("Jane", "jane@example.com", "secret123")
            .await
            .unwrap();

        let result = auth.register("Jane", "jane@example.com", "secret123").await;
        assert!(matches!(result, Err(Error::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn foreign_tokens_are_rejected() {
        let other = AuthService::new(Arc::new(MemoryRepo::default()), "other".to_string(), 60);
        let token = other.generate_token(Uuid::now_v7()).unwrap();

        assert!(matches!(service().decode_token(token), Err(Error::Unauthorized)));
        assert!(matches!(
            service().authenticate("garbage").await,
            Err(Error::Unauthorized)
        ));
    }
}
