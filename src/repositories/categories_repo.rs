use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{models::categories::Category, Error, Result};

use super::PostgresRepo;

#[async_trait]
pub trait CategoriesRepository: Sync + Send {
    async fn get_categories(&self) -> Result<Vec<Category>>;
    async fn category_exists(&self, category_id: Uuid) -> Result<bool>;
    async fn create_category(&self, name: &str) -> Result<Category>;
}

#[async_trait]
impl CategoriesRepository for PostgresRepo {
    async fn get_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at FROM categories ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn category_exists(&self, category_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)
            "#,
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn create_category(&self, name: &str) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::field("name", "unique", "category with this name already exists.")
            }
            err => Error::from(err),
        })?;

        Ok(category)
    }
}
