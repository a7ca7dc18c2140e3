use std::sync::Arc;

use validator::Validate;

use crate::{
    models::categories::{Category, CreateCategoryDto},
    repositories::categories_repo::CategoriesRepository,
    Result,
};

#[derive(Clone)]
pub struct CategoriesService {
    repo: Arc<dyn CategoriesRepository>,
}

impl CategoriesService {
    pub fn new(repo: Arc<dyn CategoriesRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        self.repo.get_categories().await
    }

    pub async fn create_category(&self, category: CreateCategoryDto) -> Result<Category> {
        category.validate()?;

        let category = self.repo.create_category(category.name.trim()).await?;
        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }
}
