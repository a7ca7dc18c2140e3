//! In-process store backing the handler and service tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::{
        categories::Category,
        post_images::PostImage,
        posts::{NewPost, Post, UpdatePostDto},
        query::PostFilter,
        users::User,
    },
    Error, Result,
};

use super::{
    categories_repo::CategoriesRepository, post_images_repo::PostImagesRepository,
    posts_repo::PostsRepository, user_repo::UserRepository,
};

#[derive(Default)]
struct Store {
    users: Vec<User>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    images: Vec<PostImage>,
}

#[derive(Clone, Default)]
pub struct MemoryRepo {
    store: Arc<Mutex<Store>>,
}

impl MemoryRepo {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    /// Inserts a post verbatim, keeping its `created_at`.
    pub fn insert_post(&self, post: Post) {
        self.store().posts.push(post);
    }

    pub fn posts(&self) -> Vec<Post> {
        self.store().posts.clone()
    }

    pub fn images(&self) -> Vec<PostImage> {
        self.store().images.clone()
    }

    fn matching(&self, filter: &PostFilter) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .store()
            .posts
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts
    }
}

#[async_trait]
impl UserRepository for MemoryRepo {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.store().users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.store().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let mut store = self.store();
        if store.users.iter().any(|u| u.email == email) {
            return Err(Error::field("email", "unique", "Email already exists"));
        }

        let user = User {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
        };
        store.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CategoriesRepository for MemoryRepo {
    async fn get_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.store().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn category_exists(&self, category_id: Uuid) -> Result<bool> {
        Ok(self.store().categories.iter().any(|c| c.id == category_id))
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        let mut store = self.store();
        if store.categories.iter().any(|c| c.name == name) {
            return Err(Error::field(
                "name",
                "unique",
                "category with this name already exists.",
            ));
        }

        let category = Category {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        store.categories.push(category.clone());
        Ok(category)
    }
}

#[async_trait]
impl PostsRepository for MemoryRepo {
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
        Ok(self.matching(filter).len() as i64)
    }

    async fn get_posts(
        &self,
        filter: &PostFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let posts = self.matching(filter).into_iter().skip(offset as usize);
        Ok(match limit {
            Some(limit) => posts.take(limit as usize).collect(),
            None => posts.collect(),
        })
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self.store().posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn create_post(&self, author_id: Uuid, post: &NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::now_v7(),
            title: post.title.clone(),
            text: post.text.clone(),
            author: author_id,
            category: post.category,
            created_at: Utc::now(),
        };
        self.store().posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, post_id: Uuid, changes: &UpdatePostDto) -> Result<Post> {
        let mut store = self.store();
        let post = store
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(Error::NotFound)?;

        if let Some(title) = &changes.title {
            post.title = title.clone();
        }
        if let Some(text) = &changes.text {
            post.text = text.clone();
        }
        if let Some(category) = changes.category {
            post.category = category;
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        let mut store = self.store();
        let before = store.posts.len();
        store.posts.retain(|p| p.id != post_id);
        if store.posts.len() == before {
            return Err(Error::NotFound);
        }
        store.images.retain(|i| i.post != post_id);
        Ok(())
    }
}

#[async_trait]
impl PostImagesRepository for MemoryRepo {
    async fn get_post_images(&self) -> Result<Vec<PostImage>> {
        Ok(self.store().images.clone())
    }

    async fn create_post_image(&self, post_id: Uuid, image_path: &str) -> Result<PostImage> {
        let mut store = self.store();
        if !store.posts.iter().any(|p| p.id == post_id) {
            return Err(Error::field(
                "post",
                "does_not_exist",
                "Invalid post - object does not exist.",
            ));
        }

        let image = PostImage {
            id: Uuid::now_v7(),
            post: post_id,
            image: image_path.to_string(),
            created_at: Utc::now(),
        };
        store.images.push(image.clone());
        Ok(image)
    }
}
