use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        posts::{CreatePostDto, Post, UpdatePostDto},
        query::PostFilter,
    },
    pagination::{Page, PageRequest},
    permissions::{authorize, PostAction},
    repositories::{categories_repo::CategoriesRepository, posts_repo::PostsRepository},
    Error, Result,
};

#[derive(Clone)]
pub struct PostsService {
    posts: Arc<dyn PostsRepository>,
    categories: Arc<dyn CategoriesRepository>,
}

impl PostsService {
    pub fn new(posts: Arc<dyn PostsRepository>, categories: Arc<dyn CategoriesRepository>) -> Self {
        Self { posts, categories }
    }

    pub async fn list_posts(
        &self,
        identity: Uuid,
        week: Option<i64>,
        request: PageRequest,
    ) -> Result<Page<Post>> {
        authorize(PostAction::List, Some(identity), None)?;

        let filter = PostFilter::recent(week, Utc::now());
        let count = self.posts.count_posts(&filter).await?;
        request.validate(count)?;

        let results = self
            .posts
            .get_posts(&filter, Some(request.limit()), request.offset())
            .await?;

        Ok(Page {
            request,
            count,
            results,
        })
    }

    /// Every post written by `identity`; no other filter applies.
    pub async fn own_posts(&self, identity: Uuid) -> Result<Vec<Post>> {
        authorize(PostAction::ListOwn, Some(identity), None)?;

        self.posts
            .get_posts(&PostFilter::authored_by(identity), None, 0)
            .await
    }

    pub async fn search_posts(
        &self,
        identity: Uuid,
        q: Option<&str>,
        week: Option<i64>,
    ) -> Result<Vec<Post>> {
        authorize(PostAction::Search, Some(identity), None)?;

        let filter = PostFilter::recent(week, Utc::now()).with_search(q);
        self.posts.get_posts(&filter, None, 0).await
    }

    pub async fn get_post(&self, identity: Uuid, post_id: Uuid) -> Result<Post> {
        let post = self.posts.get_post(post_id).await?.ok_or(Error::NotFound)?;
        authorize(PostAction::Retrieve, Some(identity), Some(&post))?;
        Ok(post)
    }

    pub async fn create_post(&self, identity: Uuid, post: CreatePostDto) -> Result<Post> {
        authorize(PostAction::Create, Some(identity), None)?;

        let new_post = post.into_new_post()?;
        self.ensure_category(new_post.category).await?;

        let post = self.posts.create_post(identity, &new_post).await?;
        tracing::info!(post_id = %post.id, author = %identity, "Post created");
        Ok(post)
    }

    /// Full update: every writable field must be present. The body is only
    /// decoded once the caller is known to be the author.
    pub async fn replace_post(&self, identity: Uuid, post_id: Uuid, body: Value) -> Result<Post> {
        self.load_for(PostAction::Update, identity, post_id).await?;

        let post = CreatePostDto::try_from(body)?;
        let changes = UpdatePostDto::from(post.into_new_post()?);
        self.apply(post_id, changes).await
    }

    pub async fn patch_post(&self, identity: Uuid, post_id: Uuid, body: Value) -> Result<Post> {
        self.load_for(PostAction::PartialUpdate, identity, post_id)
            .await?;

        let changes = UpdatePostDto::try_from(body)?;
        changes.validate()?;
        self.apply(post_id, changes).await
    }

    pub async fn delete_post(&self, identity: Uuid, post_id: Uuid) -> Result<()> {
        self.load_for(PostAction::Delete, identity, post_id).await?;

        self.posts.delete_post(post_id).await?;
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    async fn load_for(&self, action: PostAction, identity: Uuid, post_id: Uuid) -> Result<Post> {
        let post = self.posts.get_post(post_id).await?.ok_or(Error::NotFound)?;

        authorize(action, Some(identity), Some(&post)).inspect_err(|_| {
            tracing::warn!(post_id = %post_id, identity = %identity, ?action, "Post access denied");
        })?;

        Ok(post)
    }

    async fn apply(&self, post_id: Uuid, changes: UpdatePostDto) -> Result<Post> {
        if let Some(category) = changes.category {
            self.ensure_category(category).await?;
        }

        self.posts.update_post(post_id, &changes).await
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<()> {
        if self.categories.category_exists(category_id).await? {
            Ok(())
        } else {
            Err(Error::field(
                "category",
                "does_not_exist",
                "Invalid category - object does not exist.",
            ))
        }
    }
}
