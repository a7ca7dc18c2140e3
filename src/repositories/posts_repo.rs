use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::{
        posts::{NewPost, Post, UpdatePostDto},
        query::PostFilter,
    },
    Error, Result,
};

use super::PostgresRepo;

const POST_COLUMNS: &str = "id, title, text, author_id, category_id, created_at";

#[async_trait]
pub trait PostsRepository: Sync + Send {
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64>;
    /// Newest first. `limit = None` returns every match from `offset` on.
    async fn get_posts(&self, filter: &PostFilter, limit: Option<i64>, offset: i64)
        -> Result<Vec<Post>>;
    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>>;
    async fn create_post(&self, author_id: Uuid, post: &NewPost) -> Result<Post>;
    async fn update_post(&self, post_id: Uuid, changes: &UpdatePostDto) -> Result<Post>;
    async fn delete_post(&self, post_id: Uuid) -> Result<()>;
}

/// Escapes `%`, `_` and `\` so the term is matched literally by `ILIKE`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    builder.push(" WHERE TRUE");

    if let Some(created_after) = filter.created_after {
        builder.push(" AND created_at >= ").push_bind(created_after);
    }
    if let Some(author) = filter.author {
        builder.push(" AND author_id = ").push_bind(author);
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR text ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    #[instrument(skip(self))]
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts");
        push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn get_posts(
        &self,
        filter: &PostFilter,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        builder.push(" OFFSET ").push_bind(offset);

        let posts = builder
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(returned = posts.len(), "Post listing completed");

        Ok(posts)
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    #[instrument(skip(self, post))]
    async fn create_post(&self, author_id: Uuid, post: &NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, title, text, author_id, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(&post.title)
        .bind(&post.text)
        .bind(author_id)
        .bind(post.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    #[instrument(skip(self, changes))]
    async fn update_post(&self, post_id: Uuid, changes: &UpdatePostDto) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                text = COALESCE($3, text),
                category_id = COALESCE($4, category_id)
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(changes.title.as_deref())
        .bind(changes.text.as_deref())
        .bind(changes.category)
        .fetch_optional(&self.pool)
        .await?;

        post.ok_or(Error::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
