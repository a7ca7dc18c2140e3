use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{Error, Result};

use super::body::{JsonFields, NOT_A_STRING, NOT_A_UUID};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    #[sqlx(rename = "author_id")]
    pub author: Uuid,
    #[sqlx(rename = "category_id")]
    pub category: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /posts/` and `PUT /posts/{id}/`. The author is never read
/// from the body. Missing fields are reported by `into_new_post`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Text may not be blank"))]
    pub text: Option<String>,
    pub category: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Text may not be blank"))]
    pub text: Option<String>,
    pub category: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub category: Uuid,
}

fn required<T>(errors: &mut ValidationErrors, field: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        let mut error = ValidationError::new("required");
        error.message = Some("This field is required.".into());
        errors.add(field, error);
    }
    value
}

impl CreatePostDto {
    /// Validates the body and unwraps the required fields, collecting every
    /// failure into one per-field report.
    pub fn into_new_post(self) -> Result<NewPost> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        let title = required(&mut errors, "title", self.title);
        let text = required(&mut errors, "text", self.text);
        let category = required(&mut errors, "category", self.category);

        match (title, text, category) {
            (Some(title), Some(text), Some(category)) if errors.is_empty() => Ok(NewPost {
                title,
                text,
                category,
            }),
            _ => Err(Error::ValidationFailed(errors)),
        }
    }
}

impl TryFrom<Value> for CreatePostDto {
    type Error = Error;

    fn try_from(body: Value) -> Result<Self> {
        let mut fields = JsonFields::new(body)?;
        let post = Self {
            title: fields.take("title", NOT_A_STRING),
            text: fields.take("text", NOT_A_STRING),
            category: fields.take("category", NOT_A_UUID),
        };
        fields.finish()?;
        Ok(post)
    }
}

impl TryFrom<Value> for UpdatePostDto {
    type Error = Error;

    fn try_from(body: Value) -> Result<Self> {
        let mut fields = JsonFields::new(body)?;
        let changes = Self {
            title: fields.take("title", NOT_A_STRING),
            text: fields.take("text", NOT_A_STRING),
            category: fields.take("category", NOT_A_UUID),
        };
        fields.finish()?;
        Ok(changes)
    }
}

impl From<NewPost> for UpdatePostDto {
    fn from(post: NewPost) -> Self {
        Self {
            title: Some(post.title),
            text: Some(post.text),
            category: Some(post.category),
        }
    }
}
