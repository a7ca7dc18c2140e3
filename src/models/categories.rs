use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{Error, Result};

use super::body::{JsonFields, NOT_A_STRING};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
}

impl TryFrom<Value> for CreateCategoryDto {
    type Error = Error;

    fn try_from(body: Value) -> Result<Self> {
        let mut fields = JsonFields::new(body)?;
        let name = fields.take("name", NOT_A_STRING);
        fields.finish()?;

        Ok(Self {
            name: name.unwrap_or_default(),
        })
    }
}
