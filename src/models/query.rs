use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::posts::Post;

/// Query string of `GET /posts/`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    pub week: Option<i64>,
    pub page: Option<u32>,
}

/// Query string of `GET /posts/search/`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub week: Option<i64>,
}

/// Start of the recency window, or `None` when `week` asks for no filtering.
pub fn recency_cutoff(week: Option<i64>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    week.filter(|weeks| *weeks > 0)
        .and_then(TimeDelta::try_weeks)
        .and_then(|window| now.checked_sub_signed(window))
}

/// Constraints applied to the post collection before ordering and paging.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PostFilter {
    pub created_after: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub author: Option<Uuid>,
}

impl PostFilter {
    pub fn recent(week: Option<i64>, now: DateTime<Utc>) -> Self {
        Self {
            created_after: recency_cutoff(week, now),
            ..Self::default()
        }
    }

    pub fn authored_by(author: Uuid) -> Self {
        Self {
            author: Some(author),
            ..Self::default()
        }
    }

    /// An empty or missing term leaves the filter unconstrained.
    pub fn with_search(mut self, q: Option<&str>) -> Self {
        self.search = q.filter(|q| !q.is_empty()).map(str::to_owned);
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some(created_after) = self.created_after {
            if post.created_at < created_after {
                return false;
            }
        }

        if let Some(author) = self.author {
            if post.author != author {
                return false;
            }
        }

        match &self.search {
            Some(q) => {
                let q = q.to_lowercase();
                post.title.to_lowercase().contains(&q) || post.text.to_lowercase().contains(&q)
            }
            None => true,
        }
    }
}
