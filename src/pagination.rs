//! Page-number pagination for post listings.
//!
//! Pages are 1-based and hold [`PAGE_SIZE`] records. A rendered page
//! carries the total count, links to its neighbours and the records with
//! their `text` shortened for display.

use serde::Serialize;

use crate::{models::posts::Post, Error, Result};

pub const PAGE_SIZE: u32 = 3;

/// Characters of `text` kept on a rendered page.
pub const PREVIEW_CHARS: usize = 15;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1),
            page_size: PAGE_SIZE,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    /// An empty collection still has a single (empty) first page.
    pub fn num_pages(&self, count: i64) -> i64 {
        let size = i64::from(self.page_size);
        ((count + size - 1) / size).max(1)
    }

    pub fn validate(&self, count: i64) -> Result<()> {
        if self.page == 0 || i64::from(self.page) > self.num_pages(count) {
            return Err(Error::InvalidPage);
        }
        Ok(())
    }
}

/// One page of a filtered collection, before rendering.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub request: PageRequest,
    pub count: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        i64::from(self.request.page) < self.request.num_pages(self.count)
    }

    pub fn has_previous(&self) -> bool {
        self.request.page > 1
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Builds neighbour links that keep the caller's other query parameters.
#[derive(Debug, Clone)]
pub struct PageLinks {
    base_url: String,
    params: Vec<(String, String)>,
}

impl PageLinks {
    pub fn new(base_url: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            base_url: base_url.into(),
            params: params.into_iter().filter(|(k, _)| k != "page").collect(),
        }
    }

    /// Link to `page`; the first page is addressed without a `page` parameter.
    pub fn link(&self, page: u32) -> String {
        let mut pairs: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        if page > 1 {
            pairs.push(format!("page={page}"));
        }

        if pairs.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, pairs.join("&"))
        }
    }
}

/// Shortens a post body to its first [`PREVIEW_CHARS`] characters followed
/// by an ellipsis. Applied regardless of the original length.
pub fn preview_text(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str(ELLIPSIS);
    preview
}

impl Page<Post> {
    /// Renders the page; only the records actually present are shortened,
    /// so a partial final page is handled like any other.
    pub fn render(self, links: &PageLinks) -> Paginated<Post> {
        let next = self.has_next().then(|| links.link(self.request.page + 1));
        let previous = self
            .has_previous()
            .then(|| links.link(self.request.page - 1));

        let results = self
            .results
            .into_iter()
            .map(|mut post| {
                post.text = preview_text(&post.text);
                post
            })
            .collect();

        Paginated {
            count: self.count,
            next,
            previous,
            results,
        }
    }
}
