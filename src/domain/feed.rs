use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub website_url: String,
    pub enabled: bool,
}

impl Feed {
    pub fn new(url: String) -> Self {
        Self {
            id: 0,
            url,
            title: String::new(),
            author: None,
            website_url: String::new(),
            enabled: true,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    /// Refresh cached metadata from a fetch. Empty source values never
    /// overwrite what is already stored.
    pub fn apply_metadata(&mut self, meta: &FeedMeta) {
        if let Some(title) = non_empty(meta.title.as_deref()) {
            self.title = title.to_string();
        }
        if let Some(author) = non_empty(meta.author.as_deref()) {
            self.author = Some(author.to_string());
        }
        if let Some(website_url) = non_empty(meta.website_url.as_deref()) {
            self.website_url = website_url.to_string();
        }
    }
}

/// Feed-level metadata extracted from a downloaded document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub website_url: Option<String>,
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
