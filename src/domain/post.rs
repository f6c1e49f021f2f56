use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feed::{non_empty, Feed};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub guid: String,
    pub url: String,
    pub feed_id: i64,
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    pub author: Option<String>,
    pub content: String,
    pub enabled: bool,
}

impl Post {
    pub fn new(feed_id: i64) -> Self {
        Self {
            id: 0,
            guid: String::new(),
            url: String::new(),
            feed_id,
            date: None,
            title: String::new(),
            author: None,
            content: String::new(),
            enabled: true,
        }
    }

    /// Identity of a post across fetch cycles: the GUID when present,
    /// otherwise the URL.
    pub fn natural_key(&self) -> &str {
        if self.guid.is_empty() {
            &self.url
        } else {
            &self.guid
        }
    }

    /// Items without a URL, a title or a date are never stored.
    pub fn is_publishable(&self) -> bool {
        !self.url.is_empty() && !self.title.is_empty() && self.date.is_some()
    }

    /// Compare the fields a fetch is allowed to change.
    pub fn same_content(&self, other: &Post) -> bool {
        self.guid == other.guid
            && self.url == other.url
            && self.date == other.date
            && self.title == other.title
            && self.author == other.author
            && self.content == other.content
    }

    /// Copy the fetch-controlled fields of `other` onto a copy of `self`,
    /// keeping identity, ownership and enablement.
    pub fn with_content_of(&self, other: &Post) -> Post {
        Post {
            guid: other.guid.clone(),
            url: other.url.clone(),
            date: other.date,
            title: other.title.clone(),
            author: other.author.clone(),
            content: other.content.clone(),
            ..self.clone()
        }
    }

    /// Byline shown for the post: its own author, then the feed author,
    /// then the feed title.
    pub fn resolve_author<'a>(&'a self, feed: &'a Feed) -> &'a str {
        non_empty(self.author.as_deref())
            .or_else(|| non_empty(feed.author.as_deref()))
            .unwrap_or(&feed.title)
    }
}
