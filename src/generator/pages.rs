//! Data handed to templates.

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::domain::{Feed, Post};

pub const FIRST_PAGE: &str = "page-00001.html";

/// `page-00001.html`, `page-00002.html`, ...
pub fn page_file_name(page: usize) -> String {
    format!("page-{:05}.html", page)
}

/// Number of the last post page: `ceil(total / per_page)`, never below 1.
pub fn last_page(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Rough age of a post, e.g. "3 days ago".
pub fn age_string(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    if years >= 2 {
        format!("{} years ago", years)
    } else if months >= 2 {
        format!("{} months ago", months)
    } else if days >= 2 {
        format!("{} days ago", days)
    } else if hours >= 2 {
        format!("{} hours ago", hours)
    } else if minutes >= 2 {
        format!("{} minutes ago", minutes)
    } else if seconds == 1 {
        "1 second ago".to_string()
    } else {
        format!("{} seconds ago", seconds)
    }
}

#[derive(Debug, Clone)]
pub struct SiteView {
    pub title: String,
    pub url: String,
    pub description: String,
    /// Empty when analytics are disabled
    pub analytics_id: String,
    pub generated_at: String,
}

impl SiteView {
    pub fn new(site: &SiteConfig, now: DateTime<Utc>) -> Self {
        Self {
            title: site.title.clone(),
            url: site.url.clone(),
            description: site.description.clone(),
            analytics_id: site.analytics_id.clone().unwrap_or_default(),
            generated_at: now.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostView {
    pub title: String,
    pub url: String,
    pub date: String,
    pub age: String,
    pub author: String,
    pub feed_title: String,
    pub feed_website_url: String,
    /// Raw HTML from the source feed
    pub content: String,
}

impl PostView {
    pub fn new(post: &Post, feed: &Feed, now: DateTime<Utc>) -> Self {
        Self {
            title: post.title.clone(),
            url: post.url.clone(),
            date: post
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            age: post.date.map(|d| age_string(d, now)).unwrap_or_default(),
            author: post.resolve_author(feed).to_string(),
            feed_title: feed.display_title().to_string(),
            feed_website_url: feed.website_url.clone(),
            content: post.content.clone(),
        }
    }
}

/// One page of posts with its navigation.
///
/// `previous_page` is 0 on the first page and `next_page` points past the
/// end on the last one; templates link them only when `has_previous` /
/// `has_next` are set.
#[derive(Debug, Clone)]
pub struct PostsPage {
    pub posts: Vec<PostView>,
    pub page: usize,
    pub previous_page: usize,
    pub next_page: usize,
    pub last_page: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PostsPage {
    pub fn new(page: usize, last_page: usize, posts: Vec<PostView>) -> Self {
        Self {
            posts,
            page,
            previous_page: page.saturating_sub(1),
            next_page: page + 1,
            last_page,
            has_previous: page > 1,
            has_next: page < last_page,
        }
    }

    pub fn file_name(&self) -> String {
        page_file_name(self.page)
    }

    pub fn previous_file(&self) -> String {
        page_file_name(self.previous_page)
    }

    pub fn next_file(&self) -> String {
        page_file_name(self.next_page)
    }

    pub fn last_file(&self) -> String {
        page_file_name(self.last_page)
    }
}

#[derive(Debug, Clone)]
pub struct FeedView {
    pub title: String,
    pub url: String,
    pub website_url: String,
    pub author: String,
}

#[derive(Debug, Clone)]
pub struct FeedsPage {
    pub feeds: Vec<FeedView>,
}

impl FeedsPage {
    pub fn new(feeds: &[Feed]) -> Self {
        let feeds = feeds
            .iter()
            .map(|feed| FeedView {
                title: feed.display_title().to_string(),
                url: feed.url.clone(),
                website_url: feed.website_url.clone(),
                author: feed.author.clone().unwrap_or_default(),
            })
            .collect();

        Self { feeds }
    }
}
