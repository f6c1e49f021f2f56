use feed_rs::model::Link;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{EstuaryError, Result};
use crate::domain::{FeedMeta, Post};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS, Atom or JSON feed document into feed metadata and the
    /// posts worth storing. Entries lacking a link, a title or a date are
    /// dropped.
    pub fn normalize(&self, feed_id: i64, body: &[u8]) -> Result<(FeedMeta, Vec<Post>)> {
        // Entries without a guid keep an empty id so the post falls back to
        // its URL as natural key.
        let feed = parser::Builder::new()
            .id_generator(|_, _, _| String::new())
            .build()
            .parse(body)
            .map_err(|e| EstuaryError::FeedParse(e.to_string()))?;

        let meta = FeedMeta {
            title: feed
                .title
                .map(|t| decode_html_entities(&t.content).trim().to_string()),
            author: feed.authors.first().map(|a| a.name.trim().to_string()),
            website_url: website_link(&feed.links).map(|l| l.href.clone()),
        };

        let total = feed.entries.len();
        let posts: Vec<Post> = feed
            .entries
            .into_iter()
            .map(|entry| {
                let mut post = Post::new(feed_id);

                post.guid = entry.id;
                post.url = website_link(&entry.links)
                    .map(|l| l.href.clone())
                    .unwrap_or_default();
                post.date = entry.published.or(entry.updated);
                post.title = entry
                    .title
                    .map(|t| decode_html_entities(&t.content).trim().to_string())
                    .unwrap_or_default();
                post.author = entry
                    .authors
                    .first()
                    .map(|a| a.name.trim().to_string())
                    .filter(|name| !name.is_empty());
                post.content = entry
                    .content
                    .and_then(|c| c.body)
                    .filter(|body| !body.is_empty())
                    .or_else(|| entry.summary.map(|s| s.content))
                    .unwrap_or_default();

                post
            })
            .filter(Post::is_publishable)
            .collect();

        if posts.len() < total {
            tracing::debug!("Dropped {} incomplete entries", total - posts.len());
        }

        Ok((meta, posts))
    }
}

/// The link pointing at the human-readable page: the first `alternate` (or
/// untyped) link, else the first link of any kind.
fn website_link(links: &[Link]) -> Option<&Link> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
}
