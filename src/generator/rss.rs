//! RSS 2.0 document for the most recent posts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rss::validation::Validate;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::app::{EstuaryError, Result};
use crate::config::SiteConfig;
use crate::domain::{Feed, Post};

/// Build the channel XML. Items that fail validation (e.g. a relative link
/// in the source feed) are left out rather than failing the whole run.
pub fn build_rss(
    site: &SiteConfig,
    posts: &[Post],
    feeds: &HashMap<i64, &Feed>,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut items = Vec::with_capacity(posts.len());
    for post in posts {
        let feed = feeds
            .get(&post.feed_id)
            .ok_or_else(|| EstuaryError::FeedNotFound(post.feed_id.to_string()))?;

        let item = post_to_rss_item(post, feed);
        match item.validate() {
            Ok(()) => items.push(item),
            Err(e) => tracing::warn!("Leaving {} out of the RSS feed: {}", post.url, e),
        }
    }

    let channel = ChannelBuilder::default()
        .title(site.title.clone())
        .link(site.url.clone())
        .description(site.description.clone())
        .last_build_date(Some(now.to_rfc2822()))
        .generator(Some(format!("estuary {}", env!("CARGO_PKG_VERSION"))))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| EstuaryError::Rss(e.to_string()))?;
    Ok(channel.to_string())
}

fn post_to_rss_item(post: &Post, feed: &Feed) -> rss::Item {
    ItemBuilder::default()
        .title(Some(post.title.clone()))
        .link(Some(post.url.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(true)
                .value(post.url.clone())
                .build(),
        ))
        .author(Some(post.resolve_author(feed).to_string()))
        .pub_date(post.date.map(|d| d.to_rfc2822()))
        .description(Some(post.content.clone()))
        .build()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn feed() -> Feed {
        Feed {
            id: 1,
            url: "https://example.com/feed.xml".into(),
            title: "Example".into(),
            author: None,
            website_url: "https://example.com".into(),
            enabled: true,
        }
    }

    fn post(url: &str, title: &str) -> Post {
        let mut post = Post::new(1);
        post.guid = url.into();
        post.url = url.into();
        post.title = title.into();
        post.content = "<p>Body</p>".into();
        post.date = Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        post
    }

    #[test]
    fn test_items_map_post_fields() {
        let feed = feed();
        let feeds = HashMap::from([(1, &feed)]);
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();

        let xml = build_rss(
            &SiteConfig::default(),
            &[post("https://example.com/a", "First post")],
            &feeds,
            now,
        )
        .unwrap();

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.title(), "Estuary");
        assert_eq!(channel.items().len(), 1);

        let item = &channel.items()[0];
        assert_eq!(item.title(), Some("First post"));
        assert_eq!(item.link(), Some("https://example.com/a"));
        assert_eq!(item.guid().map(|g| g.value()), Some("https://example.com/a"));
        assert_eq!(item.author(), Some("Example"));
        assert_eq!(item.description(), Some("<p>Body</p>"));
        assert_eq!(item.pub_date(), Some("Fri, 1 Mar 2024 08:00:00 +0000"));
    }

    #[test]
    fn test_invalid_items_are_skipped() {
        let feed = feed();
        let feeds = HashMap::from([(1, &feed)]);

        let xml = build_rss(
            &SiteConfig::default(),
            &[
                post("/relative/link", "Broken"),
                post("https://example.com/b", "Fine"),
            ],
            &feeds,
            Utc::now(),
        )
        .unwrap();

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.items().len(), 1);
        assert_eq!(channel.items()[0].title(), Some("Fine"));
    }
}
