//! Template rendering.
//!
//! The generator only knows [`Renderer`]: a page goes in, bytes come out.
//! [`AskamaRenderer`] renders the templates compiled from `templates/`.

use askama::Template;

use crate::app::Result;
use crate::generator::pages::{FeedsPage, PostsPage, SiteView};

/// A page to render. The variant selects the template.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    Posts(&'a PostsPage),
    Feeds(&'a FeedsPage),
    About,
    /// Redirect to `target`
    Index { target: &'a str },
}

impl Page<'_> {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Posts(_) => "posts",
            Page::Feeds(_) => "feeds",
            Page::About => "about",
            Page::Index { .. } => "index",
        }
    }
}

pub trait Renderer {
    fn render(&self, site: &SiteView, page: &Page<'_>) -> Result<Vec<u8>>;
}

#[derive(Template)]
#[template(path = "posts.html")]
struct PostsTemplate<'a> {
    site: &'a SiteView,
    page: &'a PostsPage,
}

#[derive(Template)]
#[template(path = "feeds.html")]
struct FeedsTemplate<'a> {
    site: &'a SiteView,
    page: &'a FeedsPage,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate<'a> {
    site: &'a SiteView,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    site: &'a SiteView,
    target: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaRenderer;

impl Renderer for AskamaRenderer {
    fn render(&self, site: &SiteView, page: &Page<'_>) -> Result<Vec<u8>> {
        let html = match *page {
            Page::Posts(page) => PostsTemplate { site, page }.render()?,
            Page::Feeds(page) => FeedsTemplate { site, page }.render()?,
            Page::About => AboutTemplate { site }.render()?,
            Page::Index { target } => IndexTemplate { site, target }.render()?,
        };

        Ok(html.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::config::SiteConfig;
    use crate::generator::pages::PostView;

    fn site() -> SiteView {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        SiteView::new(&SiteConfig::default(), now)
    }

    fn post_view(title: &str) -> PostView {
        PostView {
            title: title.into(),
            url: "https://example.com/post".into(),
            date: "2024-05-30".into(),
            age: "2 days ago".into(),
            author: "Alice".into(),
            feed_title: "Example".into(),
            feed_website_url: "https://example.com".into(),
            content: "<p>Raw <em>html</em></p>".into(),
        }
    }

    fn render(page: Page<'_>) -> String {
        String::from_utf8(AskamaRenderer.render(&site(), &page).unwrap()).unwrap()
    }

    #[test]
    fn test_posts_page_links_only_existing_neighbours() {
        let first = PostsPage::new(1, 2, vec![post_view("Tom & Jerry")]);
        let html = render(Page::Posts(&first));

        assert!(html.contains("Tom &#38; Jerry"));
        assert!(!html.contains("Tom & Jerry"));
        assert!(html.contains("<p>Raw <em>html</em></p>"));
        assert!(html.contains("page-00002.html"));
        assert!(!html.contains("page-00000.html"));

        let last = PostsPage::new(2, 2, vec![post_view("Second")]);
        let html = render(Page::Posts(&last));
        assert!(html.contains("page-00001.html"));
        assert!(!html.contains("page-00003.html"));
    }

    #[test]
    fn test_index_redirects_to_target() {
        let html = render(Page::Index {
            target: "page-00001.html",
        });
        assert!(html.contains("url=page-00001.html"));
    }

    #[test]
    fn test_feeds_page_lists_titles() {
        let page = FeedsPage {
            feeds: vec![crate::generator::pages::FeedView {
                title: "Example Blog".into(),
                url: "https://example.com/feed.xml".into(),
                website_url: "https://example.com".into(),
                author: String::new(),
            }],
        };
        let html = render(Page::Feeds(&page));
        assert!(html.contains("Example Blog"));
        assert!(html.contains("feed.xml"));
    }

    #[test]
    fn test_template_names() {
        assert_eq!(Page::About.template_name(), "about");
        assert_eq!(Page::Index { target: "x" }.template_name(), "index");
    }
}
