//! Static site generation.
//!
//! A run rebuilds the whole output directory from one read snapshot of the
//! store:
//!
//! ```text
//! output/
//!   page-00001.html ... page-NNNNN.html
//!   feeds.html
//!   about.html
//!   index.html        (redirects to page-00001.html)
//!   rss.xml
//!   js/ css/ img/ fonts/
//! ```
//!
//! Any error aborts the run and may leave the directory incomplete; the next
//! run starts from scratch anyway.

pub mod output;
pub mod pages;
pub mod render;
pub mod rss;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::app::{EstuaryError, Result};
use crate::config::{GeneratorConfig, SiteConfig};
use crate::domain::Feed;
use crate::store::{Snapshot, SqliteStore};

use pages::{last_page, page_file_name, FeedsPage, PostView, PostsPage, SiteView, FIRST_PAGE};
pub use render::{AskamaRenderer, Page, Renderer};

/// Summary of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub pages: usize,
    pub posts: usize,
    pub assets: usize,
}

pub struct Generator<R> {
    site: SiteConfig,
    config: GeneratorConfig,
    output_dir: PathBuf,
    renderer: R,
}

impl<R: Renderer> Generator<R> {
    pub fn new(site: SiteConfig, config: GeneratorConfig, output_dir: PathBuf, renderer: R) -> Self {
        Self {
            site,
            config,
            output_dir,
            renderer,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn generate(&self, store: &SqliteStore) -> Result<GenerationReport> {
        if self.config.posts_per_page == 0 || self.config.feed_window == 0 {
            return Err(EstuaryError::Config(
                "page size and feed window must be at least 1".into(),
            ));
        }

        tracing::info!("Generating website in {}", self.output_dir.display());

        output::reset_dir(&self.output_dir)?;
        let assets = output::copy_assets(
            &self.config.assets_path(),
            &self.output_dir,
            &self.config.asset_dirs,
        )?;

        let now = Utc::now();
        let site = SiteView::new(&self.site, now);

        let (pages, posts) = store.with_snapshot(|snapshot| {
            let feeds = snapshot.enabled_feeds()?;
            let feeds_by_id: HashMap<i64, &Feed> = feeds.iter().map(|f| (f.id, f)).collect();
            let total = usize::try_from(snapshot.count_visible_posts()?)
                .map_err(|e| EstuaryError::Other(e.to_string()))?;

            let (pages, posts) = self.write_post_pages(snapshot, &site, &feeds_by_id, total, now)?;
            if posts != total {
                tracing::warn!("Rendered {} posts but counted {}", posts, total);
            }

            self.write_page("feeds.html", &site, &Page::Feeds(&FeedsPage::new(&feeds)))?;
            self.write_page("about.html", &site, &Page::About)?;
            self.write_page("index.html", &site, &Page::Index { target: FIRST_PAGE })?;
            self.write_rss(snapshot, &feeds_by_id, now)?;

            Ok((pages, posts))
        })?;

        tracing::info!("Generated {} pages with {} posts", pages, posts);
        Ok(GenerationReport {
            pages,
            posts,
            assets,
        })
    }

    /// Write `page-NNNNN.html` files until the store runs out of posts.
    /// Page 1 is always written, empty if need be, so `index.html` never
    /// points at a missing file.
    fn write_post_pages(
        &self,
        snapshot: &Snapshot<'_>,
        site: &SiteView,
        feeds: &HashMap<i64, &Feed>,
        total: usize,
        now: DateTime<Utc>,
    ) -> Result<(usize, usize)> {
        let per_page = self.config.posts_per_page;
        let last_page = last_page(total, per_page);

        let mut offset = 0;
        let mut page = 1;
        loop {
            let posts = snapshot.visible_posts(per_page, offset)?;
            if posts.is_empty() && page > 1 {
                break;
            }

            let views = posts
                .iter()
                .map(|post| {
                    feeds
                        .get(&post.feed_id)
                        .map(|feed| PostView::new(post, feed, now))
                        .ok_or_else(|| EstuaryError::FeedNotFound(post.feed_id.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;

            let data = PostsPage::new(page, last_page, views);
            self.write_page(&page_file_name(page), site, &Page::Posts(&data))?;
            tracing::debug!("Wrote {} with {} posts", data.file_name(), posts.len());

            if posts.is_empty() {
                break;
            }
            offset += posts.len();
            page += 1;
        }

        let pages = if offset == 0 { 1 } else { page - 1 };
        Ok((pages, offset))
    }

    fn write_page(&self, file_name: &str, site: &SiteView, page: &Page<'_>) -> Result<()> {
        let bytes = self.renderer.render(site, page)?;
        output::write_file(&self.output_dir.join(file_name), &bytes)
    }

    fn write_rss(
        &self,
        snapshot: &Snapshot<'_>,
        feeds: &HashMap<i64, &Feed>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let posts = snapshot.visible_posts(self.config.feed_window, 0)?;
        let xml = rss::build_rss(&self.site, &posts, feeds, now)?;
        output::write_file(&self.output_dir.join("rss.xml"), xml.as_bytes())
    }
}
