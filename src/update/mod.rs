//! Feed update cycles.
//!
//! Each enabled feed goes through fetch → normalize → metadata refresh →
//! reconcile → replace-all. Feeds run on a bounded pool of tokio tasks;
//! [`Updater::update_all`] returns only once every task has finished.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::config::UpdateConfig;
use crate::domain::{Feed, FeedMeta, Post};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::reconcile::reconcile;
use crate::store::Store;

/// What one successful cycle changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub feed_id: i64,
    pub new_posts: usize,
    pub updated_posts: usize,
    pub total_posts: usize,
}

pub struct Updater<S> {
    store: Arc<S>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    semaphore: Arc<Semaphore>,
}

impl<S: Store + Send + Sync + 'static> Updater<S> {
    pub fn new(
        store: Arc<S>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        config: &UpdateConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            normalizer: Normalizer::new(),
            semaphore: Arc::new(Semaphore::new(config.workers.max(1))),
        }
    }

    /// Update every enabled feed. A failing feed only fails its own entry.
    pub async fn update_all(&self) -> Result<Vec<(Feed, Result<UpdateReport>)>> {
        let feeds = self.store.get_enabled_feeds()?;
        tracing::info!("{} feeds loaded", feeds.len());

        let handles = feeds.into_iter().map(|feed| {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let store = self.store.clone();
            let normalizer = self.normalizer.clone();

            tokio::spawn(async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => {
                        update_feed(fetcher.as_ref(), &normalizer, store.as_ref(), &feed).await
                    }
                    Err(e) => Err(EstuaryError::Other(format!("Worker pool closed: {}", e))),
                };
                (feed, result)
            })
        });

        let mut results = Vec::new();
        for joined in join_all(handles).await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        Ok(results)
    }

    /// Subscribe to a new feed and store its current posts.
    ///
    /// The source must provide a title and a website URL. `author` takes
    /// precedence over the author the source advertises.
    pub async fn add_feed(
        &self,
        url: &str,
        author: Option<String>,
    ) -> Result<(Feed, UpdateReport)> {
        Url::parse(url)?;

        if self.store.get_feed_by_url(url)?.is_some() {
            return Err(EstuaryError::FeedExists(url.to_string()));
        }

        let body = self.fetcher.fetch(url).await?;
        let (meta, incoming) = self.normalizer.normalize(0, &body)?;

        let mut feed = Feed::new(url.to_string());
        feed.apply_metadata(&meta);
        if let Some(author) = author.filter(|a| !a.trim().is_empty()) {
            feed.author = Some(author);
        }

        if feed.title.is_empty() {
            return Err(EstuaryError::FeedParse(format!("{}: missing feed title", url)));
        }
        if feed.website_url.is_empty() {
            return Err(EstuaryError::FeedParse(format!(
                "{}: missing feed website url",
                url
            )));
        }

        feed.id = self.store.add_feed(&feed)?;
        tracing::info!("Added feed {} ({})", feed.title, feed.id);

        let incoming: Vec<Post> = incoming
            .into_iter()
            .map(|post| Post {
                feed_id: feed.id,
                ..post
            })
            .collect();
        let report = persist_posts(self.store.as_ref(), feed.id, &[], &incoming)?;

        Ok((feed, report))
    }
}

async fn update_feed<S: Store>(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    store: &S,
    feed: &Feed,
) -> Result<UpdateReport> {
    tracing::info!("Updating feed {}", feed.url);

    let fetched = fetcher
        .fetch(&feed.url)
        .await
        .and_then(|body| normalizer.normalize(feed.id, &body));
    let (meta, incoming) =
        fetched.inspect_err(|e| tracing::warn!("Skipping feed {}: {}", feed.url, e))?;

    let report = refresh_and_persist(store, feed, &meta, &incoming)
        .inspect_err(|e| tracing::warn!("Could not store feed {}: {}", feed.url, e))?;

    tracing::info!(
        "{} new posts, {} updated posts for {}",
        report.new_posts,
        report.updated_posts,
        feed.url
    );
    Ok(report)
}

fn refresh_and_persist<S: Store>(
    store: &S,
    feed: &Feed,
    meta: &FeedMeta,
    incoming: &[Post],
) -> Result<UpdateReport> {
    let mut refreshed = feed.clone();
    refreshed.apply_metadata(meta);
    if refreshed != *feed {
        store.update_feed(&refreshed)?;
    }

    let existing = store.get_posts_by_feed(feed.id)?;
    persist_posts(store, feed.id, &existing, incoming)
}

/// Reconcile in memory, then replace the feed's stored posts in one
/// transaction.
fn persist_posts<S: Store>(
    store: &S,
    feed_id: i64,
    existing: &[Post],
    incoming: &[Post],
) -> Result<UpdateReport> {
    let reconciliation = reconcile(existing, incoming)?;
    let total_posts = store.replace_posts(feed_id, &reconciliation.posts)?;

    Ok(UpdateReport {
        feed_id,
        new_posts: reconciliation.new_posts.len(),
        updated_posts: reconciliation.updated_posts.len(),
        total_posts,
    })
}
