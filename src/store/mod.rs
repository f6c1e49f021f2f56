pub mod feeds;
pub mod posts;
pub mod sqlite;

use crate::app::Result;
use crate::domain::{Feed, Post};

pub use sqlite::{Snapshot, SqliteStore};

/// Storage operations used by the update cycle. Every write method runs in
/// its own transaction.
pub trait Store {
    // Feed operations
    fn add_feed(&self, feed: &Feed) -> Result<i64>;
    fn get_feed(&self, id: i64) -> Result<Option<Feed>>;
    fn get_feed_by_url(&self, url: &str) -> Result<Option<Feed>>;
    fn get_all_feeds(&self) -> Result<Vec<Feed>>;
    fn get_enabled_feeds(&self) -> Result<Vec<Feed>>;
    fn update_feed(&self, feed: &Feed) -> Result<()>;

    // Post operations
    fn get_posts_by_feed(&self, feed_id: i64) -> Result<Vec<Post>>;
    fn count_posts_by_feed(&self, feed_id: i64) -> Result<i64>;
    /// Delete every post of the feed and insert `posts`, atomically.
    fn replace_posts(&self, feed_id: i64, posts: &[Post]) -> Result<usize>;
}
