use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction};
use rusqlite_migration::{Migrations, M};

use crate::app::{EstuaryError, Result};
use crate::domain::{Feed, Post};
use crate::store::{feeds, posts, Store};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::debug!("Opening database at {}", path.as_ref().display());
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| EstuaryError::Other(format!("Database lock poisoned: {}", e)))
    }

    /// Run `f` inside one transaction. It commits when `f` succeeds and
    /// rolls back otherwise. A failed rollback leaves the database in an
    /// unknown state, so the process aborts.
    pub fn with_tx<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!(
                        "Cannot roll back transaction after \"{}\": {}",
                        err,
                        rollback_err
                    );
                    std::process::abort();
                }
                Err(err)
            }
        }
    }

    /// Run `f` against a read snapshot: every query it issues sees the same
    /// committed state.
    pub fn with_snapshot<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Snapshot<'_>) -> Result<T>,
    {
        self.with_tx(|tx| f(&Snapshot { conn: tx }))
    }
}

/// Read-only view over one open transaction, used for site generation.
pub struct Snapshot<'a> {
    conn: &'a Connection,
}

impl Snapshot<'_> {
    pub fn enabled_feeds(&self) -> Result<Vec<Feed>> {
        feeds::list_enabled(self.conn)
    }

    pub fn count_visible_posts(&self) -> Result<i64> {
        posts::count_visible(self.conn)
    }

    pub fn visible_posts(&self, limit: usize, offset: usize) -> Result<Vec<Post>> {
        posts::list_visible(self.conn, limit, offset)
    }
}

impl Store for SqliteStore {
    fn add_feed(&self, feed: &Feed) -> Result<i64> {
        self.with_tx(|tx| feeds::insert(tx, feed))
    }

    fn get_feed(&self, id: i64) -> Result<Option<Feed>> {
        let conn = self.lock()?;
        feeds::get(&conn, id)
    }

    fn get_feed_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let conn = self.lock()?;
        feeds::get_by_url(&conn, url)
    }

    fn get_all_feeds(&self) -> Result<Vec<Feed>> {
        let conn = self.lock()?;
        feeds::list_all(&conn)
    }

    fn get_enabled_feeds(&self) -> Result<Vec<Feed>> {
        let conn = self.lock()?;
        feeds::list_enabled(&conn)
    }

    fn update_feed(&self, feed: &Feed) -> Result<()> {
        self.with_tx(|tx| feeds::update(tx, feed))
    }

    fn get_posts_by_feed(&self, feed_id: i64) -> Result<Vec<Post>> {
        let conn = self.lock()?;
        posts::list_by_feed(&conn, feed_id)
    }

    fn count_posts_by_feed(&self, feed_id: i64) -> Result<i64> {
        let conn = self.lock()?;
        posts::count_by_feed(&conn, feed_id)
    }

    fn replace_posts(&self, feed_id: i64, new_posts: &[Post]) -> Result<usize> {
        self.with_tx(|tx| {
            let deleted = posts::delete_by_feed(tx, feed_id)?;
            for post in new_posts {
                posts::insert(tx, post)?;
            }
            tracing::debug!(
                "Replaced {} posts with {} for feed {}",
                deleted,
                new_posts.len(),
                feed_id
            );
            Ok(new_posts.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn add_feed(store: &SqliteStore, title: &str, enabled: bool) -> i64 {
        let mut feed = Feed::new(format!("https://{}.example.com/feed.xml", title));
        feed.title = title.into();
        feed.website_url = format!("https://{}.example.com", title);
        feed.enabled = enabled;
        store.add_feed(&feed).unwrap()
    }

    fn make_post(feed_id: i64, n: i64) -> Post {
        let mut post = Post::new(feed_id);
        post.guid = format!("guid-{}-{}", feed_id, n);
        post.url = format!("https://example.com/{}/{}", feed_id, n);
        post.title = format!("Post {}", n);
        post.content = "<p>body</p>".into();
        post.date = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n));
        post
    }

    #[test]
    fn test_add_and_get_feed() {
        let store = SqliteStore::in_memory().unwrap();
        let id = add_feed(&store, "alpha", true);

        let retrieved = store.get_feed(id).unwrap().unwrap();
        assert_eq!(retrieved.id, id);
        assert_eq!(retrieved.url, "https://alpha.example.com/feed.xml");
        assert_eq!(retrieved.author, None);
        assert!(retrieved.enabled);

        let by_url = store
            .get_feed_by_url("https://alpha.example.com/feed.xml")
            .unwrap();
        assert_eq!(by_url, Some(retrieved));
    }

    #[test]
    fn test_update_feed() {
        let store = SqliteStore::in_memory().unwrap();
        let id = add_feed(&store, "alpha", true);

        let mut feed = store.get_feed(id).unwrap().unwrap();
        feed.author = Some("Alice".into());
        store.update_feed(&feed).unwrap();

        assert_eq!(store.get_feed(id).unwrap().unwrap(), feed);
    }

    #[test]
    fn test_update_unknown_feed_fails() {
        let store = SqliteStore::in_memory().unwrap();
        let mut feed = Feed::new("https://nowhere.example.com".into());
        feed.id = 99;

        assert!(matches!(
            store.update_feed(&feed),
            Err(EstuaryError::FeedNotFound(_))
        ));
    }

    #[test]
    fn test_enabled_feeds_sorted_by_title_then_id() {
        let store = SqliteStore::in_memory().unwrap();
        let zulu = add_feed(&store, "zulu", true);
        let first_alpha = add_feed(&store, "alpha", true);
        add_feed(&store, "disabled", false);
        let second_alpha = add_feed(&store, "alpha", true);

        let ids: Vec<i64> = store
            .get_enabled_feeds()
            .unwrap()
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![first_alpha, second_alpha, zulu]);
        assert_eq!(store.get_all_feeds().unwrap().len(), 4);
    }

    #[test]
    fn test_post_referencing_missing_feed_is_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        let result = store.with_tx(|tx| posts::insert(tx, &make_post(42, 1)));

        assert!(matches!(result, Err(EstuaryError::Database(_))));
    }

    #[test]
    fn test_replace_posts_swaps_the_whole_set() {
        let store = SqliteStore::in_memory().unwrap();
        let feed_id = add_feed(&store, "alpha", true);

        store
            .replace_posts(feed_id, &[make_post(feed_id, 1), make_post(feed_id, 2)])
            .unwrap();
        store.replace_posts(feed_id, &[make_post(feed_id, 3)]).unwrap();

        let stored = store.get_posts_by_feed(feed_id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].guid, format!("guid-{}-3", feed_id));
        assert_eq!(stored[0].date, make_post(feed_id, 3).date);
        assert_eq!(store.count_posts_by_feed(feed_id).unwrap(), 1);
    }

    #[test]
    fn test_failed_replace_leaves_posts_untouched() {
        let store = SqliteStore::in_memory().unwrap();
        let alpha = add_feed(&store, "alpha", true);
        let beta = add_feed(&store, "beta", true);

        store
            .replace_posts(alpha, &[make_post(alpha, 1), make_post(alpha, 2)])
            .unwrap();
        store.replace_posts(beta, &[make_post(beta, 1)]).unwrap();
        let alpha_before = store.get_posts_by_feed(alpha).unwrap();
        let beta_before = store.get_posts_by_feed(beta).unwrap();

        // The second post points at a feed that does not exist.
        let result = store.replace_posts(alpha, &[make_post(alpha, 3), make_post(999, 4)]);

        assert!(result.is_err());
        assert_eq!(store.get_posts_by_feed(alpha).unwrap(), alpha_before);
        assert_eq!(store.get_posts_by_feed(beta).unwrap(), beta_before);
    }

    #[test]
    fn test_visible_posts_require_both_enablements() {
        let store = SqliteStore::in_memory().unwrap();
        let on = add_feed(&store, "on", true);
        let off = add_feed(&store, "off", false);

        let mut hidden = make_post(on, 3);
        hidden.enabled = false;
        store
            .replace_posts(on, &[make_post(on, 1), make_post(on, 2), hidden])
            .unwrap();
        store.replace_posts(off, &[make_post(off, 4)]).unwrap();

        store
            .with_snapshot(|snapshot| {
                assert_eq!(snapshot.count_visible_posts()?, 2);
                let titles: Vec<String> = snapshot
                    .visible_posts(10, 0)?
                    .into_iter()
                    .map(|p| p.title)
                    .collect();
                assert_eq!(titles, vec!["Post 2", "Post 1"]);
                assert_eq!(snapshot.visible_posts(10, 1)?.len(), 1);
                assert_eq!(snapshot.enabled_feeds()?.len(), 1);
                Ok(())
            })
            .unwrap();
    }
}
