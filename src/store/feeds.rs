//! SQL for the `feeds` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::app::{EstuaryError, Result};
use crate::domain::Feed;

const SELECT_FEED: &str = "SELECT id, url, title, author, website_url, enabled FROM feeds";

/// Map a `feeds` row by column name.
pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Feed> {
    Ok(Feed {
        id: row.get("id")?,
        url: row.get("url")?,
        title: row.get("title")?,
        author: row.get("author")?,
        website_url: row.get("website_url")?,
        enabled: row.get("enabled")?,
    })
}

pub fn insert(conn: &Connection, feed: &Feed) -> Result<i64> {
    conn.execute(
        "INSERT INTO feeds (url, title, author, website_url, enabled)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            feed.url,
            feed.title,
            feed.author,
            feed.website_url,
            feed.enabled
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn update(conn: &Connection, feed: &Feed) -> Result<()> {
    let changed = conn.execute(
        "UPDATE feeds SET url = ?1, title = ?2, author = ?3, website_url = ?4, enabled = ?5
         WHERE id = ?6",
        params![
            feed.url,
            feed.title,
            feed.author,
            feed.website_url,
            feed.enabled,
            feed.id
        ],
    )?;

    if changed == 0 {
        return Err(EstuaryError::FeedNotFound(feed.id.to_string()));
    }
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Feed>> {
    let feed = conn
        .query_row(
            &format!("{SELECT_FEED} WHERE id = ?1"),
            params![id],
            from_row,
        )
        .optional()?;

    Ok(feed)
}

pub fn get_by_url(conn: &Connection, url: &str) -> Result<Option<Feed>> {
    let feed = conn
        .query_row(
            &format!("{SELECT_FEED} WHERE url = ?1 ORDER BY id LIMIT 1"),
            params![url],
            from_row,
        )
        .optional()?;

    Ok(feed)
}

pub fn list_all(conn: &Connection) -> Result<Vec<Feed>> {
    let mut stmt = conn.prepare(&format!("{SELECT_FEED} ORDER BY title ASC, id ASC"))?;
    let feeds = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(feeds)
}

/// Enabled feeds sorted by title, ties kept in insertion order.
pub fn list_enabled(conn: &Connection) -> Result<Vec<Feed>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_FEED} WHERE enabled = 1 ORDER BY title ASC, id ASC"
    ))?;
    let feeds = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(feeds)
}
