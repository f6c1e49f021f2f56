//! SQL for the `posts` table.
//!
//! A post is visible when both the post and its feed are enabled.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::app::Result;
use crate::domain::Post;

const SELECT_VISIBLE: &str = "SELECT p.id AS id, p.guid AS guid, p.url AS url,
            p.feed_id AS feed_id, p.date AS date, p.title AS title,
            p.author AS author, p.content AS content, p.enabled AS enabled
     FROM posts AS p
     INNER JOIN feeds AS f ON f.id = p.feed_id
     WHERE f.enabled = 1 AND p.enabled = 1";

/// Map a `posts` row by column name.
pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        guid: row.get("guid")?,
        url: row.get("url")?,
        feed_id: row.get("feed_id")?,
        date: date_from_column(row.get("date")?),
        title: row.get("title")?,
        author: row.get("author")?,
        content: row.get("content")?,
        enabled: row.get("enabled")?,
    })
}

/// Unknown dates are stored as `0`.
pub fn date_to_column(date: Option<DateTime<Utc>>) -> i64 {
    date.map(|d| d.timestamp()).unwrap_or(0)
}

pub fn date_from_column(value: i64) -> Option<DateTime<Utc>> {
    if value == 0 {
        None
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

pub fn insert(conn: &Connection, post: &Post) -> Result<i64> {
    conn.execute(
        "INSERT INTO posts (guid, url, feed_id, date, title, author, content, enabled)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            post.guid,
            post.url,
            post.feed_id,
            date_to_column(post.date),
            post.title,
            post.author,
            post.content,
            post.enabled
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn list_by_feed(conn: &Connection, feed_id: i64) -> Result<Vec<Post>> {
    let mut stmt = conn.prepare(
        "SELECT id, guid, url, feed_id, date, title, author, content, enabled
         FROM posts WHERE feed_id = ?1 ORDER BY id",
    )?;
    let posts = stmt
        .query_map(params![feed_id], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(posts)
}

pub fn delete_by_feed(conn: &Connection, feed_id: i64) -> Result<usize> {
    let deleted = conn.execute("DELETE FROM posts WHERE feed_id = ?1", params![feed_id])?;
    Ok(deleted)
}

pub fn count_by_feed(conn: &Connection, feed_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE feed_id = ?1",
        params![feed_id],
        |row| row.get(0),
    )?;

    Ok(count)
}

pub fn count_visible(conn: &Connection) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM posts AS p
         INNER JOIN feeds AS f ON f.id = p.feed_id
         WHERE f.enabled = 1 AND p.enabled = 1",
        [],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Newest visible posts first.
pub fn list_visible(conn: &Connection, limit: usize, offset: usize) -> Result<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_VISIBLE} ORDER BY p.date DESC, p.id DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let posts = stmt
        .query_map(params![limit as i64, offset as i64], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(posts)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_unknown_date_uses_zero_sentinel() {
        assert_eq!(date_to_column(None), 0);
        assert_eq!(date_from_column(0), None);
    }

    #[test]
    fn test_date_column_keeps_seconds() {
        let date = Utc.with_ymd_and_hms(2016, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(date_from_column(date_to_column(Some(date))), Some(date));
    }
}
