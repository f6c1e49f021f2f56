//! Merge freshly fetched posts into the posts already stored for a feed.
//!
//! Reconciliation runs entirely in memory. The caller persists
//! [`Reconciliation::posts`] afterwards.

use std::collections::{HashMap, HashSet};

use crate::app::{EstuaryError, Result};
use crate::domain::Post;

/// Outcome of merging one feed's incoming posts into its stored posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Incoming posts whose natural key was unknown, in incoming order.
    pub new_posts: Vec<Post>,
    /// Stored posts whose content changed, carrying the incoming values.
    pub updated_posts: Vec<Post>,
    /// Full set to persist: stored posts (updates applied) then new posts.
    pub posts: Vec<Post>,
}

impl Reconciliation {
    pub fn is_unchanged(&self) -> bool {
        self.new_posts.is_empty() && self.updated_posts.is_empty()
    }
}

pub fn reconcile(existing: &[Post], incoming: &[Post]) -> Result<Reconciliation> {
    // Later duplicates win, matching a map built in order.
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(existing.len());
    for (position, post) in existing.iter().enumerate() {
        let key = post.natural_key();
        if key.is_empty() {
            return Err(EstuaryError::EmptyNaturalKey);
        }
        index.insert(key, position);
    }

    let mut merged: Vec<Post> = existing.to_vec();
    let mut new_posts = Vec::new();
    let mut updated_positions = Vec::new();
    let mut updated_seen = HashSet::new();

    for post in incoming {
        let key = post.natural_key();
        if key.is_empty() {
            return Err(EstuaryError::EmptyNaturalKey);
        }

        match index.get(key) {
            None => new_posts.push(post.clone()),
            Some(&position) => {
                let stored = &merged[position];
                if stored.same_content(post) {
                    continue;
                }
                merged[position] = stored.with_content_of(post);
                if updated_seen.insert(position) {
                    updated_positions.push(position);
                }
            }
        }
    }

    let updated_posts = updated_positions
        .iter()
        .map(|&position| merged[position].clone())
        .collect();
    merged.extend(new_posts.iter().cloned());

    Ok(Reconciliation {
        new_posts,
        updated_posts,
        posts: merged,
    })
}
