use std::path::Path;

use crate::app::{AppContext, Result};
use crate::store::Store;

pub async fn add_feed(ctx: &AppContext, url: &str, author: Option<String>) -> Result<()> {
    let (feed, report) = ctx.updater.add_feed(url, author).await?;

    println!("Added feed: {} ({})", feed.display_title(), feed.url);
    println!("Stored {} posts", report.total_posts);
    Ok(())
}

pub async fn update_feeds(ctx: &AppContext) -> Result<()> {
    let results = ctx.updater.update_all().await?;

    if results.is_empty() {
        println!("No feeds to update");
        return Ok(());
    }

    let mut total_new = 0;
    let mut total_updated = 0;
    let mut errors = 0;

    for (feed, result) in results {
        match result {
            Ok(report) => {
                total_new += report.new_posts;
                total_updated += report.updated_posts;
                if report.new_posts > 0 || report.updated_posts > 0 {
                    println!(
                        "  {} new, {} updated posts from {}",
                        report.new_posts,
                        report.updated_posts,
                        feed.display_title()
                    );
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("  Error updating {}: {}", feed.display_title(), e);
            }
        }
    }

    println!(
        "Update complete: {} new posts, {} updated posts, {} errors",
        total_new, total_updated, errors
    );
    Ok(())
}

pub fn generate(ctx: &AppContext, output: &Path) -> Result<()> {
    let report = ctx.generator(output.to_path_buf()).generate(&ctx.store)?;

    println!(
        "Generated {} pages with {} posts in {}",
        report.pages,
        report.posts,
        output.display()
    );
    Ok(())
}

/// Update, then generate. Generation only starts once every feed worker has
/// finished.
pub async fn run(ctx: &AppContext, output: &Path) -> Result<()> {
    update_feeds(ctx).await?;
    generate(ctx, output)
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.store.get_all_feeds()?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        let posts = ctx.store.count_posts_by_feed(feed.id)?;
        let status = if feed.enabled { "" } else { " [disabled]" };
        println!(
            "{} ({} posts){}\n  {}",
            feed.display_title(),
            posts,
            status,
            feed.url
        );
    }

    Ok(())
}
