//! # Estuary
//!
//! A feed aggregator ("planet") that stores RSS/Atom posts in SQLite and
//! renders them into a static website.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Reconcile → Store → Generator
//! ```
//!
//! An update cycle fetches every enabled feed on a bounded worker pool,
//! reconciles the incoming posts against the stored ones and replaces the
//! feed's posts in one transaction. Generation then reads one snapshot of
//! the store and writes paginated HTML pages plus an RSS document.
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe to a feed
//! estuary add-feed https://blog.rust-lang.org/feed.xml
//!
//! # Update every feed and rebuild the site
//! estuary run public/
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store, the
/// updater and the generator from one configuration.
pub mod app;

/// Command-line interface using clap.
///
/// - `add-feed <url>` - Subscribe to a feed
/// - `update` - Update all enabled feeds
/// - `generate <output>` - Render the website
/// - `run <output>` - Update, then generate
/// - `list` - List feeds with post counts
pub mod cli;

/// Configuration loaded from `~/.config/estuary/config.toml`.
pub mod config;

/// Core domain models: [`Feed`](domain::Feed) and [`Post`](domain::Post).
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Static site generation: paginated post pages, feed list, RSS output.
pub mod generator;

/// Feed parsing and normalization.
///
/// Converts RSS and Atom documents into feed metadata and
/// [`Post`](domain::Post) values.
pub mod normalizer;

/// Classification of incoming posts against stored ones.
pub mod reconcile;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Concurrent feed update cycles.
pub mod update;
