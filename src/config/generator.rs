use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Site-wide strings shown on every page and in the RSS channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,

    /// Public address of the generated site, used as the RSS channel link
    pub url: String,

    pub description: String,

    /// Analytics tracking identifier, omitted from pages when unset
    pub analytics_id: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Estuary".to_string(),
            url: "http://localhost/".to_string(),
            description: "An aggregator of various blogs.".to_string(),
            analytics_id: None,
        }
    }
}

/// Configuration for site generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Posts per HTML page (default: 10)
    pub posts_per_page: usize,

    /// Posts included in rss.xml (default: 10)
    pub feed_window: usize,

    /// Directory holding shared data files (default: ".")
    pub share_dir: PathBuf,

    /// Directory under `share_dir` holding static assets (default: "www")
    pub assets_dir: PathBuf,

    /// Asset subdirectories copied into the output
    pub asset_dirs: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            feed_window: 10,
            share_dir: PathBuf::from("."),
            assets_dir: PathBuf::from("www"),
            asset_dirs: vec![
                "js".to_string(),
                "css".to_string(),
                "img".to_string(),
                "fonts".to_string(),
            ],
        }
    }
}

impl GeneratorConfig {
    pub fn assets_path(&self) -> PathBuf {
        self.share_dir.join(&self.assets_dir)
    }
}
