use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKERS: usize = 4;

/// Configuration for feed updates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Feeds fetched concurrently (default: 4, 1 processes feeds one by one)
    pub workers: usize,

    /// HTTP timeout in seconds (default: 10)
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: 10,
            user_agent: format!("estuary/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
