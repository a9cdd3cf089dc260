//! Configuration for course service module

use serde::Deserialize;

/// Course service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How many times an auto-assigned order is recomputed after another
    /// writer took it
    #[serde(default = "default_order_retry_limit")]
    pub order_retry_limit: u32,

    /// Require video items to carry an absolute http(s) URL
    #[serde(default = "default_true")]
    pub validate_video_urls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_retry_limit: default_order_retry_limit(),
            validate_video_urls: true,
        }
    }
}

fn default_order_retry_limit() -> u32 {
    3
}

fn default_true() -> bool {
    true
}
