// src/sources/mod.rs
pub mod greenhouse;

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::poll::config::SourceConfig;
use crate::poll::types::SourceAdapter;

/// Build the adapter a config entry asks for. Scraped (HTML/browser) sources
/// plug in behind the same trait from their own crates; the built-in path is
/// JSON job-board APIs.
pub fn build_adapter(cfg: &SourceConfig) -> Result<Arc<dyn SourceAdapter>> {
    if let Some(board) = &cfg.board {
        return Ok(Arc::new(greenhouse::GreenhouseAdapter::from_board(
            &cfg.name, board,
        )));
    }
    if let Some(url) = &cfg.url {
        return Ok(Arc::new(greenhouse::GreenhouseAdapter::from_url(
            &cfg.name, url,
        )));
    }
    Err(anyhow!("source '{}' has no endpoint configured", cfg.name))
}
