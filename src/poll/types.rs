// src/poll/types.rs
use anyhow::Result;

/// One job listing. `link` is the stable identity: two postings with the
/// same link are the same posting no matter what the title says.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Posting {
    pub title: String,
    pub link: String,
}

impl Posting {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Boundary to one job source. Returns the current full listing; may be slow
/// or flaky, and may repeat a posting across paginated fetches (the deduper
/// collapses repeats by link).
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Posting>>;
    fn name(&self) -> &str;
}
