// src/notify/mod.rs
pub mod discord;
pub mod slack;

use anyhow::Result;

use crate::poll::types::Posting;

/// Delivery boundary for one posting. Implementations own their transport
/// timeout and retry policy; a failed delivery comes back as `Err`, never a
/// panic, and never blocks sibling postings in the same cycle.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, source: &str, posting: &Posting) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Message body shared by all backends. Wording is cosmetic; title and link
/// are the contract.
pub fn format_message(source: &str, posting: &Posting) -> String {
    format!(
        "New {source} posting: {title}\n{link}",
        title = posting.title,
        link = posting.link
    )
}

/// Fan-out over every configured backend.
pub struct NotifierMux {
    backends: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Build from env: Discord via `DISCORD_WEBHOOK_URL` (required for a
    /// useful deployment), Slack via `SLACK_WEBHOOK_URL` (optional).
    pub fn from_env(timeout_secs: u64) -> Self {
        let mut mux = Self::new();
        if let Ok(url) = std::env::var("DISCORD_WEBHOOK_URL") {
            mux.push(Box::new(
                discord::DiscordNotifier::new(url).with_timeout(timeout_secs),
            ));
        }
        if let Some(slack) = slack::SlackNotifier::from_env() {
            mux.push(Box::new(slack.with_timeout(timeout_secs)));
        }
        mux
    }

    pub fn push(&mut self, backend: Box<dyn Notifier>) {
        self.backends.push(backend);
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl Default for NotifierMux {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Notifier for NotifierMux {
    /// Attempts every backend; per-backend failures are logged and the last
    /// one is returned. The result feeds logs and metrics only — the commit
    /// decision never depends on it.
    async fn send(&self, source: &str, posting: &Posting) -> Result<()> {
        let mut last_err = None;
        for backend in &self.backends {
            if let Err(e) = backend.send(source, posting).await {
                tracing::warn!(
                    source,
                    backend = backend.name(),
                    link = %posting.link,
                    error = ?e,
                    "notification backend failed"
                );
                last_err = Some(e);
            }
        }
        match last_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        "mux"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_title_and_link() {
        let p = Posting::new("Software Intern", "https://example.test/jobs/1");
        let msg = format_message("amazon", &p);
        assert!(msg.contains("Software Intern"));
        assert!(msg.contains("https://example.test/jobs/1"));
        assert!(msg.contains("amazon"));
    }

    #[test]
    fn message_is_deterministic() {
        let p = Posting::new("A", "L");
        assert_eq!(format_message("s", &p), format_message("s", &p));
    }
}
