// src/sources/greenhouse.rs
//! Adapter for Greenhouse-hosted job boards.
//!
//! Greenhouse exposes listings as plain JSON at
//! `https://boards-api.greenhouse.io/v1/boards/{board}/jobs`, so no HTML
//! scraping is involved. The fixture mode feeds canned JSON to tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::poll::types::{Posting, SourceAdapter};

#[derive(Debug, Deserialize)]
struct Board {
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct Job {
    title: Option<String>,
    absolute_url: Option<String>,
}

pub struct GreenhouseAdapter {
    name: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl GreenhouseAdapter {
    pub fn from_board(name: &str, board: &str) -> Self {
        let url = format!("https://boards-api.greenhouse.io/v1/boards/{board}/jobs");
        Self::from_url(name, &url)
    }

    pub fn from_url(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: Mode::Http {
                url: url.to_string(),
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture(name: &str, json: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: Mode::Fixture(json.to_string()),
        }
    }

    fn parse_listing(s: &str) -> Result<Vec<Posting>> {
        let board: Board = serde_json::from_str(s).context("parsing greenhouse jobs json")?;

        let mut out = Vec::with_capacity(board.jobs.len());
        for job in board.jobs {
            let title = job.title.unwrap_or_default().trim().to_string();
            let link = job.absolute_url.unwrap_or_default();
            // Entries without a link have no identity; skip them.
            if link.is_empty() {
                continue;
            }
            out.push(Posting { title, link });
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for GreenhouseAdapter {
    async fn fetch(&self) -> Result<Vec<Posting>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_listing(s),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("non-2xx from {url}"))?
                    .text()
                    .await
                    .context("reading greenhouse body")?;
                Self::parse_listing(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jobs_and_skips_linkless_entries() {
        let json = r#"{
            "jobs": [
                {"title": " Software Intern ", "absolute_url": "https://boards.example/jobs/1"},
                {"title": "No link"},
                {"title": "Backend Intern", "absolute_url": "https://boards.example/jobs/2"}
            ]
        }"#;
        let postings = GreenhouseAdapter::parse_listing(json).unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "Software Intern");
        assert_eq!(postings[0].link, "https://boards.example/jobs/1");
        assert_eq!(postings[1].link, "https://boards.example/jobs/2");
    }

    #[test]
    fn garbled_body_is_an_error() {
        assert!(GreenhouseAdapter::parse_listing("<html>busy</html>").is_err());
    }

    #[tokio::test]
    async fn fixture_mode_fetches() {
        let adapter = GreenhouseAdapter::from_fixture(
            "example",
            r#"{"jobs": [{"title": "A", "absolute_url": "https://x/1"}]}"#,
        );
        let postings = adapter.fetch().await.unwrap();
        assert_eq!(postings, vec![Posting::new("A", "https://x/1")]);
        assert_eq!(adapter.name(), "example");
    }
}
