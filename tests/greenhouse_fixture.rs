// tests/greenhouse_fixture.rs
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use jobwatch::sources::greenhouse::GreenhouseAdapter;
use jobwatch::{Notifier, Pipeline, Posting, SeenStore, SourceAdapter};

struct CountingNotifier {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _source: &str, posting: &Posting) -> Result<()> {
        self.sent.lock().unwrap().push(posting.link.clone());
        Ok(())
    }
    fn name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test]
async fn fixture_board_flows_through_the_whole_pipeline() {
    let json: &str = include_str!("fixtures/greenhouse_jobs.json");
    let adapter = GreenhouseAdapter::from_fixture("exampleco", json);

    // The fixture holds three entries, two distinct links (one repost).
    let postings = adapter.fetch().await.unwrap();
    assert_eq!(postings.len(), 3);

    let tmp = tempfile::tempdir().unwrap();
    let notifier = Arc::new(CountingNotifier {
        sent: Mutex::new(Vec::new()),
    });
    let pipeline = Pipeline::new(
        SeenStore::new(tmp.path()),
        notifier.clone() as Arc<dyn Notifier>,
        Duration::from_secs(5),
    );

    let first = pipeline.run_cycle("exampleco", &adapter).await.unwrap();
    assert_eq!(first.new, 2);
    assert_eq!(notifier.sent.lock().unwrap().len(), 2);

    let second = pipeline.run_cycle("exampleco", &adapter).await.unwrap();
    assert_eq!(second.new, 0);
    assert_eq!(notifier.sent.lock().unwrap().len(), 2);
}
