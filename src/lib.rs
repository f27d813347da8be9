// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod dedup;
pub mod metrics;
pub mod notify;
pub mod poll;
pub mod sources;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::notify::{format_message, Notifier, NotifierMux};
pub use crate::poll::types::{Posting, SourceAdapter};
pub use crate::poll::{CycleOutcome, Pipeline};
pub use crate::store::SeenStore;
