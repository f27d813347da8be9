// src/dedup.rs
//! Pure diff between a fresh listing and the seen-set for one source.

use std::collections::HashSet;

use crate::poll::types::Posting;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Postings never notified before, in listing order, one entry per link.
    pub new: Vec<Posting>,
    /// `seen` plus every link in the fresh listing, not just the new ones.
    /// Merging the whole listing keeps the set monotonic even when a flaky
    /// adapter omits a previously-seen posting on one run.
    pub updated_seen: HashSet<String>,
}

/// Compute which postings in `fresh` have never been notified.
///
/// Duplicate links inside `fresh` are collapsed to their first occurrence
/// before comparing against `seen`. No I/O, deterministic.
pub fn diff(fresh: &[Posting], seen: &HashSet<String>) -> DiffResult {
    let mut updated_seen = seen.clone();
    let mut in_listing: HashSet<&str> = HashSet::with_capacity(fresh.len());
    let mut new = Vec::new();

    for posting in fresh {
        if !in_listing.insert(posting.link.as_str()) {
            continue;
        }
        if !seen.contains(&posting.link) {
            new.push(posting.clone());
        }
        updated_seen.insert(posting.link.clone());
    }

    DiffResult { new, updated_seen }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, link: &str) -> Posting {
        Posting::new(title, link)
    }

    #[test]
    fn new_postings_keep_listing_order() {
        let fresh = vec![posting("B", "L2"), posting("A", "L1"), posting("C", "L3")];
        let seen = HashSet::from(["L1".to_string()]);
        let d = diff(&fresh, &seen);
        assert_eq!(d.new, vec![posting("B", "L2"), posting("C", "L3")]);
    }

    #[test]
    fn duplicate_links_collapse_to_first_occurrence() {
        let fresh = vec![
            posting("A", "L1"),
            posting("B", "L2"),
            posting("A2", "L1"),
        ];
        let d = diff(&fresh, &HashSet::new());
        assert_eq!(d.new, vec![posting("A", "L1"), posting("B", "L2")]);
        assert_eq!(
            d.updated_seen,
            HashSet::from(["L1".to_string(), "L2".to_string()])
        );
    }

    #[test]
    fn updated_seen_is_superset_of_seen_and_fresh() {
        let fresh = vec![posting("A", "L1")];
        let seen = HashSet::from(["L0".to_string(), "L9".to_string()]);
        let d = diff(&fresh, &seen);
        assert!(d.updated_seen.contains("L0"));
        assert!(d.updated_seen.contains("L9"));
        assert!(d.updated_seen.contains("L1"));
    }

    #[test]
    fn delisted_postings_stay_seen() {
        // A posting the source stopped returning must not come back as new.
        let seen = HashSet::from(["L1".to_string()]);
        let fresh = vec![posting("B", "L2")];
        let d = diff(&fresh, &seen);
        assert_eq!(d.new, vec![posting("B", "L2")]);
        assert!(d.updated_seen.contains("L1"));
    }

    #[test]
    fn rerun_with_updated_seen_is_empty() {
        let fresh = vec![posting("A", "L1"), posting("B", "L2"), posting("A2", "L1")];
        let first = diff(&fresh, &HashSet::new());
        let second = diff(&fresh, &first.updated_seen);
        assert!(second.new.is_empty());
        assert_eq!(second.updated_seen, first.updated_seen);
    }
}
