//! Label ledger derivations.
//!
//! The distinct label set and the per-label counts are derived from the
//! entry list on demand; with a batch of at most a few hundred images there
//! is nothing worth caching.

use crate::model::ImageEntry;

/// Distinct non-empty labels in first-occurrence order.
///
/// Hotkey digits map positionally into this list, so the order must be
/// stable across recomputations: the first label ever assigned stays key 1.
pub fn distinct_labels(entries: &[ImageEntry]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for entry in entries {
        if let Some(label) = entry.label() {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }
    labels
}

/// Per-label occurrence counts, in first-occurrence order.
///
/// Unlabeled entries are omitted. Returned as ordered pairs rather than a
/// map so the results summary renders in a stable order.
pub fn label_counts(entries: &[ImageEntry]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in entries {
        if let Some(label) = entry.label() {
            match counts.iter_mut().find(|(name, _)| name == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label.to_string(), 1)),
            }
        }
    }
    counts
}
