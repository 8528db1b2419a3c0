//! Classification session state.
//!
//! One session covers the lifetime of a batch: entries are appended on
//! upload, the current index moves over them, and the session finishes when a
//! classification action lands on the last entry. Entries are never removed
//! within a session; a new batch starts with `reset`.

use crate::model::ImageEntry;

/// Image data handed over from a file picker (name plus raw bytes).
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Filename of the image
    pub name: String,
    /// Raw image data bytes
    pub data: Vec<u8>,
}

/// Result of an `advance` call.
///
/// `AtEnd` is a signal, not an error: plain navigation treats it as a no-op,
/// while the classification path treats it as the terminal transition of the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next entry
    Moved,
    /// Already at the last entry
    AtEnd,
}

/// State for one classification session.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Ordered image entries; the label ledger lives on the entries
    entries: Vec<ImageEntry>,
    /// Index of the entry currently being viewed
    current_index: usize,
    /// Set once a classification action lands on the last entry
    finished: bool,
    /// Bumped on every reset so stale export results can be discarded
    generation: u64,
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append new (unlabeled) entries at the end of the sequence.
    ///
    /// The current index is left untouched. Appending to a finished session
    /// is rejected; the session must be reset first.
    pub fn append(&mut self, entries: Vec<ImageEntry>) {
        if self.finished {
            log::warn!("Ignoring {} new images: session is finished", entries.len());
            return;
        }
        if entries.is_empty() {
            return;
        }
        log::info!("📂 Added {} images ({} total)", entries.len(), self.entries.len() + entries.len());
        self.entries.extend(entries);
    }

    /// Move to the next entry, or report that we are already at the last.
    pub fn advance(&mut self) -> Advance {
        if self.current_index + 1 < self.entries.len() {
            self.current_index += 1;
            Advance::Moved
        } else {
            Advance::AtEnd
        }
    }

    /// Move to the previous entry. No-op at index 0; returns whether moved.
    pub fn retreat(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// The entry currently being viewed, if the session has any.
    pub fn current(&self) -> Option<&ImageEntry> {
        self.entries.get(self.current_index)
    }

    /// Display name of the current entry.
    pub fn current_name(&self) -> Option<&str> {
        self.current().map(|e| e.name.as_str())
    }

    /// Overwrite the label of the entry at `index` (empty becomes `None`).
    pub fn set_label(&mut self, index: usize, label: Option<String>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.set_label(label);
        } else {
            log::warn!("set_label: index {} out of bounds", index);
        }
    }

    /// The shared classification action: label the current entry, then move
    /// on. Landing on the last entry finishes the session.
    ///
    /// Ignored when the session is empty or already finished.
    pub fn classify(&mut self, label: Option<String>) {
        if self.finished || self.entries.is_empty() {
            log::debug!("classify ignored: empty or finished session");
            return;
        }
        let index = self.current_index;
        self.set_label(index, label);
        if self.advance() == Advance::AtEnd {
            self.finished = true;
            log::info!("✅ Classification complete ({} images)", self.entries.len());
        }
    }

    /// Discard all entries and start a fresh session.
    pub fn reset(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.current_index = 0;
        self.finished = false;
        self.generation += 1;
        if count > 0 {
            log::info!("🔄 Session reset ({} images discarded)", count);
        }
    }

    /// Get progress string like "3/15".
    pub fn progress(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.entries.len())
    }

    /// All entries, in upload order.
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Index of the entry currently being viewed.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of entries in the session.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the session holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the terminal transition has happened.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current session generation; bumped on reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(count: usize) -> SessionState {
        let mut session = SessionState::new();
        session.append(
            (0..count)
                .map(|i| ImageEntry::from_memory(format!("{}.png", i), vec![i as u8]))
                .collect(),
        );
        session
    }

    #[test]
    fn test_empty_session() {
        let session = SessionState::new();
        assert!(session.current().is_none());
        assert!(session.is_empty());
        assert!(!session.is_finished());
    }

    #[test]
    fn test_append_keeps_index() {
        let mut session = session_with(2);
        assert_eq!(session.advance(), Advance::Moved);
        assert_eq!(session.current_index(), 1);

        session.append(vec![ImageEntry::from_memory("late.png", vec![])]);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_advance_then_retreat_is_identity() {
        let mut session = session_with(5);
        session.advance();
        session.advance();
        let before = session.current_index();

        assert_eq!(session.advance(), Advance::Moved);
        assert!(session.retreat());
        assert_eq!(session.current_index(), before);
    }

    #[test]
    fn test_retreat_at_zero_is_noop() {
        let mut session = session_with(3);
        assert!(!session.retreat());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_advance_at_end_signals_without_moving() {
        let mut session = session_with(2);
        assert_eq!(session.advance(), Advance::Moved);
        assert_eq!(session.advance(), Advance::AtEnd);
        assert_eq!(session.current_index(), 1);
        // Navigation hitting the end does not finish the session.
        assert!(!session.is_finished());
    }

    #[test]
    fn test_classify_advances() {
        let mut session = session_with(3);
        session.classify(Some("cat".to_string()));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.entries()[0].label(), Some("cat"));
        assert!(!session.is_finished());
    }

    #[test]
    fn test_classify_last_entry_finishes() {
        let mut session = session_with(2);
        session.classify(Some("cat".to_string()));
        session.classify(Some("dog".to_string()));
        assert!(session.is_finished());
        // No further advance once finished.
        assert_eq!(session.current_index(), 1);
        session.classify(Some("bird".to_string()));
        assert_eq!(session.entries()[1].label(), Some("dog"));
    }

    #[test]
    fn test_classify_empty_label_advances_unlabeled() {
        let mut session = session_with(2);
        session.classify(Some(String::new()));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.entries()[0].label(), None);
    }

    #[test]
    fn test_append_after_finish_rejected() {
        let mut session = session_with(1);
        session.classify(Some("cat".to_string()));
        assert!(session.is_finished());

        session.append(vec![ImageEntry::from_memory("late.png", vec![])]);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_reset_clears_and_bumps_generation() {
        let mut session = session_with(3);
        let generation = session.generation();
        session.classify(Some("cat".to_string()));
        session.reset();

        assert!(session.is_empty());
        assert!(!session.is_finished());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.generation(), generation + 1);
    }

    #[test]
    fn test_progress_string() {
        let mut session = session_with(15);
        session.advance();
        session.advance();
        assert_eq!(session.progress(), "3/15");
    }
}
