//! Export planning: label-partitioned grouping of classified entries.

use crate::model::ImageEntry;

/// One file scheduled for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// File name inside the label directory (collision-free)
    pub archive_name: String,
    /// Index of the entry in the session's entry list
    pub entry_index: usize,
}

/// All files sharing one label.
#[derive(Debug, Clone)]
pub struct LabelGroup {
    /// The label as the user typed it
    pub label: String,
    /// Directory name inside the archive (sanitized, collision-free)
    pub directory: String,
    /// Files in entry order
    pub files: Vec<ExportFile>,
}

/// The label-partitioned export plan.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    /// Groups in first-occurrence label order
    pub groups: Vec<LabelGroup>,
}

impl ExportBundle {
    /// Group labeled entries by label, in first-occurrence order.
    ///
    /// Unlabeled entries are skipped. Labels are free text, so each one is
    /// reduced to a single safe path component; duplicate file names within a
    /// label get an entry-index prefix.
    pub fn plan(entries: &[ImageEntry]) -> Self {
        let mut bundle = ExportBundle::default();

        for (entry_index, entry) in entries.iter().enumerate() {
            let Some(label) = entry.label() else {
                continue;
            };

            let group_index = match bundle.groups.iter().position(|g| g.label == label) {
                Some(index) => index,
                None => {
                    let directory = bundle.unique_directory(sanitize_component(label));
                    bundle.groups.push(LabelGroup {
                        label: label.to_string(),
                        directory,
                        files: Vec::new(),
                    });
                    bundle.groups.len() - 1
                }
            };

            let group = &mut bundle.groups[group_index];
            let base_name = sanitize_component(&entry.name);
            let archive_name = if group.files.iter().any(|f| f.archive_name == base_name) {
                format!("{}_{}", entry_index, base_name)
            } else {
                base_name
            };
            group.files.push(ExportFile {
                archive_name,
                entry_index,
            });
        }

        bundle
    }

    /// Total number of files across all groups.
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    /// Whether no entry made it into the plan.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Pick a directory name no other group uses yet.
    ///
    /// Distinct labels can sanitize to the same component ("a/b" and "a_b");
    /// they must not share a directory or their files would merge.
    fn unique_directory(&self, base: String) -> String {
        if !self.groups.iter().any(|g| g.directory == base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.groups.iter().any(|g| g.directory == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Reduce free text to a single path component.
///
/// Separators and control characters become underscores; names that would
/// collapse to only dots (".", "..") are replaced entirely so no label can
/// address outside its own directory.
fn sanitize_component(text: &str) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, label: Option<&str>) -> ImageEntry {
        let mut e = ImageEntry::from_memory(name, vec![]);
        e.set_label(label.map(String::from));
        e
    }

    #[test]
    fn test_plan_groups_by_label_in_first_occurrence_order() {
        let entries = vec![
            entry("1.png", Some("cat")),
            entry("2.png", Some("dog")),
            entry("3.png", Some("cat")),
        ];
        let bundle = ExportBundle::plan(&entries);

        assert_eq!(bundle.groups.len(), 2);
        assert_eq!(bundle.groups[0].label, "cat");
        assert_eq!(bundle.groups[0].files.len(), 2);
        assert_eq!(bundle.groups[1].label, "dog");
        assert_eq!(bundle.groups[1].files.len(), 1);
        assert_eq!(bundle.file_count(), 3);
    }

    #[test]
    fn test_plan_skips_unlabeled() {
        let entries = vec![entry("1.png", Some("cat")), entry("2.png", None)];
        let bundle = ExportBundle::plan(&entries);
        assert_eq!(bundle.file_count(), 1);
    }

    #[test]
    fn test_plan_empty_when_nothing_labeled() {
        let entries = vec![entry("1.png", None)];
        assert!(ExportBundle::plan(&entries).is_empty());
    }

    #[test]
    fn test_duplicate_names_get_index_prefix() {
        let entries = vec![
            entry("photo.png", Some("cat")),
            entry("photo.png", Some("cat")),
        ];
        let bundle = ExportBundle::plan(&entries);
        let names: Vec<&str> = bundle.groups[0]
            .files
            .iter()
            .map(|f| f.archive_name.as_str())
            .collect();
        assert_eq!(names, vec!["photo.png", "1_photo.png"]);
    }

    #[test]
    fn test_hostile_label_stays_in_one_component() {
        let entries = vec![entry("1.png", Some("../evil")), entry("2.png", Some(".."))];
        let bundle = ExportBundle::plan(&entries);

        assert_eq!(bundle.groups[0].directory, ".._evil");
        assert_eq!(bundle.groups[1].directory, "_");
        for group in &bundle.groups {
            assert!(!group.directory.contains('/'));
            assert!(!group.directory.contains('\\'));
            assert_ne!(group.directory, "..");
        }
    }

    #[test]
    fn test_colliding_sanitized_labels_get_distinct_directories() {
        let entries = vec![entry("1.png", Some("a/b")), entry("2.png", Some("a_b"))];
        let bundle = ExportBundle::plan(&entries);

        assert_eq!(bundle.groups[0].directory, "a_b");
        assert_eq!(bundle.groups[1].directory, "a_b-2");
    }
}
