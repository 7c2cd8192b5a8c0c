//! Non-fatal checks over a loaded mapping list.
use std::collections::HashMap;
use std::path::Path;

use super::mappings::MappingEntry;

/// A problem worth telling the user about that does not stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Zero-based index of the entry in declaration order.
    pub index: usize,
    /// Description of the offending entry.
    pub item: String,
    /// What is wrong with it.
    pub message: String,
}

/// Check `entries` for configuration mistakes.
///
/// Reports entries that can never apply, link destinations declared more
/// than once, sources missing from `configs_dir`, and append entries whose
/// destination is also a link on the same platform.
#[must_use]
pub fn validate(entries: &[MappingEntry], configs_dir: &Path) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut first_link_at: HashMap<&Path, usize> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let warn = |message: String| ValidationWarning {
            index,
            item: entry.description(),
            message,
        };

        if entry.platforms().is_empty() {
            warnings.push(warn("empty platform list; entry never applies".to_string()));
        }

        if let Some(source) = entry.source() {
            let path = configs_dir.join(source);
            if path.symlink_metadata().is_err() {
                warnings.push(warn(format!("source not found: {}", path.display())));
            }
        }

        if let MappingEntry::Link { destination, .. } = entry {
            if let Some(first) = first_link_at.get(destination.as_path()) {
                warnings.push(warn(format!(
                    "destination already linked by entry {}",
                    first + 1
                )));
            } else {
                first_link_at.insert(destination.as_path(), index);
            }
        }
    }

    for (index, entry) in entries.iter().enumerate() {
        let MappingEntry::Append { destination, .. } = entry else {
            continue;
        };
        let linked_by = entries.iter().position(|other| {
            matches!(other, MappingEntry::Link { .. })
                && other.destination() == destination.as_path()
                && !other.platforms().is_disjoint(entry.platforms())
        });
        if let Some(link_index) = linked_by {
            warnings.push(ValidationWarning {
                index,
                item: entry.description(),
                message: format!(
                    "destination is linked by entry {}; the line would be written into its source",
                    link_index + 1
                ),
            });
        }
    }

    warnings
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    #[test]
    fn clean_entries_produce_no_warnings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tmux.conf"), "").unwrap();
        let entries = vec![MappingEntry::link(
            "tmux.conf",
            "/h/.tmux.conf",
            [Platform::Linux],
        )];
        assert!(validate(&entries, dir.path()).is_empty());
    }

    #[test]
    fn empty_platform_list_warns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tmux.conf"), "").unwrap();
        let entries = vec![MappingEntry::link("tmux.conf", "/h/.tmux.conf", [])];
        let warnings = validate(&entries, dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("never applies"));
    }

    #[test]
    fn duplicate_link_destination_warns_on_second() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "").unwrap();
        std::fs::write(dir.path().join("b"), "").unwrap();
        let entries = vec![
            MappingEntry::link("a", "/h/.zshrc", [Platform::Linux]),
            MappingEntry::link("b", "/h/.zshrc", [Platform::Darwin]),
        ];
        let warnings = validate(&entries, dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index, 1);
        assert!(warnings[0].message.contains("entry 1"));
    }

    #[test]
    fn append_to_linked_destination_warns_about_write_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zshrc"), "").unwrap();
        let entries = vec![
            MappingEntry::link("zshrc", "/h/.zshrc", [Platform::Darwin, Platform::Linux]),
            MappingEntry::append(None, "/h/.zshrc", "export A=1", [Platform::Darwin]),
        ];
        let warnings = validate(&entries, dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index, 1);
        assert!(warnings[0].message.contains("linked by entry 1"));
    }

    #[test]
    fn append_and_link_on_different_platforms_do_not_warn() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zshrc"), "").unwrap();
        let entries = vec![
            MappingEntry::link("zshrc", "/h/.zshrc", [Platform::Linux]),
            MappingEntry::append(None, "/h/.zshrc", "export A=1", [Platform::Darwin]),
        ];
        assert!(validate(&entries, dir.path()).is_empty());
    }

    #[test]
    fn missing_source_warns() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![MappingEntry::link("nvim", "/h/.config/nvim", [Platform::Linux])];
        let warnings = validate(&entries, dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("source not found"));
    }
}
