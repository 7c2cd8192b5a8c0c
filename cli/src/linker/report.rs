//! Per-entry outcomes and the report that collects them.
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::LinkError;
use crate::logging::Log;

/// What happened to one mapping entry.
#[derive(Debug)]
pub enum LinkOutcome {
    /// The destination did not exist and now links to the source.
    Linked,
    /// The destination already linked to the source.
    AlreadyCorrect,
    /// The destination was moved to `backup` and replaced by a link.
    BackedUpAndLinked {
        /// Where the displaced destination now lives.
        backup: PathBuf,
    },
    /// The line was appended to the destination.
    Appended,
    /// The entry does not apply to the current platform.
    SkippedPlatform,
    /// The destination already contains the line.
    SkippedAlreadyPresent,
    /// The entry could not be applied.
    Failed(LinkError),
}

/// Payload-free discriminant of [`LinkOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// See [`LinkOutcome::Linked`].
    Linked,
    /// See [`LinkOutcome::AlreadyCorrect`].
    AlreadyCorrect,
    /// See [`LinkOutcome::BackedUpAndLinked`].
    BackedUpAndLinked,
    /// See [`LinkOutcome::Appended`].
    Appended,
    /// See [`LinkOutcome::SkippedPlatform`].
    SkippedPlatform,
    /// See [`LinkOutcome::SkippedAlreadyPresent`].
    SkippedAlreadyPresent,
    /// See [`LinkOutcome::Failed`].
    Failed,
}

impl OutcomeKind {
    /// Kebab-case name used in text and JSON reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::AlreadyCorrect => "already-correct",
            Self::BackedUpAndLinked => "backed-up-and-linked",
            Self::Appended => "appended",
            Self::SkippedPlatform => "skipped-platform",
            Self::SkippedAlreadyPresent => "skipped-already-present",
            Self::Failed => "failed",
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Linked | Self::Appended => "+",
            Self::AlreadyCorrect | Self::SkippedAlreadyPresent => "=",
            Self::BackedUpAndLinked => "~",
            Self::SkippedPlatform => "·",
            Self::Failed => "✗",
        }
    }

    const fn color(self) -> &'static str {
        match self {
            Self::Linked | Self::Appended => "\x1b[32m",
            Self::AlreadyCorrect | Self::SkippedAlreadyPresent | Self::SkippedPlatform => {
                "\x1b[2m"
            }
            Self::BackedUpAndLinked => "\x1b[33m",
            Self::Failed => "\x1b[31m",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LinkOutcome {
    /// Discriminant of this outcome.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Linked => OutcomeKind::Linked,
            Self::AlreadyCorrect => OutcomeKind::AlreadyCorrect,
            Self::BackedUpAndLinked { .. } => OutcomeKind::BackedUpAndLinked,
            Self::Appended => OutcomeKind::Appended,
            Self::SkippedPlatform => OutcomeKind::SkippedPlatform,
            Self::SkippedAlreadyPresent => OutcomeKind::SkippedAlreadyPresent,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Whether this outcome is a genuine failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The error, if this outcome is a failure.
    #[must_use]
    pub const fn error(&self) -> Option<&LinkError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Extra detail shown next to the outcome: the backup path or the failure.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::BackedUpAndLinked { backup } => Some(backup.display().to_string()),
            Self::Failed(e) => Some(format!("{}: {e}", e.kind())),
            _ => None,
        }
    }
}

/// Outcome of one entry, tagged with its position and description.
#[derive(Debug)]
pub struct EntryReport {
    /// Zero-based index in declaration order.
    pub index: usize,
    /// Description of the entry (see `MappingEntry::description`).
    pub description: String,
    /// What happened.
    pub outcome: LinkOutcome,
}

impl EntryReport {
    /// One plain-text report line.
    #[must_use]
    pub fn render(&self) -> String {
        let kind = self.outcome.kind();
        match self.outcome.detail() {
            Some(detail) => format!("{} {} ({kind}: {detail})", kind.marker(), self.description),
            None => format!("{} {} ({kind})", kind.marker(), self.description),
        }
    }
}

/// Outcomes of a whole `link_all` run, in declaration order.
#[derive(Debug, Default)]
pub struct LinkReport {
    /// Whether the run was a dry run (no filesystem changes made).
    pub dry_run: bool,
    /// One report per mapping entry.
    pub entries: Vec<EntryReport>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    dry_run: bool,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    index: usize,
    description: &'a str,
    outcome: OutcomeKind,
    detail: Option<String>,
}

impl LinkReport {
    /// Append the entries of `other`, renumbering them to follow this
    /// report's entries.
    pub fn extend(&mut self, other: Self) {
        let offset = self.entries.len();
        self.dry_run |= other.dry_run;
        self.entries
            .extend(other.entries.into_iter().map(|entry| EntryReport {
                index: entry.index + offset,
                ..entry
            }));
    }

    /// Whether any entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.is_failure())
    }

    /// Entries whose outcome is a failure.
    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.outcome.is_failure())
    }

    /// Number of entries with outcome `kind`.
    #[must_use]
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.kind() == kind)
            .count()
    }

    /// Outcome kinds in declaration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<OutcomeKind> {
        self.entries.iter().map(|e| e.outcome.kind()).collect()
    }

    /// Totals line for the end of the text report.
    #[must_use]
    pub fn summary(&self) -> String {
        let unchanged =
            self.count(OutcomeKind::AlreadyCorrect) + self.count(OutcomeKind::SkippedAlreadyPresent);
        let line = format!(
            "{} entries: {} linked, {} backed up, {} appended, {unchanged} unchanged, {} skipped, {} failed",
            self.entries.len(),
            self.count(OutcomeKind::Linked),
            self.count(OutcomeKind::BackedUpAndLinked),
            self.count(OutcomeKind::Appended),
            self.count(OutcomeKind::SkippedPlatform),
            self.count(OutcomeKind::Failed),
        );
        if self.dry_run {
            format!("{line} (dry run)")
        } else {
            line
        }
    }

    /// Plain-text report: one line per entry followed by the totals line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out: Vec<String> = self.entries.iter().map(EntryReport::render).collect();
        out.push(self.summary());
        out.join("\n")
    }

    /// Pretty-printed JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            dry_run: self.dry_run,
            entries: self
                .entries
                .iter()
                .map(|e| JsonEntry {
                    index: e.index,
                    description: &e.description,
                    outcome: e.outcome.kind(),
                    detail: e.outcome.detail(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    }

    /// Write the text report through `log`, coloured by outcome.
    pub fn log_to(&self, log: &dyn Log) {
        for entry in &self.entries {
            let color = entry.outcome.kind().color();
            log.info(&format!("{color}{}\x1b[0m", entry.render()));
        }
        log.info(&self.summary());
        if let Some(path) = log.log_file() {
            log.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample() -> LinkReport {
        LinkReport {
            dry_run: false,
            entries: vec![
                EntryReport {
                    index: 0,
                    description: "/h/.config/nvim -> nvim".to_string(),
                    outcome: LinkOutcome::Linked,
                },
                EntryReport {
                    index: 1,
                    description: "/h/.zshrc -> zsh/.zshrc".to_string(),
                    outcome: LinkOutcome::BackedUpAndLinked {
                        backup: PathBuf::from("/h/.dotfiles_backup/.zshrc.20261014-101500"),
                    },
                },
                EntryReport {
                    index: 2,
                    description: "/h/.config/alacritty -> alacritty".to_string(),
                    outcome: LinkOutcome::SkippedPlatform,
                },
                EntryReport {
                    index: 3,
                    description: "/h/.tmux.conf -> tmux/tmux.conf".to_string(),
                    outcome: LinkOutcome::Failed(LinkError::SourceMissing {
                        path: PathBuf::from("/repo/configs/tmux/tmux.conf"),
                    }),
                },
            ],
        }
    }

    #[test]
    fn render_text_lists_entries_then_totals() {
        insta::assert_snapshot!(sample().render_text(), @r"
        + /h/.config/nvim -> nvim (linked)
        ~ /h/.zshrc -> zsh/.zshrc (backed-up-and-linked: /h/.dotfiles_backup/.zshrc.20261014-101500)
        · /h/.config/alacritty -> alacritty (skipped-platform)
        ✗ /h/.tmux.conf -> tmux/tmux.conf (failed: SourceMissing: source does not exist: /repo/configs/tmux/tmux.conf)
        4 entries: 1 linked, 1 backed up, 0 appended, 0 unchanged, 1 skipped, 1 failed
        ");
    }

    #[test]
    fn failures_are_detected() {
        let report = sample();
        assert!(report.has_failures());
        let failed: Vec<usize> = report.failures().map(|e| e.index).collect();
        assert_eq!(failed, vec![3]);
    }

    #[test]
    fn extend_renumbers_appended_entries() {
        let mut merged = LinkReport {
            dry_run: false,
            entries: vec![EntryReport {
                index: 0,
                description: "/h/.bashrc << export PATH=...".to_string(),
                outcome: LinkOutcome::Appended,
            }],
        };
        merged.extend(sample());
        let indices: Vec<usize> = merged.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(merged.kinds()[0], OutcomeKind::Appended);
        assert_eq!(merged.failures().map(|e| e.index).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn empty_report_has_no_failures() {
        let report = LinkReport::default();
        assert!(!report.has_failures());
        assert_eq!(
            report.summary(),
            "0 entries: 0 linked, 0 backed up, 0 appended, 0 unchanged, 0 skipped, 0 failed"
        );
    }

    #[test]
    fn dry_run_summary_is_flagged() {
        let mut report = sample();
        report.dry_run = true;
        assert!(report.summary().ends_with("(dry run)"));
    }

    #[test]
    fn json_uses_kebab_case_outcomes() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dry_run"], false);
        assert_eq!(value["entries"][1]["outcome"], "backed-up-and-linked");
        assert_eq!(value["entries"][0]["detail"], serde_json::Value::Null);
        assert_eq!(value["entries"][3]["outcome"], "failed");
        assert!(
            value["entries"][3]["detail"]
                .as_str()
                .unwrap()
                .starts_with("SourceMissing")
        );
    }

    #[test]
    fn outcome_kind_display_matches_serde_name() {
        for kind in [
            OutcomeKind::Linked,
            OutcomeKind::AlreadyCorrect,
            OutcomeKind::BackedUpAndLinked,
            OutcomeKind::Appended,
            OutcomeKind::SkippedPlatform,
            OutcomeKind::SkippedAlreadyPresent,
            OutcomeKind::Failed,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
