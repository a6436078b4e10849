//! tutorkit-report — human-readable session summary export.
//!
//! The report collaborator consumes only the two session counters: completed
//! assessment passes (`trial_count`) and total assistant turns.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tutorkit_core::counters::SessionCounters;

/// A snapshot of the session metrics at export time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub actor_id: String,
    pub generated_at: DateTime<Utc>,
    /// Completed assessment passes.
    pub trial_count: u64,
    /// Assistant turns across all tutoring threads.
    pub assistant_turn_count: u64,
}

impl SessionReport {
    /// Snapshot the counters for the given actor.
    pub fn from_counters(actor_id: impl Into<String>, counters: &SessionCounters) -> Self {
        Self {
            actor_id: actor_id.into(),
            generated_at: Utc::now(),
            trial_count: counters.assessment_passes(),
            assistant_turn_count: counters.assistant_turns(),
        }
    }

    /// Render the exportable markdown summary.
    pub fn render_markdown(&self) -> String {
        format!(
            "# Tutoring Session Report\n\
             - **Actor**: {}\n\
             - **Exported**: {}\n\n\
             ## Key Metrics\n\
             - **Answer submissions**: {}\n\
             - **Tutoring exchanges**: {}\n",
            self.actor_id,
            self.generated_at.format("%Y-%m-%d %H:%M"),
            self.trial_count,
            self.assistant_turn_count,
        )
    }

    /// Write the markdown report to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render_markdown())
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let counters = SessionCounters::new();
        counters.record_pass();
        counters.record_pass();
        counters.record_assistant_turn();

        let report = SessionReport::from_counters("s-2024-001", &counters);
        assert_eq!(report.trial_count, 2);
        assert_eq!(report.assistant_turn_count, 1);
    }

    #[test]
    fn markdown_contains_both_metrics() {
        let report = SessionReport {
            actor_id: "s-7".into(),
            generated_at: Utc::now(),
            trial_count: 3,
            assistant_turn_count: 12,
        };
        let md = report.render_markdown();
        assert!(md.contains("**Actor**: s-7"));
        assert!(md.contains("**Answer submissions**: 3"));
        assert!(md.contains("**Tutoring exchanges**: 12"));
    }

    #[test]
    fn save_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");
        let counters = SessionCounters::new();
        let report = SessionReport::from_counters("s", &counters);
        report.save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Tutoring Session Report"));
    }
}
