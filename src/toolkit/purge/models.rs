use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::db::{Entry, PublishState};


/// How records in the `published` (live, unmodified) state are handled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LivePolicy {
    /// Leave live records in place; everything else is deleted without unpublishing.
    #[default]
    Skip,
    /// Unpublish anything with a published version, then delete it.
    Unpublish,
}

impl LivePolicy {
    pub fn deletes(self, state: PublishState) -> bool {
        match self {
            LivePolicy::Skip => state != PublishState::Published,
            LivePolicy::Unpublish => true,
        }
    }

    pub fn requires_unpublish(self, entry: &Entry) -> bool {
        match self {
            LivePolicy::Skip => false,
            LivePolicy::Unpublish => entry.has_published_version(),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Deleted,
    WouldDelete,
    SkippedLive,
    Filtered,
    Failed,
    AlreadyVisited,
}

impl ItemOutcome {
    pub fn is_deleted(self) -> bool {
        matches!(self, ItemOutcome::Deleted)
    }
}


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    pub listed: usize,
    pub children: usize,
    pub deleted: usize,
    pub would_delete: usize,
    pub skipped_live: usize,
    pub filtered: usize,
    pub failed: usize,
}

impl PassStats {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Deleted => self.deleted += 1,
            ItemOutcome::WouldDelete => self.would_delete += 1,
            ItemOutcome::SkippedLive => self.skipped_live += 1,
            ItemOutcome::Filtered => self.filtered += 1,
            ItemOutcome::Failed => self.failed += 1,
            ItemOutcome::AlreadyVisited => {}
        }
    }

    pub fn summary(&self, label: &str, dry_run: bool) -> String {
        let mut line = if dry_run {
            format!("{}: {} would be deleted", label, self.would_delete)
        } else {
            format!("{}: {} deleted", label, self.deleted)
        };
        line.push_str(&format!(
            ", {} failed, {} skipped (live), {} filtered out, {} listed",
            self.failed, self.skipped_live, self.filtered, self.listed
        ));
        if self.children > 0 {
            line.push_str(&format!(", {} related records found", self.children));
        }
        line
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeReport {
    pub entries: PassStats,
    pub content_types: Option<PassStats>,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PurgeReport {
    pub fn failed(&self) -> usize {
        self.entries.failed + self.content_types.as_ref().map_or(0, |s| s.failed)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![self.entries.summary("Entries", self.dry_run)];
        if let Some(content_types) = &self.content_types {
            lines.push(content_types.summary("Content types", self.dry_run));
        }
        let elapsed = self.finished_at - self.started_at;
        lines.push(format!("Finished in {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0));
        lines.join("\n")
    }
}
