//! Refresh outcome and report types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to one key during a refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// A live entry already existed; upstream was not called
    Fresh,
    /// A complete collection was written
    Written {
        /// Number of records cached
        items: usize,
        /// Number of upstream pages fetched
        pages: usize,
    },
    /// Nothing was written this cycle
    Failed {
        /// Why the refresh failed
        reason: String,
    },
}

impl RefreshOutcome {
    /// Create a failed outcome
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Check if a write happened
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    /// Check if the key was already fresh
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }

    /// Check if the refresh failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome for one tracked key within a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRefresh {
    /// Tracked key
    pub key: String,
    /// What happened to it
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
}

/// Summary of one full sweep
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    /// When the sweep began
    pub started_at: DateTime<Utc>,
    /// When the last key finished
    pub finished_at: DateTime<Utc>,
    /// Per-key outcomes in catalog order
    pub results: Vec<ResourceRefresh>,
}

impl RefreshReport {
    /// Keys written this sweep
    pub fn written(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_written()).count()
    }

    /// Keys skipped as fresh
    pub fn fresh(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_fresh()).count()
    }

    /// Keys that failed
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    /// Outcome for a key
    pub fn outcome(&self, key: &str) -> Option<&RefreshOutcome> {
        self.results
            .iter()
            .find(|r| r.key == key)
            .map(|r| &r.outcome)
    }
}
