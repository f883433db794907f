//! Soft-delete status, applied as an explicit filter at the store boundary.

use serde::{Deserialize, Serialize};

/// Soft-delete flag carried by accounts, journal entries and journal lines.
///
/// Records are never physically removed; historical lines must stay resolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

/// Which records a read should see. Passed explicitly to every store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    ActiveOnly,
    IncludeDeleted,
}

impl StatusFilter {
    pub fn admits(self, status: RecordStatus) -> bool {
        match self {
            StatusFilter::ActiveOnly => status == RecordStatus::Active,
            StatusFilter::IncludeDeleted => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_only_hides_deleted_records() {
        assert!(StatusFilter::ActiveOnly.admits(RecordStatus::Active));
        assert!(!StatusFilter::ActiveOnly.admits(RecordStatus::Deleted));
        assert!(StatusFilter::IncludeDeleted.admits(RecordStatus::Deleted));
    }
}
