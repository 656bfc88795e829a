//! Per-run accounting.

/// What one batch write was asked to do, and what the remote says it did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub staged: usize,
    pub reported: usize,
}

impl BatchOutcome {
    pub fn new(staged: usize, reported: usize) -> Self {
        BatchOutcome { staged, reported }
    }

    /// The remote reported a different count than was submitted.
    pub fn is_partial(&self) -> bool {
        self.staged != self.reported
    }
}

/// Result of one `Reconciler::sync` run. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub copy: BatchOutcome,
    pub delete: BatchOutcome,
}

impl SyncResult {
    /// Events the target calendar reported as inserted.
    pub fn copied(&self) -> usize {
        self.copy.reported
    }

    /// Orphaned events the target calendar reported as deleted.
    pub fn deleted(&self) -> usize {
        self.delete.reported
    }

    pub fn is_partial(&self) -> bool {
        self.copy.is_partial() || self.delete.is_partial()
    }

    pub fn is_noop(&self) -> bool {
        self.copy.staged == 0 && self.delete.staged == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_when_counts_differ() {
        assert!(!BatchOutcome::new(0, 0).is_partial());
        assert!(!BatchOutcome::new(3, 3).is_partial());
        assert!(BatchOutcome::new(3, 2).is_partial());

        let result = SyncResult {
            copy: BatchOutcome::new(3, 2),
            delete: BatchOutcome::new(1, 1),
        };
        assert!(result.is_partial());
        assert_eq!(result.copied(), 2);
        assert_eq!(result.deleted(), 1);
        assert!(!result.is_noop());
    }
}
