//! Aggregate statistics for bulk write operations.

/// Success and failure counts accumulated across bulk writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkStats {
    /// Number of documents written successfully.
    pub indexed: usize,
    /// Number of documents the store rejected.
    pub failed: usize,
}

impl BulkStats {
    /// Fold another batch's counts into this one.
    pub fn absorb(&mut self, other: BulkStats) {
        self.indexed += other.indexed;
        self.failed += other.failed;
    }

    /// Total number of documents attempted.
    pub fn total(&self) -> usize {
        self.indexed + self.failed
    }
}
