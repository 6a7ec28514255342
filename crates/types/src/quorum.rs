//! Strict-majority quorum rule.

use serde::{Deserialize, Serialize};

/// Majority threshold over the configured acceptor population.
///
/// A count reaches quorum when it is strictly more than half of `total`.
/// The comparison is done in integers (`count * 2 > total`), which agrees
/// with `count > total / 2` over the reals for odd and even populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quorum {
    total: u32,
}

impl Quorum {
    /// Create the quorum rule for `total` acceptors.
    pub fn new(total: u32) -> Self {
        Self { total }
    }

    /// Check if `count` responses form a strict majority.
    pub fn is_reached(&self, count: u32) -> bool {
        u64::from(count) * 2 > u64::from(self.total)
    }
}
