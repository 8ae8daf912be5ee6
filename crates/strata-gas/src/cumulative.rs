/// Running total of gas used by the transactions already folded into the
/// current block.
///
/// The true total is kept even when it passes the block cap; only the
/// reported figure is capped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CumulativeTracker {
    total: u64,
}

impl CumulativeTracker {
    /// Start from a known baseline.
    pub fn new(baseline: u64) -> Self {
        Self { total: baseline }
    }

    /// Fold a finished transaction's net usage into the total.
    pub fn advance(&mut self, net_amount: u64) {
        self.total = match self.total.checked_add(net_amount) {
            Some(total) => total,
            None => {
                tracing::warn!(
                    "cumulative gas overflow: {} + {}, saturating",
                    self.total,
                    net_amount
                );
                u64::MAX
            }
        };
    }

    /// Uncapped running total.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Running total capped at `cap`.
    pub fn reported(&self, cap: u64) -> u64 {
        self.total.min(cap)
    }

    /// Running total plus gas still pending in the in-flight transaction,
    /// capped at `cap`.
    pub fn projected(&self, pending: u64, cap: u64) -> u64 {
        self.total.saturating_add(pending).min(cap)
    }
}
