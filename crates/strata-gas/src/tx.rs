//! Per-transaction gas counters.

use crate::error::GasError;
use std::fmt;

/// Gas tracking for the transaction currently executing.
///
/// Invariant: `consumed <= limit` after every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxGasState {
    /// Gas limit for this transaction
    limit: u64,
    /// Gas consumed so far
    consumed: u64,
}

impl TxGasState {
    /// Create an unset state (limit 0, nothing consumed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new accounting epoch with the given limit.
    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit;
        self.consumed = 0;
    }

    /// Charge gas.
    ///
    /// All-or-nothing: on error `consumed` is left untouched. Overflow is
    /// checked before the limit.
    pub fn consume(&mut self, amount: u64) -> Result<(), GasError> {
        let new_consumed = self.consumed.checked_add(amount).ok_or(GasError::Overflow)?;

        if new_consumed > self.limit {
            return Err(GasError::OutOfGas);
        }

        self.consumed = new_consumed;
        Ok(())
    }

    /// Return gas. Over-refunds clamp to zero.
    pub fn refund(&mut self, amount: u64) {
        if amount > self.consumed {
            tracing::warn!(
                "gas refund {} exceeds consumed {}, clamping to zero",
                amount,
                self.consumed
            );
        }
        self.consumed = self.consumed.saturating_sub(amount);
    }

    /// Get gas limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Get gas used.
    pub fn used(&self) -> u64 {
        self.consumed
    }

    /// Get remaining gas.
    pub fn remaining(&self) -> u64 {
        self.limit - self.consumed
    }
}

impl fmt::Display for TxGasState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TxGasState:\n  limit: {}\n  consumed: {}",
            self.limit, self.consumed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_gas_state() {
        let mut state = TxGasState::new();
        state.set_limit(1_000);
        assert_eq!(state.limit(), 1_000);
        assert_eq!(state.remaining(), 1_000);

        state.consume(500).unwrap();
        assert_eq!(state.used(), 500);
        assert_eq!(state.remaining(), 500);
    }

    #[test]
    fn test_consume_exact_limit() {
        let mut state = TxGasState::new();
        state.set_limit(1_000);
        state.consume(1_000).unwrap();
        assert_eq!(state.remaining(), 0);
        assert_eq!(state.consume(1), Err(GasError::OutOfGas));
        assert_eq!(state.used(), 1_000);
    }

    #[test]
    fn test_out_of_gas_is_all_or_nothing() {
        let mut state = TxGasState::new();
        state.set_limit(1_000);
        state.consume(600).unwrap();
        assert_eq!(state.consume(500), Err(GasError::OutOfGas));
        assert_eq!(state.used(), 600);
    }

    #[test]
    fn test_overflow_checked_before_limit() {
        let mut state = TxGasState::new();
        state.set_limit(10);
        state.consume(5).unwrap();
        // Would also exceed the limit, but overflow wins.
        assert_eq!(state.consume(u64::MAX), Err(GasError::Overflow));
        assert_eq!(state.used(), 5);
    }

    #[test]
    fn test_max_limit() {
        let mut state = TxGasState::new();
        state.set_limit(u64::MAX);
        state.consume(u64::MAX).unwrap();
        assert_eq!(state.remaining(), 0);
        assert_eq!(state.consume(1), Err(GasError::Overflow));
    }

    #[test]
    fn test_refund() {
        let mut state = TxGasState::new();
        state.set_limit(1_000);
        state.consume(500).unwrap();
        state.refund(250);
        assert_eq!(state.used(), 250);
        assert_eq!(state.remaining(), 750);
    }

    #[test]
    fn test_over_refund_clamps() {
        let mut state = TxGasState::new();
        state.set_limit(1_000);
        state.consume(100).unwrap();
        state.refund(1_000);
        assert_eq!(state.used(), 0);
        assert_eq!(state.remaining(), 1_000);
    }

    #[test]
    fn test_set_limit_zeroes_consumed() {
        let mut state = TxGasState::new();
        state.set_limit(1_000);
        state.consume(700).unwrap();
        state.set_limit(200);
        assert_eq!(state.used(), 0);
        assert_eq!(state.remaining(), 200);
    }

    #[test]
    fn test_unset_state_only_accepts_zero() {
        let mut state = TxGasState::new();
        state.consume(0).unwrap();
        assert_eq!(state.consume(1), Err(GasError::OutOfGas));
    }

    #[test]
    fn test_display() {
        let mut state = TxGasState::new();
        state.set_limit(10);
        state.consume(3).unwrap();
        assert_eq!(state.to_string(), "TxGasState:\n  limit: 10\n  consumed: 3");
    }
}
