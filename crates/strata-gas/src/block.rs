//! Block-wide gas meter interface and the context the host binds to an
//! accountant.
//!
//! The block meter is owned by the host. The accountant only reads its cap;
//! committing a finished transaction's usage into it is the host's job.

use crate::error::BlockGasError;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Block-wide gas meter owned by the host.
///
/// Methods take `&self` so a single meter can be shared between the host and
/// the accountant's [`BlockContext`] within one thread.
pub trait BlockGasMeter: fmt::Debug {
    /// Block gas cap.
    fn limit(&self) -> u64;

    /// True gas consumed so far, possibly past the cap.
    fn gas_consumed(&self) -> u64;

    /// Commit `amount` of gas. A capacity error means the block cannot be
    /// built any further.
    fn consume_gas(&self, amount: u64, descriptor: &str) -> Result<(), BlockGasError>;

    /// Return gas to the block. Clamps at zero.
    fn refund_gas(&self, amount: u64, descriptor: &str);

    /// Gas consumed, capped at the limit.
    fn gas_consumed_to_limit(&self) -> u64 {
        self.gas_consumed().min(self.limit())
    }

    fn gas_remaining(&self) -> u64 {
        self.limit().saturating_sub(self.gas_consumed())
    }

    fn is_past_limit(&self) -> bool {
        self.gas_consumed() > self.limit()
    }

    fn is_out_of_gas(&self) -> bool {
        self.gas_consumed() >= self.limit()
    }
}

/// Block gas meter with a finite cap.
///
/// A commit that pushes the total past the cap is still recorded, so the
/// meter reports the true (poisoned) total afterwards.
#[derive(Debug)]
pub struct BasicBlockGasMeter {
    limit: u64,
    consumed: Cell<u64>,
}

impl BasicBlockGasMeter {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            consumed: Cell::new(0),
        }
    }
}

impl BlockGasMeter for BasicBlockGasMeter {
    fn limit(&self) -> u64 {
        self.limit
    }

    fn gas_consumed(&self) -> u64 {
        self.consumed.get()
    }

    fn consume_gas(&self, amount: u64, descriptor: &str) -> Result<(), BlockGasError> {
        let Some(consumed) = self.consumed.get().checked_add(amount) else {
            self.consumed.set(u64::MAX);
            tracing::error!("block gas overflow committing {} ({})", amount, descriptor);
            return Err(BlockGasError::Overflow {
                descriptor: descriptor.to_string(),
            });
        };

        self.consumed.set(consumed);
        if consumed > self.limit {
            tracing::error!(
                "block gas cap exceeded ({}): consumed {} > cap {}",
                descriptor,
                consumed,
                self.limit
            );
            return Err(BlockGasError::CapacityExceeded {
                consumed,
                cap: self.limit,
                descriptor: descriptor.to_string(),
            });
        }

        tracing::trace!("block gas committed {} ({}), total {}", amount, descriptor, consumed);
        Ok(())
    }

    fn refund_gas(&self, amount: u64, descriptor: &str) {
        tracing::trace!("block gas refunded {} ({})", amount, descriptor);
        self.consumed.set(self.consumed.get().saturating_sub(amount));
    }
}

impl fmt::Display for BasicBlockGasMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BasicBlockGasMeter:\n  limit: {}\n  consumed: {}",
            self.limit,
            self.consumed.get()
        )
    }
}

/// Block gas meter without a cap. Only u64 overflow is rejected.
#[derive(Debug, Default)]
pub struct InfiniteBlockGasMeter {
    consumed: Cell<u64>,
}

impl InfiniteBlockGasMeter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockGasMeter for InfiniteBlockGasMeter {
    fn limit(&self) -> u64 {
        u64::MAX
    }

    fn gas_consumed(&self) -> u64 {
        self.consumed.get()
    }

    fn consume_gas(&self, amount: u64, descriptor: &str) -> Result<(), BlockGasError> {
        let consumed = self
            .consumed
            .get()
            .checked_add(amount)
            .ok_or_else(|| BlockGasError::Overflow {
                descriptor: descriptor.to_string(),
            })?;
        self.consumed.set(consumed);
        Ok(())
    }

    fn refund_gas(&self, amount: u64, _descriptor: &str) {
        self.consumed.set(self.consumed.get().saturating_sub(amount));
    }

    fn is_past_limit(&self) -> bool {
        false
    }

    fn is_out_of_gas(&self) -> bool {
        false
    }
}

/// Block-scoped handle supplied by the host at construction and at every
/// [`GasAccountant::reset`](crate::GasAccountant::reset).
///
/// Built on `Rc`, so a context never leaves the thread executing the block.
#[derive(Debug, Clone)]
pub struct BlockContext {
    meter: Rc<dyn BlockGasMeter>,
    baseline: Option<u64>,
}

impl BlockContext {
    /// Bind to the host's block gas meter.
    pub fn new(meter: Rc<dyn BlockGasMeter>) -> Self {
        Self {
            meter,
            baseline: None,
        }
    }

    /// Override the cumulative gas baseline the accountant starts from.
    pub fn with_baseline(mut self, baseline: u64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn block_gas_meter(&self) -> &dyn BlockGasMeter {
        self.meter.as_ref()
    }

    pub fn block_gas_cap(&self) -> u64 {
        self.meter.limit()
    }

    pub fn baseline(&self) -> Option<u64> {
        self.baseline
    }
}
