//! Gas accountant binding a transaction's counters to the block it runs in.
//!
//! Per transaction the host drives the accountant through:
//!
//! 1. [`GasPlugin::set_gas_limit`] before execution,
//! 2. any number of [`GasPlugin::consume_gas`] / [`GasPlugin::refund_gas`],
//! 3. reads of [`GasPlugin::gas_used`] and friends, then commits the usage to
//!    the block gas meter itself,
//! 4. [`GasPlugin::reset`] with the (possibly refreshed) block context.
//!
//! Block capacity is never enforced here. A transaction may stay within its
//! own limit and still fail the host's commit.

use crate::block::BlockContext;
use crate::cumulative::CumulativeTracker;
use crate::error::GasError;
use crate::tx::TxGasState;

/// Gas accounting seam used by the execution pipeline.
pub trait GasPlugin {
    /// Begin a transaction epoch. Never fails.
    fn set_gas_limit(&mut self, limit: u64);

    /// Charge gas against the transaction limit.
    fn consume_gas(&mut self, amount: u64) -> Result<(), GasError>;

    /// Return gas to the transaction. Never fails.
    fn refund_gas(&mut self, amount: u64);

    fn gas_used(&self) -> u64;

    fn gas_remaining(&self) -> u64;

    /// Block gas used including the in-flight transaction, capped at the
    /// block gas cap.
    fn cumulative_gas_used(&self) -> u64;

    /// End the current transaction epoch and rebind to `ctx`.
    fn reset(&mut self, ctx: BlockContext);
}

/// Tracks gas for one transaction at a time within a block.
#[derive(Debug, Clone)]
pub struct GasAccountant {
    tx: TxGasState,
    cumulative: CumulativeTracker,
    ctx: BlockContext,
}

impl GasAccountant {
    /// Create an accountant for a block. The cumulative total starts at the
    /// context's baseline, or zero.
    pub fn new(ctx: BlockContext) -> Self {
        Self {
            tx: TxGasState::new(),
            cumulative: CumulativeTracker::new(ctx.baseline().unwrap_or(0)),
            ctx,
        }
    }

    /// Current transaction's counters.
    pub fn tx_state(&self) -> &TxGasState {
        &self.tx
    }

    /// Block context currently bound.
    pub fn block_context(&self) -> &BlockContext {
        &self.ctx
    }

    /// Uncapped total folded in by previous resets.
    pub fn cumulative_total(&self) -> u64 {
        self.cumulative.total()
    }
}

impl GasPlugin for GasAccountant {
    fn set_gas_limit(&mut self, limit: u64) {
        tracing::trace!("tx gas limit set to {}", limit);
        self.tx.set_limit(limit);
    }

    fn consume_gas(&mut self, amount: u64) -> Result<(), GasError> {
        self.tx.consume(amount).map_err(|e| {
            tracing::debug!(
                "gas consume of {} rejected: {} (used {}, limit {})",
                amount,
                e,
                self.tx.used(),
                self.tx.limit()
            );
            e
        })
    }

    fn refund_gas(&mut self, amount: u64) {
        self.tx.refund(amount);
    }

    fn gas_used(&self) -> u64 {
        self.tx.used()
    }

    fn gas_remaining(&self) -> u64 {
        self.tx.remaining()
    }

    fn cumulative_gas_used(&self) -> u64 {
        self.cumulative
            .projected(self.tx.used(), self.ctx.block_gas_cap())
    }

    fn reset(&mut self, ctx: BlockContext) {
        self.cumulative.advance(self.tx.used());

        if let Some(baseline) = ctx.baseline() {
            if baseline != self.cumulative.total() {
                tracing::debug!(
                    "cumulative gas baseline overridden: {} -> {}",
                    self.cumulative.total(),
                    baseline
                );
            }
            self.cumulative = CumulativeTracker::new(baseline);
        }

        tracing::debug!(
            "gas accountant reset: tx used {}, cumulative {}",
            self.tx.used(),
            self.cumulative.total()
        );

        self.ctx = ctx;
        self.tx = TxGasState::new();
    }
}
