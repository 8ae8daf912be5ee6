//! Strata Gas - gas accounting for the transaction-execution runtime.
//!
//! This crate provides:
//! - Per-transaction gas limits with overflow-safe charging
//! - Block-scoped cumulative gas reporting
//! - The block gas meter interface the host commits transactions into
//! - Block gas configuration

pub mod accountant;
pub mod block;
pub mod config;
pub mod cumulative;
pub mod error;
pub mod tx;

pub use accountant::{GasAccountant, GasPlugin};
pub use block::{BasicBlockGasMeter, BlockContext, BlockGasMeter, InfiniteBlockGasMeter};
pub use config::BlockGasConfig;
pub use cumulative::CumulativeTracker;
pub use error::{BlockGasError, ConfigError, GasError};
pub use tx::TxGasState;
