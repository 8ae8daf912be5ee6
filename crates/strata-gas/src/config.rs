//! Block gas configuration.
//!
//! Loaded from TOML by the host and used to build a fresh [`BlockContext`]
//! at each block boundary.

use crate::block::{BasicBlockGasMeter, BlockContext, BlockGasMeter, InfiniteBlockGasMeter};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;

/// Block-level gas parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockGasConfig {
    /// Maximum gas all transactions of a block may consume
    pub block_gas_cap: u64,
    /// Use an uncapped block meter (block_gas_cap is ignored)
    pub unlimited: bool,
}

impl Default for BlockGasConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl BlockGasConfig {
    /// Mainnet configuration
    pub fn mainnet() -> Self {
        Self {
            block_gas_cap: 30_000_000,
            unlimited: false,
        }
    }

    /// Testnet configuration
    pub fn testnet() -> Self {
        let mut config = Self::mainnet();
        config.block_gas_cap = 60_000_000;
        config
    }

    /// Local development configuration, no block cap
    pub fn devnet() -> Self {
        let mut config = Self::mainnet();
        config.unlimited = true;
        config
    }

    /// Parse from a TOML document and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BlockGasConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Save configuration to file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unlimited && self.block_gas_cap == 0 {
            return Err(ConfigError::Invalid(
                "block_gas_cap must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fresh block gas meter for a new block.
    pub fn block_gas_meter(&self) -> Rc<dyn BlockGasMeter> {
        if self.unlimited {
            return Rc::new(InfiniteBlockGasMeter::new());
        }
        Rc::new(BasicBlockGasMeter::new(self.block_gas_cap))
    }

    /// Fresh block context bound to a new meter.
    pub fn block_context(&self) -> BlockContext {
        BlockContext::new(self.block_gas_meter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(BlockGasConfig::default(), BlockGasConfig::mainnet());
        assert_eq!(BlockGasConfig::testnet().block_gas_cap, 60_000_000);
        assert!(BlockGasConfig::devnet().unlimited);
    }

    #[test]
    fn test_from_toml() {
        let config = BlockGasConfig::from_toml_str("block_gas_cap = 2000").unwrap();
        assert_eq!(config.block_gas_cap, 2_000);
        assert!(!config.unlimited);

        let ctx = config.block_context();
        assert_eq!(ctx.block_gas_cap(), 2_000);
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = BlockGasConfig::from_toml_str("").unwrap();
        assert_eq!(config, BlockGasConfig::mainnet());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let err = BlockGasConfig::from_toml_str("block_gas_cap = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = BlockGasConfig::from_toml_str("block_gas_cap = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unlimited_context() {
        let ctx = BlockGasConfig::devnet().block_context();
        assert_eq!(ctx.block_gas_cap(), u64::MAX);
        assert!(!ctx.block_gas_meter().is_out_of_gas());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gas.toml");
        let config = BlockGasConfig::testnet();
        config.to_file(&path).unwrap();
        assert_eq!(BlockGasConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BlockGasConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
