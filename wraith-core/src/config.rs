//! Suite configuration.
//!
//! Selects the shared-secret hash and the address format a suite is built
//! with. The curve is fixed to secp256k1.
//!
//! Environment variables read by [`SuiteConfig::from_env`]:
//!
//! | variable                | values                  | default   |
//! |-------------------------|-------------------------|-----------|
//! | `WRAITH_HASH`           | `sha256`, `keccak256`   | `sha256`  |
//! | `WRAITH_ADDRESS_FORMAT` | `cosmos`, `ethereum`    | `cosmos`  |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WraithError};

/// Environment variable selecting the hash algorithm.
pub const ENV_HASH: &str = "WRAITH_HASH";

/// Environment variable selecting the address format.
pub const ENV_ADDRESS_FORMAT: &str = "WRAITH_ADDRESS_FORMAT";

/// Hash function applied to the compressed shared-secret point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// Keccak-256 (Ethereum flavour, not SHA3-256)
    Keccak256,
}

impl FromStr for HashAlgorithm {
    type Err = WraithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "keccak256" | "keccak-256" => Ok(Self::Keccak256),
            other => Err(WraithError::ConfigError(format!(
                "unknown hash algorithm '{other}' (expected sha256 or keccak256)"
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha256"),
            Self::Keccak256 => f.write_str("keccak256"),
        }
    }
}

/// Mapping from a stealth public key to a ledger address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
    /// RIPEMD160(SHA256(compressed key)), as used by CometBFT secp256k1 accounts
    #[default]
    Cosmos,
    /// Keccak256(uncompressed key without tag)[12..32]
    Ethereum,
}

impl FromStr for AddressFormat {
    type Err = WraithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosmos" | "cometbft" | "tendermint" => Ok(Self::Cosmos),
            "ethereum" | "eth" => Ok(Self::Ethereum),
            other => Err(WraithError::ConfigError(format!(
                "unknown address format '{other}' (expected cosmos or ethereum)"
            ))),
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosmos => f.write_str("cosmos"),
            Self::Ethereum => f.write_str("ethereum"),
        }
    }
}

/// Immutable suite parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Shared-secret hash
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Stealth address format
    #[serde(default)]
    pub address: AddressFormat,
}

impl SuiteConfig {
    /// Creates a configuration from explicit choices.
    pub fn new(hash: HashAlgorithm, address: AddressFormat) -> Self {
        Self { hash, address }
    }

    /// Reads the configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    /// Returns `ConfigError` if a variable is set to an unknown value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hash = match lookup(ENV_HASH) {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => HashAlgorithm::default(),
        };
        let address = match lookup(ENV_ADDRESS_FORMAT) {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => AddressFormat::default(),
        };
        Ok(Self { hash, address })
    }
}

impl fmt::Display for SuiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secp256k1/{}/{}", self.hash, self.address)
    }
}
