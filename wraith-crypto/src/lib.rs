//! # WRAITH Cryptography
//!
//! Dual-key stealth addresses over secp256k1.
//!
//! This crate provides:
//!
//! - **Suite**: [`StealthSuite`], the four protocol operations (hash,
//!   generate, check, recover)
//! - **Hash**: SHA-256 / Keccak-256 shared-secret hashes
//! - **Address**: Cosmos (RIPEMD160 ∘ SHA256) and Ethereum address schemes
//! - **View Tags**: One-byte hints for cheap scan rejection
//! - **Keys**: Key pair generation and meta-address validation
//!
//! ## Security Properties
//!
//! - Address comparison and view tag checks are constant-time
//! - Ephemeral scalars and intermediate hash scalars are zeroized
//! - Randomness comes only from a CSPRNG; a failing source is an error
//!
//! ## Example
//!
//! ```rust
//! use wraith_crypto::{generate_stealth_keys, DefaultSuite};
//!
//! let suite = DefaultSuite::new();
//!
//! // Recipient publishes a meta-address
//! let keys = generate_stealth_keys()?;
//! let meta = keys.meta_address();
//!
//! // Sender derives a one-time address
//! let generated = suite.generate_stealth_address(&meta)?;
//!
//! // Recipient recognises it and recovers the spending key
//! let k = suite.compute_stealth_key(
//!     &generated.address,
//!     &generated.ephemeral_public_key,
//!     &keys.view.secret,
//!     &keys.spend.secret,
//! )?;
//! assert_eq!(suite.address_of_secret(&k)?, generated.address);
//! # Ok::<(), wraith_core::WraithError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod curve;
pub mod hash;
pub mod keys;
pub mod suite;
pub mod view_tag;

// Re-export main items at crate root
pub use address::{AddressScheme, CosmosAddress, EthereumAddress};
pub use hash::{keccak256, ripemd160, sha256, Keccak256, SharedSecretHash, Sha256};
pub use keys::{
    generate_keypair, generate_keypair_with_rng, generate_stealth_keys,
    generate_stealth_keys_with_rng, public_key_from_secret, stealth_keys_from_secrets,
    validate_meta_address,
};
pub use suite::{suite_for, DefaultSuite, EthereumSuite, StealthProtocol, StealthSuite};
pub use view_tag::{compute_view_tag, verify_view_tag};
