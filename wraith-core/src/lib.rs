//! # WRAITH Core
//!
//! Core types, errors, and configuration for the WRAITH dual-key stealth
//! address protocol.
//!
//! This crate provides the foundational building blocks used by all other WRAITH crates:
//!
//! - **Types**: Byte-level domain models for points, scalars, addresses, and announcements
//! - **Errors**: The protocol error taxonomy
//! - **Constants**: Encoding sizes and domain separators
//! - **Config**: Hash and address-format selection
//!
//! ## Example
//!
//! ```rust
//! use wraith_core::{MetaAddress, CompressedPoint};
//!
//! let view = CompressedPoint::from_array([0x02; 33]);
//! let spend = CompressedPoint::from_array([0x03; 33]);
//! let meta = MetaAddress::new(view, spend);
//!
//! let parsed = MetaAddress::from_hex(&meta.to_hex()).unwrap();
//! assert_eq!(parsed, meta);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AddressFormat, HashAlgorithm, SuiteConfig};
pub use constants::*;
pub use error::{Result, WraithError};
pub use types::*;
