//! Domain types for WRAITH.
//!
//! - [`CompressedPoint`] / [`SecretScalar`]: Fixed-size key encodings
//! - [`MetaAddress`]: Published (view, spend) public key pair
//! - [`StealthAddress`]: One-time address for a specific payment
//! - [`Announcement`]: Published stealth address + ephemeral key + view tag

mod keys;
mod address;
mod announcement;

pub use keys::*;
pub use address::*;
pub use announcement::*;
