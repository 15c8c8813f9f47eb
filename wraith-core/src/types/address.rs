//! Address types for WRAITH.
//!
//! - [`MetaAddress`]: The (view, spend) public key pair a recipient publishes
//! - [`StealthAddress`]: A one-time 20-byte address derived for a specific payment
//! - [`GeneratedAddress`]: Everything a sender gets back from address generation

use serde::{Deserialize, Serialize};

use super::CompressedPoint;
use crate::constants::{
    COMPRESSED_POINT_SIZE, META_ADDRESS_SIZE, META_ADDRESS_SPEND_OFFSET, META_ADDRESS_VIEW_OFFSET,
    STEALTH_ADDRESS_SIZE,
};
use crate::error::{Result, WraithError};

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A recipient's published meta-address.
///
/// # Wire Format
/// ```text
/// view_pk (33) || spend_pk (33)   = 66 bytes
/// ```
///
/// The view key always comes first. Parsing never guesses the order.
///
/// # Example
/// ```
/// use wraith_core::{CompressedPoint, MetaAddress};
///
/// let meta = MetaAddress::new(
///     CompressedPoint::from_array([0x02; 33]),
///     CompressedPoint::from_array([0x03; 33]),
/// );
/// let bytes = meta.to_bytes();
/// assert_eq!(bytes[0], 0x02);
/// assert_eq!(bytes[33], 0x03);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MetaAddress {
    /// View public key `V` - senders run ECDH against it
    pub view_pk: CompressedPoint,
    /// Spend public key `S` - tweaked into the one-time key
    pub spend_pk: CompressedPoint,
}

impl MetaAddress {
    /// Creates a meta-address from its two halves.
    pub fn new(view_pk: CompressedPoint, spend_pk: CompressedPoint) -> Self {
        Self { view_pk, spend_pk }
    }

    /// Serializes to the 66-byte wire format.
    pub fn to_bytes(&self) -> [u8; META_ADDRESS_SIZE] {
        let mut bytes = [0u8; META_ADDRESS_SIZE];
        bytes[META_ADDRESS_VIEW_OFFSET..META_ADDRESS_VIEW_OFFSET + COMPRESSED_POINT_SIZE]
            .copy_from_slice(self.view_pk.as_bytes());
        bytes[META_ADDRESS_SPEND_OFFSET..META_ADDRESS_SPEND_OFFSET + COMPRESSED_POINT_SIZE]
            .copy_from_slice(self.spend_pk.as_bytes());
        bytes
    }

    /// Parses the 66-byte wire format into (view, spend).
    ///
    /// # Errors
    /// `InvalidMetaAddress` on a length mismatch, `MalformedKey` if either half
    /// is not a compressed point encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != META_ADDRESS_SIZE {
            return Err(WraithError::InvalidMetaAddress(format!(
                "expected {} bytes, got {}",
                META_ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let (view, spend) = bytes.split_at(META_ADDRESS_SPEND_OFFSET);
        Ok(Self {
            view_pk: CompressedPoint::from_bytes(view)?,
            spend_pk: CompressedPoint::from_bytes(spend)?,
        })
    }

    /// Encodes to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decodes from hex string (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the meta-address with its halves exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            view_pk: self.spend_pk,
            spend_pk: self.view_pk,
        }
    }
}

impl std::fmt::Display for MetaAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for MetaAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for MetaAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A one-time ledger address derived from a stealth public key.
///
/// The byte layout is dictated by the suite's address scheme; both supported
/// schemes produce 20 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StealthAddress {
    bytes: [u8; STEALTH_ADDRESS_SIZE],
}

impl StealthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != STEALTH_ADDRESS_SIZE {
            return Err(WraithError::InvalidStealthAddress(format!(
                "expected {} bytes, got {}",
                STEALTH_ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; STEALTH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub fn from_array(bytes: [u8; STEALTH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the address as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; STEALTH_ADDRESS_SIZE] {
        &self.bytes
    }

    /// Returns `0x`-prefixed lowercase hex.
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Parses from hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; STEALTH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for StealthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StealthAddress({})", self.to_hex_string())
    }
}

impl std::fmt::Display for StealthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl Serialize for StealthAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for StealthAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATION RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of sender-side stealth address generation.
///
/// The ephemeral private scalar is never part of this; it is dropped inside
/// the generating call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAddress {
    /// The one-time address to pay
    pub address: StealthAddress,
    /// `R = r·G`, published alongside the payment
    pub ephemeral_public_key: CompressedPoint,
    /// One-byte scanning hint derived from the shared secret
    pub view_tag: u8,
}
