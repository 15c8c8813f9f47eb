//! Key types for WRAITH.
//!
//! These are byte-level containers. Curve membership and scalar range are
//! checked by `wraith-crypto` when the bytes are decoded for arithmetic.
//!
//! - [`CompressedPoint`]: SEC1 compressed public key (33 bytes)
//! - [`SecretScalar`]: Big-endian private scalar (32 bytes, zeroized on drop)
//! - [`KeyPair`]: Combined public + secret key
//! - [`StealthKeys`]: A recipient's view and spend key pairs
//! - [`ViewOnlyKeys`]: Scanning capability without spending ability

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{COMPRESSED_POINT_SIZE, SCALAR_SIZE, SEC1_TAG_EVEN, SEC1_TAG_ODD};
use crate::error::{Result, WraithError};
use crate::types::MetaAddress;

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// A curve point in SEC1 compressed form.
///
/// Safe to share publicly. Construction checks the length and tag byte only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPoint {
    bytes: [u8; COMPRESSED_POINT_SIZE],
}

impl CompressedPoint {
    /// Creates a point encoding from raw bytes.
    ///
    /// # Errors
    /// Returns `MalformedKey` if the length is not 33 or the tag byte is not
    /// `0x02`/`0x03`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_POINT_SIZE {
            return Err(WraithError::MalformedKey(format!(
                "expected {} bytes for compressed point, got {}",
                COMPRESSED_POINT_SIZE,
                bytes.len()
            )));
        }
        if bytes[0] != SEC1_TAG_EVEN && bytes[0] != SEC1_TAG_ODD {
            return Err(WraithError::MalformedKey(format!(
                "invalid compressed point tag 0x{:02x}",
                bytes[0]
            )));
        }

        let mut arr = [0u8; COMPRESSED_POINT_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Wraps a fixed-size array without validation.
    pub fn from_array(bytes: [u8; COMPRESSED_POINT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the encoding as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; COMPRESSED_POINT_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded point.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parses a point from hex (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for CompressedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompressedPoint({})", self.to_hex())
    }
}

impl std::fmt::Display for CompressedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serde implementation that uses hex encoding
impl Serialize for CompressedPoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CompressedPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// A private scalar in big-endian encoding.
///
/// Zeroized on drop. Never expose this in logs or error messages.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct SecretScalar {
    bytes: [u8; SCALAR_SIZE],
}

impl SecretScalar {
    /// Creates a scalar from raw bytes.
    ///
    /// # Errors
    /// Returns `MalformedKey` if the length is not 32. Range checks against
    /// the group order happen at decode time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(WraithError::MalformedKey(format!(
                "expected {} bytes for scalar, got {}",
                SCALAR_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; SCALAR_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a scalar from a fixed-size array.
    pub fn from_array(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the scalar as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; SCALAR_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded scalar (for key export only).
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parses a scalar from hex (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(s)?;
        let scalar = Self::from_bytes(&bytes);
        bytes.zeroize();
        scalar
    }
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose secret key content
        write!(f, "SecretScalar([REDACTED])")
    }
}

// Hex serde, used only by explicit key export files
impl Serialize for SecretScalar {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut encoded = self.to_hex();
        let result = serializer.serialize_str(&encoded);
        encoded.zeroize();
        result
    }
}

impl<'de> Deserialize<'de> for SecretScalar {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut s = String::deserialize(deserializer)?;
        let scalar = Self::from_hex(&s).map_err(serde::de::Error::custom);
        s.zeroize();
        scalar
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 key pair (public + secret).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    /// Public key (safe to share)
    #[zeroize(skip)]
    pub public: CompressedPoint,
    /// Secret key (keep private, auto-zeroized)
    pub secret: SecretScalar,
}

impl KeyPair {
    /// Creates a new key pair from public and secret keys.
    ///
    /// The caller is responsible for `public == secret·G`; use
    /// `wraith_crypto::generate_keypair` to get a consistent pair.
    pub fn new(public: CompressedPoint, secret: SecretScalar) -> Self {
        Self { public, secret }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECIPIENT KEY SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete recipient key set (view + spend).
///
/// The view pair detects payments; the spend pair is required to derive the
/// one-time private key.
#[derive(Clone, ZeroizeOnDrop)]
pub struct StealthKeys {
    /// Keys for scanning announcements
    pub view: KeyPair,
    /// Keys for spending from stealth addresses
    pub spend: KeyPair,
}

impl StealthKeys {
    /// Creates a new key set.
    pub fn new(view: KeyPair, spend: KeyPair) -> Self {
        Self { view, spend }
    }

    /// Returns the meta-address to publish (view public key first).
    pub fn meta_address(&self) -> MetaAddress {
        MetaAddress::new(self.view.public, self.spend.public)
    }

    /// Extracts the watch-only capability.
    pub fn view_only(&self) -> ViewOnlyKeys {
        ViewOnlyKeys {
            view_secret: self.view.secret.clone(),
            spend_public: self.spend.public,
        }
    }
}

impl std::fmt::Debug for StealthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthKeys")
            .field("view", &self.view)
            .field("spend", &self.spend)
            .finish()
    }
}

/// View-only capability: can recognise payments, cannot spend them.
///
/// Can be handed to a third-party scanner or auditor.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ViewOnlyKeys {
    /// Private view scalar
    pub view_secret: SecretScalar,
    /// Public spend key
    #[zeroize(skip)]
    pub spend_public: CompressedPoint,
}

impl ViewOnlyKeys {
    /// Creates view-only keys from their parts.
    pub fn new(view_secret: SecretScalar, spend_public: CompressedPoint) -> Self {
        Self {
            view_secret,
            spend_public,
        }
    }
}

impl std::fmt::Debug for ViewOnlyKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewOnlyKeys")
            .field("view_secret", &"[REDACTED]")
            .field("spend_public", &self.spend_public)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(tag: u8, fill: u8) -> CompressedPoint {
        let mut bytes = [fill; COMPRESSED_POINT_SIZE];
        bytes[0] = tag;
        CompressedPoint::from_array(bytes)
    }

    #[test]
    fn test_point_from_bytes() {
        let p = point(SEC1_TAG_EVEN, 0x11);
        let parsed = CompressedPoint::from_bytes(p.as_bytes()).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn test_point_wrong_size() {
        let result = CompressedPoint::from_bytes(&[0x02; 65]);
        assert!(matches!(result, Err(WraithError::MalformedKey(_))));
    }

    #[test]
    fn test_point_bad_tag() {
        let mut bytes = [0x11u8; COMPRESSED_POINT_SIZE];
        bytes[0] = 0x04;
        let result = CompressedPoint::from_bytes(&bytes);
        assert!(matches!(result, Err(WraithError::MalformedKey(_))));
    }

    #[test]
    fn test_point_hex_accepts_prefix() {
        let p = point(SEC1_TAG_ODD, 0xAB);
        let with_prefix = format!("0x{}", p.to_hex());
        assert_eq!(CompressedPoint::from_hex(&with_prefix).unwrap(), p);
    }

    #[test]
    fn test_point_serde() {
        let p = point(SEC1_TAG_EVEN, 0x42);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, format!("\"{}\"", p.to_hex()));
        let p2: CompressedPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, p2);
    }

    #[test]
    fn test_scalar_wrong_size() {
        assert!(matches!(
            SecretScalar::from_bytes(&[1u8; 31]),
            Err(WraithError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_scalar_debug_redacted() {
        let sk = SecretScalar::from_array([0x5A; SCALAR_SIZE]);
        let debug = format!("{:?}", sk);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("5a"));
    }

    #[test]
    fn test_scalar_serde_hex() {
        let sk = SecretScalar::from_array([0x0F; SCALAR_SIZE]);
        let json = serde_json::to_string(&sk).unwrap();
        assert_eq!(json, format!("\"{}\"", "0f".repeat(32)));

        let back: SecretScalar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sk);
        assert!(serde_json::from_str::<SecretScalar>("\"0f0f\"").is_err());
    }

    #[test]
    fn test_keypair_debug_redacted() {
        let pair = KeyPair::new(point(SEC1_TAG_EVEN, 1), SecretScalar::from_array([0x77; 32]));
        let debug = format!("{:?}", pair);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("7777"));
    }

    #[test]
    fn test_stealth_keys_meta_address_order() {
        let view = KeyPair::new(point(SEC1_TAG_EVEN, 1), SecretScalar::from_array([1; 32]));
        let spend = KeyPair::new(point(SEC1_TAG_ODD, 2), SecretScalar::from_array([2; 32]));
        let keys = StealthKeys::new(view, spend);

        let meta = keys.meta_address();
        assert_eq!(meta.view_pk, keys.view.public);
        assert_eq!(meta.spend_pk, keys.spend.public);

        let view_only = keys.view_only();
        assert_eq!(view_only.view_secret, keys.view.secret);
        assert_eq!(view_only.spend_public, keys.spend.public);
    }

    proptest::proptest! {
        #[test]
        fn compressed_point_accepts_only_sec1_tags(bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..70)) {
            let parsed = CompressedPoint::from_bytes(&bytes);
            let valid = bytes.len() == COMPRESSED_POINT_SIZE
                && (bytes[0] == SEC1_TAG_EVEN || bytes[0] == SEC1_TAG_ODD);

            proptest::prop_assert_eq!(parsed.is_ok(), valid);
            if let Ok(point) = parsed {
                proptest::prop_assert_eq!(point.as_bytes(), &bytes[..]);
            }
        }
    }
}
