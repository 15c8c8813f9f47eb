//! Announcement types.
//!
//! An announcement is what a sender publishes next to a payment: the stealth
//! address, the ephemeral public key `R`, and optionally a view tag. Scanners
//! consume streams of these.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WraithError};
use crate::types::{CompressedPoint, GeneratedAddress, StealthAddress};

/// Maximum tolerated clock skew for announcement timestamps, in seconds.
const MAX_FUTURE_SKEW_SECS: u64 = 3600;

/// A published stealth payment announcement.
///
/// Exchanged as JSON; fields other than the address and `R` are optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Ledger-assigned identifier
    #[serde(default)]
    pub id: u64,
    /// The one-time address that received funds
    pub stealth_address: StealthAddress,
    /// Ephemeral public key `R`
    pub ephemeral_public_key: CompressedPoint,
    /// Optional view tag for fast rejection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_tag: Option<u8>,
    /// Unix timestamp when the announcement was created
    #[serde(default)]
    pub timestamp: u64,
    /// Optional: Block height if stored on-chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Optional: Transaction hash if stored on-chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl Announcement {
    /// Creates a new announcement stamped with the current time.
    pub fn new(
        stealth_address: StealthAddress,
        ephemeral_public_key: CompressedPoint,
        view_tag: Option<u8>,
    ) -> Self {
        Self {
            id: 0,
            stealth_address,
            ephemeral_public_key,
            view_tag,
            timestamp: Self::current_timestamp(),
            block_number: None,
            tx_hash: None,
        }
    }

    /// Creates the announcement for a freshly generated address.
    pub fn from_generated(generated: &GeneratedAddress) -> Self {
        Self::new(
            generated.address,
            generated.ephemeral_public_key,
            Some(generated.view_tag),
        )
    }

    /// Validates the announcement structure.
    pub fn validate(&self) -> Result<()> {
        if self.stealth_address.is_zero() {
            return Err(WraithError::InvalidAnnouncement(
                "stealth address is the zero address".into(),
            ));
        }

        let now = Self::current_timestamp();
        if self.timestamp > now + MAX_FUTURE_SKEW_SECS {
            return Err(WraithError::InvalidAnnouncement(
                "timestamp is too far in the future".into(),
            ));
        }

        Ok(())
    }

    /// Returns current Unix timestamp in seconds.
    fn current_timestamp() -> u64 {
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMPRESSED_POINT_SIZE, STEALTH_ADDRESS_SIZE};

    fn ephemeral() -> CompressedPoint {
        let mut bytes = [0x42u8; COMPRESSED_POINT_SIZE];
        bytes[0] = 0x02;
        CompressedPoint::from_array(bytes)
    }

    fn address() -> StealthAddress {
        StealthAddress::from_array([0x17; STEALTH_ADDRESS_SIZE])
    }

    #[test]
    fn test_announcement_creation() {
        let ann = Announcement::new(address(), ephemeral(), Some(0x42));
        assert_eq!(ann.view_tag, Some(0x42));
        assert!(ann.timestamp > 0);
        assert_eq!(ann.id, 0);
    }

    #[test]
    fn test_from_generated() {
        let generated = GeneratedAddress {
            address: address(),
            ephemeral_public_key: ephemeral(),
            view_tag: 0x3e,
        };
        let ann = Announcement::from_generated(&generated);
        assert_eq!(ann.stealth_address, generated.address);
        assert_eq!(ann.ephemeral_public_key, generated.ephemeral_public_key);
        assert_eq!(ann.view_tag, Some(0x3e));
    }

    #[test]
    fn test_announcement_validation() {
        let valid = Announcement::new(address(), ephemeral(), None);
        assert!(valid.validate().is_ok());

        let mut zero_address = valid.clone();
        zero_address.stealth_address = StealthAddress::zero();
        assert!(zero_address.validate().is_err());

        let mut future = valid;
        future.timestamp += 10 * MAX_FUTURE_SKEW_SECS;
        assert!(future.validate().is_err());
    }

    #[test]
    fn test_announcement_json_omits_empty_fields() {
        let ann = Announcement::new(address(), ephemeral(), None);
        let json = serde_json::to_value(&ann).unwrap();
        assert!(json.get("view_tag").is_none());
        assert!(json.get("tx_hash").is_none());

        let restored: Announcement = serde_json::from_value(json).unwrap();
        assert_eq!(restored, ann);
    }
}
