//! Payment discovery (recipient scan).
//!
//! For each announcement: optionally reject on view tag, then run the full
//! address check, then (if the spend secret is available) recover the
//! one-time private key.

use serde::{Deserialize, Serialize};

use wraith_core::error::{Result, WraithError};
use wraith_core::types::{Announcement, CompressedPoint, SecretScalar, StealthAddress, ViewOnlyKeys};
use wraith_crypto::StealthProtocol;

/// Result of scanning a single announcement.
#[derive(Debug)]
pub enum ScanResult {
    /// View tag didn't match - rejected without the full check
    Filtered,
    /// Full check ran and the address is not ours
    NotForUs,
    /// Address matched - payment discovered
    Discovered(DiscoveredPayment),
    /// Announcement could not be processed (malformed key, degenerate derivation)
    Failed(WraithError),
}

impl ScanResult {
    /// Returns true if a payment was discovered.
    pub fn is_discovered(&self) -> bool {
        matches!(self, ScanResult::Discovered(_))
    }

    /// Returns the discovered payment if present.
    pub fn into_payment(self) -> Option<DiscoveredPayment> {
        match self {
            ScanResult::Discovered(payment) => Some(payment),
            _ => None,
        }
    }
}

/// A payment found while scanning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscoveredPayment {
    /// The one-time address that received funds
    pub address: StealthAddress,
    /// Ephemeral key from the announcement
    pub ephemeral_public_key: CompressedPoint,
    /// One-time private key; `None` for view-only scans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stealth_key: Option<SecretScalar>,
}

/// Statistics for scanning operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total announcements scanned
    pub total_scanned: u64,
    /// Rejected by view tag alone
    pub filtered: u64,
    /// Needed the full address check
    pub full_checks: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of errors during scanning
    pub errors: u64,
    /// Duration of the scan in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan result.
    pub fn record(&mut self, result: &ScanResult) {
        self.total_scanned += 1;
        match result {
            ScanResult::Filtered => self.filtered += 1,
            ScanResult::NotForUs => self.full_checks += 1,
            ScanResult::Discovered(_) => {
                self.full_checks += 1;
                self.discoveries += 1;
            }
            ScanResult::Failed(_) => self.errors += 1,
        }
    }

    /// Folds another set of stats into this one.
    pub fn merge(&mut self, other: &ScanStats) {
        self.total_scanned += other.total_scanned;
        self.filtered += other.filtered;
        self.full_checks += other.full_checks;
        self.discoveries += other.discoveries;
        self.errors += other.errors;
        self.duration_ms += other.duration_ms;
    }

    /// Returns the scan rate (announcements per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.total_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }

    /// Returns the filter efficiency (percentage of announcements rejected by view tag).
    pub fn filter_efficiency(&self) -> f64 {
        if self.total_scanned == 0 {
            0.0
        } else {
            (self.filtered as f64 / self.total_scanned as f64) * 100.0
        }
    }
}

/// Scans one announcement, using its view tag when present.
pub fn scan_announcement(
    suite: &dyn StealthProtocol,
    announcement: &Announcement,
    keys: &ViewOnlyKeys,
    spend_secret: Option<&SecretScalar>,
) -> ScanResult {
    scan_announcement_with(suite, announcement, keys, spend_secret, true)
}

/// Scans one announcement; `use_view_tag = false` forces the full check.
pub fn scan_announcement_with(
    suite: &dyn StealthProtocol,
    announcement: &Announcement,
    keys: &ViewOnlyKeys,
    spend_secret: Option<&SecretScalar>,
    use_view_tag: bool,
) -> ScanResult {
    match try_scan(suite, announcement, keys, spend_secret, use_view_tag) {
        Ok(result) => result,
        Err(e) => ScanResult::Failed(e),
    }
}

fn try_scan(
    suite: &dyn StealthProtocol,
    announcement: &Announcement,
    keys: &ViewOnlyKeys,
    spend_secret: Option<&SecretScalar>,
    use_view_tag: bool,
) -> Result<ScanResult> {
    let ephemeral = &announcement.ephemeral_public_key;

    if let (true, Some(tag)) = (use_view_tag, announcement.view_tag) {
        if !suite.check_view_tag(ephemeral, &keys.view_secret, tag)? {
            return Ok(ScanResult::Filtered);
        }
    }

    let address = &announcement.stealth_address;
    if !suite.check_stealth_address(address, ephemeral, &keys.view_secret, &keys.spend_public)? {
        return Ok(ScanResult::NotForUs);
    }

    let stealth_key = spend_secret
        .map(|s| suite.compute_stealth_key(address, ephemeral, &keys.view_secret, s))
        .transpose()?;

    Ok(ScanResult::Discovered(DiscoveredPayment {
        address: *address,
        ephemeral_public_key: *ephemeral,
        stealth_key,
    }))
}

/// A discovered payment together with where it was found.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The announcement that matched
    pub announcement: Announcement,
    /// The recovered payment
    pub payment: DiscoveredPayment,
    /// Position in the scanned slice
    pub index: usize,
}

/// Scans a slice of announcements, returning matches and statistics.
pub fn scan_announcements(
    suite: &dyn StealthProtocol,
    announcements: &[Announcement],
    keys: &ViewOnlyKeys,
    spend_secret: Option<&SecretScalar>,
) -> (Vec<DiscoveryResult>, ScanStats) {
    let start = std::time::Instant::now();
    let mut stats = ScanStats::new();

    let discoveries = announcements
        .iter()
        .enumerate()
        .filter_map(|(idx, ann)| {
            let result = scan_announcement(suite, ann, keys, spend_secret);
            stats.record(&result);
            result.into_payment().map(|payment| DiscoveryResult {
                announcement: ann.clone(),
                payment,
                index: idx,
            })
        })
        .collect();

    stats.duration_ms = start.elapsed().as_millis() as u64;
    (discoveries, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wraith_core::StealthKeys;
    use wraith_crypto::{generate_stealth_keys, DefaultSuite};

    use crate::payment::{create_stealth_payment, StealthPaymentBuilder};

    fn create_announcement_for(keys: &StealthKeys) -> Announcement {
        create_stealth_payment(&keys.meta_address()).unwrap().announcement
    }

    #[test]
    fn test_scan_announcement_discovery() {
        let keys = generate_stealth_keys().unwrap();
        let announcement = create_announcement_for(&keys);

        let result = scan_announcement(
            &DefaultSuite::new(),
            &announcement,
            &keys.view_only(),
            Some(&keys.spend.secret),
        );
        assert!(result.is_discovered());

        let payment = result.into_payment().unwrap();
        assert_eq!(payment.address, announcement.stealth_address);
        let k = payment.stealth_key.unwrap();
        assert_eq!(DefaultSuite::new().address_of_secret(&k).unwrap(), payment.address);
    }

    #[test]
    fn test_scan_view_only_has_no_key() {
        let keys = generate_stealth_keys().unwrap();
        let announcement = create_announcement_for(&keys);

        let payment = scan_announcement(&DefaultSuite::new(), &announcement, &keys.view_only(), None)
            .into_payment()
            .unwrap();
        assert!(payment.stealth_key.is_none());
    }

    #[test]
    fn test_scan_announcement_not_for_us() {
        let keys = generate_stealth_keys().unwrap();
        let other = generate_stealth_keys().unwrap();
        let announcement = create_announcement_for(&other);

        let result = scan_announcement(&DefaultSuite::new(), &announcement, &keys.view_only(), None);
        // Either the tag rejects it (255/256) or the full check does
        assert!(matches!(result, ScanResult::Filtered | ScanResult::NotForUs));
    }

    #[test]
    fn test_untagged_announcement_runs_full_check() {
        let keys = generate_stealth_keys().unwrap();
        let other = generate_stealth_keys().unwrap();
        let announcement = StealthPaymentBuilder::new()
            .recipient(other.meta_address())
            .without_view_tag()
            .build()
            .unwrap()
            .announcement;

        let result = scan_announcement(&DefaultSuite::new(), &announcement, &keys.view_only(), None);
        assert!(matches!(result, ScanResult::NotForUs));
    }

    #[test]
    fn test_wrong_view_tag_is_filtered_even_if_ours() {
        let keys = generate_stealth_keys().unwrap();
        let mut announcement = create_announcement_for(&keys);
        announcement.view_tag = announcement.view_tag.map(|t| t.wrapping_add(1));

        let suite = DefaultSuite::new();
        let result = scan_announcement(&suite, &announcement, &keys.view_only(), None);
        assert!(matches!(result, ScanResult::Filtered));

        // Ignoring tags still finds it
        let result = scan_announcement_with(&suite, &announcement, &keys.view_only(), None, false);
        assert!(result.is_discovered());
    }

    #[test]
    fn test_malformed_announcement_fails() {
        let keys = generate_stealth_keys().unwrap();
        let mut announcement = create_announcement_for(&keys);
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 5;
        announcement.ephemeral_public_key = CompressedPoint::from_array(bytes);

        let result = scan_announcement(&DefaultSuite::new(), &announcement, &keys.view_only(), None);
        assert!(matches!(result, ScanResult::Failed(WraithError::MalformedKey(_))));
    }

    #[test]
    fn test_scan_multiple_announcements() {
        let keys = generate_stealth_keys().unwrap();
        let other = generate_stealth_keys().unwrap();
        let announcements = vec![
            create_announcement_for(&keys),
            create_announcement_for(&other),
            create_announcement_for(&keys),
        ];

        let (discoveries, stats) = scan_announcements(
            &DefaultSuite::new(),
            &announcements,
            &keys.view_only(),
            Some(&keys.spend.secret),
        );
        assert_eq!(discoveries.len(), 2);
        assert_eq!(discoveries[0].index, 0);
        assert_eq!(discoveries[1].index, 2);
        assert_eq!(stats.total_scanned, 3);
        assert_eq!(stats.discoveries, 2);
        assert_eq!(stats.errors, 0);
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]

        #[test]
        fn arbitrary_announcements_never_discovered(
            x in proptest::array::uniform32(proptest::prelude::any::<u8>()),
            odd in proptest::prelude::any::<bool>(),
            addr in proptest::array::uniform20(proptest::prelude::any::<u8>()),
        ) {
            let keys = generate_stealth_keys().unwrap();
            let mut ephemeral = [0u8; 33];
            ephemeral[0] = if odd { 0x03 } else { 0x02 };
            ephemeral[1..].copy_from_slice(&x);

            let announcement = Announcement {
                id: 0,
                stealth_address: StealthAddress::from_array(addr),
                ephemeral_public_key: CompressedPoint::from_array(ephemeral),
                view_tag: None,
                timestamp: 0,
                block_number: None,
                tx_hash: None,
            };

            let result = scan_announcement(&DefaultSuite::new(), &announcement, &keys.view_only(), None);
            proptest::prop_assert!(!result.is_discovered());
        }
    }

    #[test]
    fn test_scan_stats() {
        let mut stats = ScanStats::new();
        stats.record(&ScanResult::Filtered);
        stats.record(&ScanResult::Filtered);
        stats.record(&ScanResult::NotForUs);
        stats.record(&ScanResult::Failed(WraithError::MalformedKey("x".into())));
        stats.duration_ms = 2;

        assert_eq!(stats.total_scanned, 4);
        assert_eq!(stats.full_checks, 1);
        assert!((stats.filter_efficiency() - 50.0).abs() < f64::EPSILON);
        assert!((stats.rate() - 2000.0).abs() < f64::EPSILON);

        let mut total = ScanStats::new();
        total.merge(&stats);
        total.merge(&stats);
        assert_eq!(total.total_scanned, 8);
        assert_eq!(total.errors, 2);
    }
}
