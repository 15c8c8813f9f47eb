//! WRAITH wallet implementation.
//!
//! The wallet manages a recipient's key pairs and provides high-level
//! operations for receiving stealth payments.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use wraith_core::config::SuiteConfig;
use wraith_core::error::{Result, WraithError};
use wraith_core::types::{
    Announcement, CompressedPoint, MetaAddress, SecretScalar, StealthKeys, ViewOnlyKeys,
};
use wraith_crypto::{
    generate_stealth_keys, stealth_keys_from_secrets, suite_for, validate_meta_address,
    StealthProtocol,
};

use crate::discovery::{scan_announcements, DiscoveryResult, ScanStats};

/// Current key export format version.
pub const WALLET_EXPORT_VERSION: u8 = 1;

/// Configuration for wallet creation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Optional human-readable label
    pub label: Option<String>,
    /// Hash and address format the wallet scans with
    #[serde(default)]
    pub suite: SuiteConfig,
}

/// A WRAITH wallet containing keys for receiving private payments.
///
/// The wallet holds:
/// - View keys: For scanning announcements (can be shared with auditors)
/// - Spend keys: For deriving one-time private keys and spending funds
#[derive(ZeroizeOnDrop)]
pub struct StealthWallet {
    /// The complete key set (view + spend)
    keys: StealthKeys,
    /// Cached meta-address
    #[zeroize(skip)]
    meta_address: MetaAddress,
    /// Wallet configuration
    #[zeroize(skip)]
    config: WalletConfig,
    #[zeroize(skip)]
    suite: Arc<dyn StealthProtocol>,
}

impl StealthWallet {
    /// Generates a new wallet with random keys and the default suite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wraith_stealth::StealthWallet;
    ///
    /// let wallet = StealthWallet::generate()?;
    /// println!("Meta-address: {}", wallet.meta_address().to_hex());
    /// # Ok::<(), wraith_core::WraithError>(())
    /// ```
    pub fn generate() -> Result<Self> {
        Self::generate_with_config(WalletConfig::default())
    }

    /// Generates a new wallet with custom configuration.
    pub fn generate_with_config(config: WalletConfig) -> Result<Self> {
        Self::from_keys_with_config(generate_stealth_keys()?, config)
    }

    /// Creates a wallet from existing keys.
    pub fn from_keys(keys: StealthKeys) -> Result<Self> {
        Self::from_keys_with_config(keys, WalletConfig::default())
    }

    /// Creates a wallet from existing keys and configuration.
    ///
    /// # Errors
    /// `MalformedKey` if either public key is not a curve point.
    pub fn from_keys_with_config(keys: StealthKeys, config: WalletConfig) -> Result<Self> {
        let meta_address = keys.meta_address();
        validate_meta_address(&meta_address)?;

        Ok(Self {
            keys,
            meta_address,
            suite: suite_for(&config.suite),
            config,
        })
    }

    /// Rebuilds a wallet from an export that includes the spend secret.
    pub fn from_export(export: &WalletExport) -> Result<Self> {
        let spend_secret = export.spend_secret.clone().ok_or_else(|| {
            WraithError::ConfigError("export is view-only; spend secret required".into())
        })?;
        let keys = stealth_keys_from_secrets(export.view_secret.clone(), spend_secret)?;

        if keys.meta_address() != export.meta_address() {
            return Err(WraithError::InvalidMetaAddress(
                "exported public keys do not match the secrets".into(),
            ));
        }

        let config = WalletConfig {
            label: export.label.clone(),
            suite: export.suite,
        };
        Self::from_keys_with_config(keys, config)
    }

    /// Returns the meta-address for publishing.
    pub fn meta_address(&self) -> &MetaAddress {
        &self.meta_address
    }

    /// Returns the suite configuration.
    pub fn suite_config(&self) -> SuiteConfig {
        self.config.suite
    }

    /// Returns the wallet label, if any.
    pub fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    /// Returns the watch-only capability.
    pub fn view_only(&self) -> ViewOnlyKeys {
        self.keys.view_only()
    }

    /// Returns true if the announcement pays this wallet.
    ///
    /// A view tag mismatch short-circuits to `false`.
    pub fn is_mine(&self, announcement: &Announcement) -> Result<bool> {
        let ephemeral = &announcement.ephemeral_public_key;
        if let Some(tag) = announcement.view_tag {
            if !self.suite.check_view_tag(ephemeral, &self.keys.view.secret, tag)? {
                return Ok(false);
            }
        }

        self.suite.check_stealth_address(
            &announcement.stealth_address,
            ephemeral,
            &self.keys.view.secret,
            &self.keys.spend.public,
        )
    }

    /// Recovers the one-time private key for an announcement.
    ///
    /// Ownership is confirmed first, so `Ok(Some(k))` always controls
    /// `announcement.stealth_address`.
    ///
    /// # Returns
    ///
    /// `Ok(Some(k))` if this announcement is for us
    /// `Ok(None)` if it is not
    /// `Err(_)` if the announcement carries malformed keys
    pub fn recover(&self, announcement: &Announcement) -> Result<Option<SecretScalar>> {
        if !self.is_mine(announcement)? {
            return Ok(None);
        }

        self.suite
            .compute_stealth_key(
                &announcement.stealth_address,
                &announcement.ephemeral_public_key,
                &self.keys.view.secret,
                &self.keys.spend.secret,
            )
            .map(Some)
    }

    /// Scans announcements, recovering keys for every match.
    pub fn scan(&self, announcements: &[Announcement]) -> (Vec<DiscoveryResult>, ScanStats) {
        scan_announcements(
            self.suite.as_ref(),
            announcements,
            &self.keys.view_only(),
            Some(&self.keys.spend.secret),
        )
    }

    /// Exports the view-only capability for third-party auditing.
    ///
    /// The export allows scanning for payments but not spending them.
    pub fn export_view_only(&self) -> WalletExport {
        let mut export = self.export_full();
        export.spend_secret = None;
        export
    }

    /// Exports every secret. Store the result with care.
    pub fn export_full(&self) -> WalletExport {
        WalletExport {
            version: WALLET_EXPORT_VERSION,
            label: self.config.label.clone(),
            suite: self.config.suite,
            view_public: self.keys.view.public,
            spend_public: self.keys.spend.public,
            view_secret: self.keys.view.secret.clone(),
            spend_secret: Some(self.keys.spend.secret.clone()),
        }
    }
}

impl std::fmt::Debug for StealthWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthWallet")
            .field("meta_address", &self.meta_address)
            .field("config", &self.config)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Serializable key file.
///
/// Secrets are hex-encoded in the clear; encrypting the file is the
/// caller's job.
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletExport {
    /// Version for forward compatibility
    pub version: u8,
    /// Optional label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Suite the keys are used with
    #[serde(default)]
    pub suite: SuiteConfig,
    /// View public key
    pub view_public: CompressedPoint,
    /// Spend public key
    pub spend_public: CompressedPoint,
    /// View secret scalar
    pub view_secret: SecretScalar,
    /// Spend secret scalar; absent in view-only exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_secret: Option<SecretScalar>,
}

impl WalletExport {
    /// Meta-address described by the export.
    pub fn meta_address(&self) -> MetaAddress {
        MetaAddress::new(self.view_public, self.spend_public)
    }

    /// Watch-only keys described by the export.
    pub fn view_only_keys(&self) -> ViewOnlyKeys {
        ViewOnlyKeys::new(self.view_secret.clone(), self.spend_public)
    }

    /// Returns true if the export cannot spend.
    pub fn is_view_only(&self) -> bool {
        self.spend_secret.is_none()
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses from JSON, rejecting unknown versions.
    pub fn from_json(json: &str) -> Result<Self> {
        let export: Self = serde_json::from_str(json)?;
        if export.version != WALLET_EXPORT_VERSION {
            return Err(WraithError::ConfigError(format!(
                "unsupported key file version {}",
                export.version
            )));
        }
        Ok(export)
    }
}

impl std::fmt::Debug for WalletExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletExport")
            .field("version", &self.version)
            .field("suite", &self.suite)
            .field("meta_address", &self.meta_address())
            .field("view_only", &self.is_view_only())
            .finish()
    }
}
