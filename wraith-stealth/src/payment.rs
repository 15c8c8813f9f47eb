//! Stealth payment creation (sender side).

use serde::{Deserialize, Serialize};

use wraith_core::config::SuiteConfig;
use wraith_core::error::{Result, WraithError};
use wraith_core::types::{Announcement, MetaAddress, StealthAddress};
use wraith_crypto::{suite_for, DefaultSuite, StealthProtocol};

/// Stealth payment: address to send to and announcement to publish.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StealthPayment {
    /// The one-time address to send funds to
    pub stealth_address: StealthAddress,
    /// The announcement to publish (contains ephemeral key + view tag)
    pub announcement: Announcement,
    /// Metadata about the payment
    #[serde(default)]
    pub metadata: PaymentMetadata,
}

/// Metadata about a stealth payment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentMetadata {
    /// Payment amount (informational only)
    pub amount: Option<String>,
    /// Payment denomination (e.g., "uatom", "ETH")
    pub token: Option<String>,
    /// Optional memo (not published)
    pub memo: Option<String>,
}

/// Creates a stealth payment with the default suite.
pub fn create_stealth_payment(meta_address: &MetaAddress) -> Result<StealthPayment> {
    create_stealth_payment_with(&DefaultSuite::new(), meta_address)
}

/// Creates a stealth payment: derive the one-time address, build the announcement.
pub fn create_stealth_payment_with(
    suite: &dyn StealthProtocol,
    meta_address: &MetaAddress,
) -> Result<StealthPayment> {
    let generated = suite.generate_stealth_address(meta_address)?;

    Ok(StealthPayment {
        stealth_address: generated.address,
        announcement: Announcement::from_generated(&generated),
        metadata: PaymentMetadata::default(),
    })
}

/// Creates a stealth payment carrying metadata.
pub fn create_stealth_payment_with_metadata(
    meta_address: &MetaAddress,
    metadata: PaymentMetadata,
) -> Result<StealthPayment> {
    let mut payment = create_stealth_payment(meta_address)?;
    payment.metadata = metadata;
    Ok(payment)
}

/// Builder for payments that need a non-default suite or ledger metadata.
#[derive(Default)]
pub struct StealthPaymentBuilder {
    meta_address: Option<MetaAddress>,
    suite: SuiteConfig,
    amount: Option<String>,
    token: Option<String>,
    memo: Option<String>,
    block_number: Option<u64>,
    tx_hash: Option<String>,
    omit_view_tag: bool,
}

impl StealthPaymentBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient (required).
    pub fn recipient(mut self, meta_address: MetaAddress) -> Self {
        self.meta_address = Some(meta_address);
        self
    }

    /// Selects the suite (defaults to SHA-256 / Cosmos).
    pub fn suite(mut self, config: SuiteConfig) -> Self {
        self.suite = config;
        self
    }

    /// Sets the informational amount.
    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Sets the denomination.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets a private memo.
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Records the block the payment landed in.
    pub fn block_number(mut self, num: u64) -> Self {
        self.block_number = Some(num);
        self
    }

    /// Records the payment transaction hash.
    pub fn tx_hash(mut self, hash: impl Into<String>) -> Self {
        self.tx_hash = Some(hash.into());
        self
    }

    /// Publishes the announcement without a view tag.
    pub fn without_view_tag(mut self) -> Self {
        self.omit_view_tag = true;
        self
    }

    /// Derives the address and assembles the payment.
    pub fn build(self) -> Result<StealthPayment> {
        let meta_address = self
            .meta_address
            .ok_or_else(|| WraithError::InvalidMetaAddress("recipient meta-address is required".into()))?;

        let suite = suite_for(&self.suite);
        let mut payment = create_stealth_payment_with(suite.as_ref(), &meta_address)?;

        if self.omit_view_tag {
            payment.announcement.view_tag = None;
        }
        payment.announcement.block_number = self.block_number;
        payment.announcement.tx_hash = self.tx_hash;
        payment.metadata = PaymentMetadata {
            amount: self.amount,
            token: self.token,
            memo: self.memo,
        };

        Ok(payment)
    }
}
