//! # WRAITH Stealth Address Protocol
//!
//! High-level API for creating and discovering stealth payments.
//!
//! This crate provides:
//!
//! - **Wallet**: Recipient key management, ownership checks, key recovery
//! - **Payments**: One-time addresses plus the announcement to publish
//! - **Discovery**: Scan announcements to find incoming payments
//!
//! ## Quick Start
//!
//! ```rust
//! use wraith_stealth::{create_stealth_payment, StealthWallet};
//!
//! // Recipient: generate keys and publish the meta-address
//! let wallet = StealthWallet::generate()?;
//! let meta_address = *wallet.meta_address();
//!
//! // Sender: create a stealth payment
//! let payment = create_stealth_payment(&meta_address)?;
//! // Send funds to payment.stealth_address
//! // Publish payment.announcement
//!
//! // Recipient: discover payments
//! let (found, _stats) = wallet.scan(&[payment.announcement]);
//! assert_eq!(found.len(), 1);
//! # Ok::<(), wraith_core::WraithError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod wallet;
pub mod payment;
pub mod discovery;

pub use wallet::{StealthWallet, WalletConfig, WalletExport, WALLET_EXPORT_VERSION};
pub use payment::{
    create_stealth_payment, create_stealth_payment_with, create_stealth_payment_with_metadata,
    PaymentMetadata, StealthPayment, StealthPaymentBuilder,
};
pub use discovery::{
    scan_announcement, scan_announcement_with, scan_announcements, DiscoveredPayment,
    DiscoveryResult, ScanResult, ScanStats,
};
