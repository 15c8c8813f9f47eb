//! Protocol constants for WRAITH.
//!
//! All encoding sizes are for secp256k1 with SEC1 point compression.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a SEC1 compressed curve point (tag byte + x coordinate).
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Size of a SEC1 uncompressed curve point (tag byte + x + y).
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

/// Size of a big-endian scalar encoding.
pub const SCALAR_SIZE: usize = 32;

/// SEC1 tag for a compressed point with even y.
pub const SEC1_TAG_EVEN: u8 = 0x02;

/// SEC1 tag for a compressed point with odd y.
pub const SEC1_TAG_ODD: u8 = 0x03;

// ═══════════════════════════════════════════════════════════════════════════════
// HASH OUTPUT SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Output size of the shared-secret hash.
/// Must match `SCALAR_SIZE` so the digest reduces to a scalar directly.
pub const SHARED_SECRET_HASH_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a serialized meta-address: view point (33) || spend point (33).
pub const META_ADDRESS_SIZE: usize = 2 * COMPRESSED_POINT_SIZE;

/// Offset of the view public key inside a serialized meta-address.
pub const META_ADDRESS_VIEW_OFFSET: usize = 0;

/// Offset of the spend public key inside a serialized meta-address.
pub const META_ADDRESS_SPEND_OFFSET: usize = COMPRESSED_POINT_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a stealth address (Cosmos and Ethereum formats are both 20 bytes).
pub const STEALTH_ADDRESS_SIZE: usize = 20;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Domain separator for view tag derivation.
///
/// Keeps the view tag independent of the scalar that tweaks the spend key.
pub const DOMAIN_VIEW_TAG: &[u8] = b"WRAITH_VIEW_TAG_V1";

/// Size of view tag in bytes.
pub const VIEW_TAG_SIZE: usize = 1;

/// Probability that an unrelated announcement passes the view tag filter.
pub const VIEW_TAG_FALSE_POSITIVE_RATE: f64 = 1.0 / 256.0;

/// Expected share of unrelated announcements rejected by the view tag, in percent.
pub const VIEW_TAG_EFFICIENCY: f64 = 99.609375; // (255/256) * 100

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default batch size for scanning announcements.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 1000;

/// Maximum batch size accepted by the scanner.
pub const MAX_SCAN_BATCH_SIZE: usize = 100_000;
