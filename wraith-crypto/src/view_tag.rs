//! View tag computation for efficient scanning.
//!
//! View tags enable recipients to quickly filter announcements:
//! - Each announcement may carry a 1-byte view tag
//! - Recipients compute their expected view tag from the shared point `v·R`
//! - Only announcements with matching view tags need the full derivation
//!   (base-point multiplication, point addition, address hashing)
//!
//! ## Efficiency
//!
//! With 1-byte view tags (256 possible values), ~99.6% of announcements
//! can be skipped. The false-positive rate per unrelated announcement is
//! 1/256; the false-negative rate is zero because the tag is a deterministic
//! function of the same shared point the address is derived from.
//!
//! ## Security
//!
//! The tag is hashed under its own domain separator, so it reveals nothing
//! about the scalar `h` used in key derivation. It leaks 8 bits about the
//! shared point, which still leaves the full ECDH security margin for `h`.

use subtle::ConstantTimeEq;

use wraith_core::constants::DOMAIN_VIEW_TAG;
use wraith_core::CompressedPoint;

use crate::hash::SharedSecretHash;

/// Computes the view tag for a compressed shared point.
///
/// The view tag is the first byte of `H(DOMAIN_VIEW_TAG || compress(P))`.
pub fn compute_view_tag<H: SharedSecretHash>(shared_point: &CompressedPoint) -> u8 {
    H::digest_parts(&[DOMAIN_VIEW_TAG, shared_point.as_bytes()])[0]
}

/// Checks if a view tag matches the expected value for a shared point.
///
/// This is a constant-time comparison to prevent timing attacks.
pub fn verify_view_tag<H: SharedSecretHash>(shared_point: &CompressedPoint, expected_tag: u8) -> bool {
    let computed_tag = compute_view_tag::<H>(shared_point);
    computed_tag.ct_eq(&expected_tag).into()
}
