//! secp256k1 key generation.
//!
//! Recipients need two key pairs (view and spend). Senders never call this
//! directly; ephemeral keys are drawn inside address generation.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use wraith_core::{CompressedPoint, KeyPair, MetaAddress, Result, SecretScalar, StealthKeys};

use crate::curve;

/// Generates a key pair from the operating system's CSPRNG.
pub fn generate_keypair() -> Result<KeyPair> {
    generate_keypair_with_rng(&mut OsRng)
}

/// Generates a key pair from the supplied CSPRNG.
pub fn generate_keypair_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<KeyPair> {
    let scalar = curve::random_scalar(rng)?;
    let secret = curve::scalar_to_secret(&scalar);
    let public = public_key_from_secret(&secret)?;
    Ok(KeyPair::new(public, secret))
}

/// Computes the public key `x·G` of a secret scalar.
///
/// # Errors
/// `MalformedKey` if the scalar is zero or not below the group order.
pub fn public_key_from_secret(secret: &SecretScalar) -> Result<CompressedPoint> {
    let scalar = curve::decode_scalar(secret)?;
    Ok(curve::compress(&curve::public_from_scalar(&scalar)))
}

/// Generates a fresh recipient identity (view and spend key pairs).
pub fn generate_stealth_keys() -> Result<StealthKeys> {
    generate_stealth_keys_with_rng(&mut OsRng)
}

/// Generates a recipient identity from the supplied CSPRNG.
pub fn generate_stealth_keys_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<StealthKeys> {
    let view = generate_keypair_with_rng(rng)?;
    let spend = generate_keypair_with_rng(rng)?;
    Ok(StealthKeys::new(view, spend))
}

/// Rebuilds a recipient identity from its two secret scalars.
pub fn stealth_keys_from_secrets(view_secret: SecretScalar, spend_secret: SecretScalar) -> Result<StealthKeys> {
    let view = KeyPair::new(public_key_from_secret(&view_secret)?, view_secret);
    let spend = KeyPair::new(public_key_from_secret(&spend_secret)?, spend_secret);
    Ok(StealthKeys::new(view, spend))
}

/// Checks that both halves of a meta-address are points on the curve.
///
/// # Errors
/// `MalformedKey` naming the offending half.
pub fn validate_meta_address(meta: &MetaAddress) -> Result<()> {
    curve::decode_point(&meta.view_pk).map_err(|e| prefix("view key", e))?;
    curve::decode_point(&meta.spend_pk).map_err(|e| prefix("spend key", e))?;
    Ok(())
}

fn prefix(half: &str, err: wraith_core::WraithError) -> wraith_core::WraithError {
    match err {
        wraith_core::WraithError::MalformedKey(msg) => {
            wraith_core::WraithError::MalformedKey(format!("{half}: {msg}"))
        }
        other => other,
    }
}
