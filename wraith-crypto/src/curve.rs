//! secp256k1 helpers.
//!
//! Thin conversions between the byte-level types in `wraith-core` and `k256`
//! group elements. This is the only place curve membership and scalar range
//! are checked.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey, U256};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use wraith_core::{CompressedPoint, MetaAddress, Result, SecretScalar, WraithError};

/// Attempts before a source that only yields out-of-range scalars is
/// treated as broken.
const MAX_SCALAR_ATTEMPTS: usize = 8;

/// Decodes a compressed point, rejecting anything not on the curve.
pub fn decode_point(point: &CompressedPoint) -> Result<PublicKey> {
    PublicKey::from_sec1_bytes(point.as_bytes())
        .map_err(|_| WraithError::MalformedKey(format!("{point} is not a secp256k1 point")))
}

/// Decodes a secret scalar, rejecting zero and values `>= n`.
pub fn decode_scalar(secret: &SecretScalar) -> Result<NonZeroScalar> {
    SecretKey::from_slice(secret.as_bytes())
        .map(|sk| sk.to_nonzero_scalar())
        .map_err(|_| WraithError::MalformedKey("secret scalar is zero or not below the group order".into()))
}

/// Decodes both halves of a meta-address as `(view, spend)`.
pub fn decode_meta_address(meta: &MetaAddress) -> Result<(PublicKey, PublicKey)> {
    Ok((decode_point(&meta.view_pk)?, decode_point(&meta.spend_pk)?))
}

/// Converts a projective point into a public key.
///
/// The identity has no SEC1 compressed form, so it surfaces as
/// `DegenerateDerivation` with `context` as the reason.
pub fn to_public_key(point: ProjectivePoint, context: &'static str) -> Result<PublicKey> {
    PublicKey::from_affine(point.to_affine()).map_err(|_| WraithError::DegenerateDerivation(context))
}

/// SEC1 compressed encoding of a public key.
pub fn compress(public_key: &PublicKey) -> CompressedPoint {
    let encoded = public_key.to_encoded_point(true);
    let mut bytes = [0u8; wraith_core::COMPRESSED_POINT_SIZE];
    bytes.copy_from_slice(encoded.as_bytes());
    CompressedPoint::from_array(bytes)
}

/// SEC1 uncompressed encoding of a public key (`0x04 || x || y`).
pub fn uncompress(public_key: &PublicKey) -> [u8; wraith_core::UNCOMPRESSED_POINT_SIZE] {
    let encoded = public_key.to_encoded_point(false);
    let mut bytes = [0u8; wraith_core::UNCOMPRESSED_POINT_SIZE];
    bytes.copy_from_slice(encoded.as_bytes());
    bytes
}

/// Interprets a 32-byte digest as a big-endian integer reduced mod `n`.
pub fn reduce_digest(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest))
}

/// Encodes a scalar as a [`SecretScalar`].
pub fn scalar_to_secret(scalar: &Scalar) -> SecretScalar {
    let mut array = [0u8; wraith_core::SCALAR_SIZE];
    array.copy_from_slice(&scalar.to_bytes());
    SecretScalar::from_array(array)
}

/// Draws a uniformly random non-zero scalar by rejection sampling.
///
/// # Errors
/// `RandomSourceUnavailable` if the source fails or never produces an
/// in-range value. There is no fallback source.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Zeroizing<Scalar>> {
    let mut bytes = Zeroizing::new([0u8; wraith_core::SCALAR_SIZE]);

    for _ in 0..MAX_SCALAR_ATTEMPTS {
        rng.try_fill_bytes(&mut bytes[..])
            .map_err(|e| WraithError::RandomSourceUnavailable(e.to_string()))?;

        let candidate: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
        if let Some(scalar) = candidate {
            if !bool::from(scalar.is_zero()) {
                return Ok(Zeroizing::new(scalar));
            }
        }
    }

    Err(WraithError::RandomSourceUnavailable(
        "random source produced no valid scalar".into(),
    ))
}

/// Computes `k·G` for a secret scalar.
pub fn public_from_scalar(scalar: &NonZeroScalar) -> PublicKey {
    PublicKey::from_secret_scalar(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// secp256k1 generator, compressed.
    const G_HEX: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    /// n - 1
    const N_MINUS_ONE: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140";

    #[test]
    fn test_decode_generator() {
        let g = CompressedPoint::from_hex(G_HEX).unwrap();
        let pk = decode_point(&g).unwrap();
        assert_eq!(pk.to_projective(), ProjectivePoint::GENERATOR);
        assert_eq!(compress(&pk), g);
    }

    #[test]
    fn test_decode_point_off_curve() {
        // x = 5 has no matching y on secp256k1
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 5;
        let point = CompressedPoint::from_array(bytes);
        assert!(matches!(decode_point(&point), Err(WraithError::MalformedKey(_))));
    }

    #[test]
    fn test_decode_scalar_range() {
        let zero = SecretScalar::from_array([0u8; 32]);
        assert!(matches!(decode_scalar(&zero), Err(WraithError::MalformedKey(_))));

        let n_minus_one = SecretScalar::from_hex(N_MINUS_ONE).unwrap();
        assert!(decode_scalar(&n_minus_one).is_ok());

        let overflow = SecretScalar::from_array([0xff; 32]);
        assert!(matches!(decode_scalar(&overflow), Err(WraithError::MalformedKey(_))));
    }

    #[test]
    fn test_reduce_digest_wraps() {
        // n itself reduces to zero, n + 1 to one
        let mut n = [0u8; 32];
        hex::decode_to_slice(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            &mut n,
        )
        .unwrap();
        assert!(bool::from(reduce_digest(&n).is_zero()));

        n[31] = 0x42;
        assert_eq!(reduce_digest(&n), Scalar::ONE);

        let mut small = [0u8; 32];
        small[31] = 7;
        assert_eq!(reduce_digest(&small), Scalar::from(7u64));
    }

    #[test]
    fn test_identity_is_degenerate() {
        let err = to_public_key(ProjectivePoint::IDENTITY, "identity").unwrap_err();
        assert!(matches!(err, WraithError::DegenerateDerivation("identity")));
    }

    #[test]
    fn test_scalar_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let scalar = random_scalar(&mut rng).unwrap();
        let secret = scalar_to_secret(&scalar);
        let decoded = decode_scalar(&secret).unwrap();
        assert_eq!(*decoded, *scalar);
    }

    #[test]
    fn test_uncompressed_encoding() {
        let g = decode_point(&CompressedPoint::from_hex(G_HEX).unwrap()).unwrap();
        let bytes = uncompress(&g);
        assert_eq!(bytes[0], 0x04);
        assert_eq!(hex::encode(&bytes[1..33]), &G_HEX[2..]);
    }

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new("entropy source offline"))
        }
    }

    impl CryptoRng for FailingRng {}

    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl CryptoRng for ZeroRng {}

    #[test]
    fn test_random_scalar_source_failure() {
        let err = random_scalar(&mut FailingRng).unwrap_err();
        assert!(matches!(err, WraithError::RandomSourceUnavailable(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_random_scalar_rejects_zero_stream() {
        let err = random_scalar(&mut ZeroRng).unwrap_err();
        assert!(matches!(err, WraithError::RandomSourceUnavailable(_)));
    }
}
