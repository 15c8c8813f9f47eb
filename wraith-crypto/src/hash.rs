//! Hash primitives.
//!
//! The suite is generic over a [`SharedSecretHash`]: a fixed 32-byte digest
//! whose output is reduced big-endian modulo the secp256k1 group order.
//!
//! ```text
//! h = reduce(H(compress(P)))
//! ```
//!
//! Every call builds a fresh hasher on the stack, so a hash value can be
//! shared across threads freely.

use wraith_core::config::HashAlgorithm;
use wraith_core::constants::SHARED_SECRET_HASH_SIZE;

/// A 32-byte digest used to turn a shared point into a scalar.
pub trait SharedSecretHash: Send + Sync + 'static {
    /// Algorithm identifier, used for configuration round-trips.
    const ALGORITHM: HashAlgorithm;

    /// Hashes a single input.
    fn digest(input: &[u8]) -> [u8; SHARED_SECRET_HASH_SIZE] {
        Self::digest_parts(&[input])
    }

    /// Hashes the concatenation of `parts` without allocating.
    fn digest_parts(parts: &[&[u8]]) -> [u8; SHARED_SECRET_HASH_SIZE];
}

/// SHA-256, the default shared-secret hash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256;

impl SharedSecretHash for Sha256 {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

    fn digest_parts(parts: &[&[u8]]) -> [u8; SHARED_SECRET_HASH_SIZE] {
        use sha2::Digest;

        let mut hasher = sha2::Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// Keccak-256 (the pre-standard SHA-3 padding used by Ethereum).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256;

impl SharedSecretHash for Keccak256 {
    const ALGORITHM: HashAlgorithm = HashAlgorithm::Keccak256;

    fn digest_parts(parts: &[&[u8]]) -> [u8; SHARED_SECRET_HASH_SIZE] {
        use sha3::Digest;

        let mut hasher = sha3::Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// Computes SHA-256.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input)
}

/// Computes Keccak256 hash (used for Ethereum addresses).
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    Keccak256::digest(input)
}

/// Computes RIPEMD-160.
pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    use ripemd::{Digest, Ripemd160};

    Ripemd160::digest(input).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"", "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855" ; "empty")]
    #[test_case(b"abc", "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad" ; "abc")]
    fn test_sha256_vectors(input: &[u8], expected: &str) {
        assert_eq!(hex::encode(sha256(input)), expected);
    }

    #[test]
    fn test_keccak256_vectors() {
        // Known Keccak256 of empty string
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_ripemd160_vectors() {
        assert_eq!(
            hex::encode(ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    #[test]
    fn test_digest_parts_matches_concatenation() {
        let joined = Sha256::digest(b"hello world");
        let parts = Sha256::digest_parts(&[b"hello", b" ", b"world"]);
        assert_eq!(joined, parts);

        let joined = Keccak256::digest(b"hello world");
        let parts = Keccak256::digest_parts(&[b"hello ", b"world"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_hash_deterministic() {
        let input = [0x02u8; 33];
        assert_eq!(Sha256::digest(&input), Sha256::digest(&input));
        assert_ne!(Sha256::digest(&input), Keccak256::digest(&input));
    }

    #[test]
    fn test_algorithm_ids() {
        assert_eq!(Sha256::ALGORITHM, HashAlgorithm::Sha256);
        assert_eq!(Keccak256::ALGORITHM, HashAlgorithm::Keccak256);
    }
}
