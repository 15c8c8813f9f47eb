//! The stealth suite.
//!
//! A stateless protocol engine bound to secp256k1, a shared-secret hash `H`
//! and an address scheme `A`.
//!
//! ## Protocol
//!
//! ```text
//! sender:     r <- random,  R = r·G,  P = r·V
//! recipient:  P = v·R
//! both:       h = reduce(H(compress(P)))
//!             K = h·G + S
//!             address = A(K)
//! spend:      k = s + h  (mod n),   k·G = K
//! ```
//!
//! Every operation is a pure function of its inputs (plus fresh randomness
//! for generation), so one suite value can be shared by any number of
//! threads.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use k256::{ProjectivePoint, PublicKey, Scalar};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use wraith_core::config::{AddressFormat, HashAlgorithm, SuiteConfig};
use wraith_core::{
    CompressedPoint, GeneratedAddress, MetaAddress, Result, SecretScalar, StealthAddress,
    WraithError,
};

use crate::address::{AddressScheme, CosmosAddress, EthereumAddress};
use crate::curve;
use crate::hash::{Keccak256, SharedSecretHash, Sha256};
use crate::view_tag::{compute_view_tag, verify_view_tag};

/// SHA-256 shared-secret hash with Cosmos addresses.
pub type DefaultSuite = StealthSuite<Sha256, CosmosAddress>;

/// Keccak-256 shared-secret hash with Ethereum addresses.
pub type EthereumSuite = StealthSuite<Keccak256, EthereumAddress>;

/// Dual-key stealth address suite over secp256k1.
///
/// # Example
///
/// ```
/// use wraith_crypto::{generate_stealth_keys, DefaultSuite};
///
/// let suite = DefaultSuite::new();
/// let keys = generate_stealth_keys().unwrap();
///
/// let generated = suite.generate_stealth_address(&keys.meta_address()).unwrap();
/// assert!(suite
///     .check_stealth_address(
///         &generated.address,
///         &generated.ephemeral_public_key,
///         &keys.view.secret,
///         &keys.spend.public,
///     )
///     .unwrap());
/// ```
pub struct StealthSuite<H = Sha256, A = CosmosAddress> {
    _marker: PhantomData<fn() -> (H, A)>,
}

/// Shared point and the scalar hashed from it.
struct SharedSecret {
    point: CompressedPoint,
    h: Zeroizing<Scalar>,
}

impl<H: SharedSecretHash, A: AddressScheme> StealthSuite<H, A> {
    /// Binds a suite to the hash `H` and address scheme `A`. Cannot fail.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Returns the configuration this suite implements.
    pub fn config(&self) -> SuiteConfig {
        SuiteConfig::new(H::ALGORITHM, A::FORMAT)
    }

    /// Shared-secret hash primitive.
    ///
    /// Deterministic; each call starts from a fresh hash state.
    pub fn hash(&self, input: &[u8]) -> [u8; 32] {
        H::digest(input)
    }

    /// Generates a one-time stealth address for `meta` using the OS CSPRNG.
    ///
    /// # Errors
    /// - `MalformedKey` if either half of `meta` is not a curve point
    /// - `RandomSourceUnavailable` if the OS cannot supply randomness
    /// - `DegenerateDerivation` if the derivation collapses (negligible)
    pub fn generate_stealth_address(&self, meta: &MetaAddress) -> Result<GeneratedAddress> {
        self.generate_stealth_address_with_rng(meta, &mut OsRng)
    }

    /// Generates a one-time stealth address drawing `r` from `rng`.
    pub fn generate_stealth_address_with_rng<R: RngCore + CryptoRng>(
        &self,
        meta: &MetaAddress,
        rng: &mut R,
    ) -> Result<GeneratedAddress> {
        let (view, spend) = curve::decode_meta_address(meta)?;

        let r = curve::random_scalar(rng)?;
        let ephemeral = curve::to_public_key(ProjectivePoint::GENERATOR * *r, "ephemeral key is the identity")?;

        let shared = self.shared_secret(view.to_projective() * *r)?;
        let stealth = Self::stealth_point(&shared, &spend)?;

        Ok(GeneratedAddress {
            address: A::derive(&stealth),
            ephemeral_public_key: curve::compress(&ephemeral),
            view_tag: compute_view_tag::<H>(&shared.point),
        })
    }

    /// Returns true if `address` was generated for the owner of `view_secret`
    /// and `spend_public`.
    ///
    /// # Errors
    /// `MalformedKey` for points off the curve or an out-of-range view scalar;
    /// `DegenerateDerivation` if the recomputed stealth key collapses.
    pub fn check_stealth_address(
        &self,
        address: &StealthAddress,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_public: &CompressedPoint,
    ) -> Result<bool> {
        let spend = curve::decode_point(spend_public)?;
        let shared = self.recipient_shared_secret(ephemeral_public_key, view_secret)?;
        let expected = A::derive(&Self::stealth_point(&shared, &spend)?);

        Ok(expected.as_bytes().ct_eq(address.as_bytes()).into())
    }

    /// Recovers the one-time private key `k = s + h (mod n)`.
    ///
    /// The address is not consulted; confirm ownership with
    /// [`check_stealth_address`](Self::check_stealth_address) first.
    ///
    /// # Errors
    /// `MalformedKey` for bad points or scalars; `DegenerateDerivation` if
    /// `k` is zero.
    pub fn compute_stealth_key(
        &self,
        _address: &StealthAddress,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_secret: &SecretScalar,
    ) -> Result<SecretScalar> {
        let s = curve::decode_scalar(spend_secret)?;
        let shared = self.recipient_shared_secret(ephemeral_public_key, view_secret)?;

        let k = Zeroizing::new(*s + *shared.h);
        if bool::from(k.is_zero()) {
            return Err(WraithError::DegenerateDerivation("stealth private key is zero"));
        }

        Ok(curve::scalar_to_secret(&k))
    }

    /// Recomputes the stealth public key `K = h·G + S` on the recipient side.
    pub fn stealth_public_key(
        &self,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_public: &CompressedPoint,
    ) -> Result<CompressedPoint> {
        let spend = curve::decode_point(spend_public)?;
        let shared = self.recipient_shared_secret(ephemeral_public_key, view_secret)?;
        Ok(curve::compress(&Self::stealth_point(&shared, &spend)?))
    }

    /// Address of the public key `k·G`.
    pub fn address_of_secret(&self, secret: &SecretScalar) -> Result<StealthAddress> {
        let scalar = curve::decode_scalar(secret)?;
        Ok(A::derive(&curve::public_from_scalar(&scalar)))
    }

    /// Address of a compressed public key.
    pub fn address_of_public_key(&self, public_key: &CompressedPoint) -> Result<StealthAddress> {
        Ok(A::derive(&curve::decode_point(public_key)?))
    }

    /// Computes the view tag a sender would have attached for `R`.
    pub fn view_tag(&self, ephemeral_public_key: &CompressedPoint, view_secret: &SecretScalar) -> Result<u8> {
        let shared = self.recipient_shared_secret(ephemeral_public_key, view_secret)?;
        Ok(compute_view_tag::<H>(&shared.point))
    }

    /// Cheap pre-filter: true if `tag` matches the view tag for `R`.
    ///
    /// A `false` result is definitive. A `true` result still needs
    /// [`check_stealth_address`](Self::check_stealth_address).
    pub fn check_view_tag(
        &self,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        tag: u8,
    ) -> Result<bool> {
        let ephemeral = curve::decode_point(ephemeral_public_key)?;
        let v = curve::decode_scalar(view_secret)?;
        let shared = curve::to_public_key(ephemeral.to_projective() * *v, "shared point is the identity")?;
        Ok(verify_view_tag::<H>(&curve::compress(&shared), tag))
    }

    /// `P = v·R`, hashed.
    fn recipient_shared_secret(
        &self,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
    ) -> Result<SharedSecret> {
        let ephemeral = curve::decode_point(ephemeral_public_key)?;
        let v = curve::decode_scalar(view_secret)?;
        self.shared_secret(ephemeral.to_projective() * *v)
    }

    fn shared_secret(&self, point: ProjectivePoint) -> Result<SharedSecret> {
        let point = curve::compress(&curve::to_public_key(point, "shared point is the identity")?);
        let h = Zeroizing::new(curve::reduce_digest(&H::digest(point.as_bytes())));

        if bool::from(h.is_zero()) {
            return Err(WraithError::DegenerateDerivation("shared-secret hash reduces to zero"));
        }

        Ok(SharedSecret { point, h })
    }

    /// `K = h·G + S`
    fn stealth_point(shared: &SharedSecret, spend: &PublicKey) -> Result<PublicKey> {
        let k = ProjectivePoint::GENERATOR * *shared.h + spend.to_projective();
        curve::to_public_key(k, "stealth public key is the identity")
    }
}

impl<H: SharedSecretHash, A: AddressScheme> Default for StealthSuite<H, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, A> Clone for StealthSuite<H, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, A> Copy for StealthSuite<H, A> {}

impl<H: SharedSecretHash, A: AddressScheme> fmt::Debug for StealthSuite<H, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StealthSuite({})", self.config())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUNTIME-SELECTED SUITES
// ═══════════════════════════════════════════════════════════════════════════════

/// Object-safe view of a suite, for callers that pick the hash and address
/// format at runtime.
pub trait StealthProtocol: Send + Sync + fmt::Debug {
    /// The suite's configuration.
    fn config(&self) -> SuiteConfig;

    /// See [`StealthSuite::hash`].
    fn hash(&self, input: &[u8]) -> [u8; 32];

    /// See [`StealthSuite::generate_stealth_address`].
    fn generate_stealth_address(&self, meta: &MetaAddress) -> Result<GeneratedAddress>;

    /// See [`StealthSuite::check_stealth_address`].
    fn check_stealth_address(
        &self,
        address: &StealthAddress,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_public: &CompressedPoint,
    ) -> Result<bool>;

    /// See [`StealthSuite::compute_stealth_key`].
    fn compute_stealth_key(
        &self,
        address: &StealthAddress,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_secret: &SecretScalar,
    ) -> Result<SecretScalar>;

    /// See [`StealthSuite::address_of_secret`].
    fn address_of_secret(&self, secret: &SecretScalar) -> Result<StealthAddress>;

    /// See [`StealthSuite::check_view_tag`].
    fn check_view_tag(
        &self,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        tag: u8,
    ) -> Result<bool>;
}

impl<H: SharedSecretHash, A: AddressScheme> StealthProtocol for StealthSuite<H, A> {
    fn config(&self) -> SuiteConfig {
        StealthSuite::config(self)
    }

    fn hash(&self, input: &[u8]) -> [u8; 32] {
        StealthSuite::hash(self, input)
    }

    fn generate_stealth_address(&self, meta: &MetaAddress) -> Result<GeneratedAddress> {
        StealthSuite::generate_stealth_address(self, meta)
    }

    fn check_stealth_address(
        &self,
        address: &StealthAddress,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_public: &CompressedPoint,
    ) -> Result<bool> {
        StealthSuite::check_stealth_address(self, address, ephemeral_public_key, view_secret, spend_public)
    }

    fn compute_stealth_key(
        &self,
        address: &StealthAddress,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        spend_secret: &SecretScalar,
    ) -> Result<SecretScalar> {
        StealthSuite::compute_stealth_key(self, address, ephemeral_public_key, view_secret, spend_secret)
    }

    fn address_of_secret(&self, secret: &SecretScalar) -> Result<StealthAddress> {
        StealthSuite::address_of_secret(self, secret)
    }

    fn check_view_tag(
        &self,
        ephemeral_public_key: &CompressedPoint,
        view_secret: &SecretScalar,
        tag: u8,
    ) -> Result<bool> {
        StealthSuite::check_view_tag(self, ephemeral_public_key, view_secret, tag)
    }
}

/// Builds the suite described by `config`.
pub fn suite_for(config: &SuiteConfig) -> Arc<dyn StealthProtocol> {
    match (config.hash, config.address) {
        (HashAlgorithm::Sha256, AddressFormat::Cosmos) => Arc::new(StealthSuite::<Sha256, CosmosAddress>::new()),
        (HashAlgorithm::Sha256, AddressFormat::Ethereum) => Arc::new(StealthSuite::<Sha256, EthereumAddress>::new()),
        (HashAlgorithm::Keccak256, AddressFormat::Cosmos) => Arc::new(StealthSuite::<Keccak256, CosmosAddress>::new()),
        (HashAlgorithm::Keccak256, AddressFormat::Ethereum) => Arc::new(StealthSuite::<Keccak256, EthereumAddress>::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_stealth_keys_with_rng, public_key_from_secret};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use test_case::test_case;

    fn rng(seed: u64) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_generate_then_check() {
        let suite = DefaultSuite::new();
        let keys = generate_stealth_keys_with_rng(&mut rng(1)).unwrap();

        let generated = suite
            .generate_stealth_address_with_rng(&keys.meta_address(), &mut rng(2))
            .unwrap();

        assert!(suite
            .check_stealth_address(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.public,
            )
            .unwrap());
    }

    #[test]
    fn test_generation_is_reproducible_with_seeded_rng() {
        let suite = DefaultSuite::new();
        let meta = generate_stealth_keys_with_rng(&mut rng(1)).unwrap().meta_address();

        let a = suite.generate_stealth_address_with_rng(&meta, &mut rng(9)).unwrap();
        let b = suite.generate_stealth_address_with_rng(&meta, &mut rng(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_recovered_key_controls_address() {
        let suite = DefaultSuite::new();
        let keys = generate_stealth_keys_with_rng(&mut rng(3)).unwrap();
        let generated = suite
            .generate_stealth_address_with_rng(&keys.meta_address(), &mut rng(4))
            .unwrap();

        let k = suite
            .compute_stealth_key(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.secret,
            )
            .unwrap();

        assert_eq!(suite.address_of_secret(&k).unwrap(), generated.address);

        let expected_pk = suite
            .stealth_public_key(&generated.ephemeral_public_key, &keys.view.secret, &keys.spend.public)
            .unwrap();
        assert_eq!(public_key_from_secret(&k).unwrap(), expected_pk);
        assert_eq!(suite.address_of_public_key(&expected_pk).unwrap(), generated.address);
    }

    #[test]
    fn test_view_tag_matches_generation() {
        let suite = DefaultSuite::new();
        let keys = generate_stealth_keys_with_rng(&mut rng(5)).unwrap();
        let generated = suite
            .generate_stealth_address_with_rng(&keys.meta_address(), &mut rng(6))
            .unwrap();

        let tag = suite.view_tag(&generated.ephemeral_public_key, &keys.view.secret).unwrap();
        assert_eq!(tag, generated.view_tag);
        assert!(suite
            .check_view_tag(&generated.ephemeral_public_key, &keys.view.secret, generated.view_tag)
            .unwrap());
        assert!(!suite
            .check_view_tag(
                &generated.ephemeral_public_key,
                &keys.view.secret,
                generated.view_tag.wrapping_add(1)
            )
            .unwrap());
    }

    #[test]
    fn test_suites_are_not_interchangeable() {
        let keys = generate_stealth_keys_with_rng(&mut rng(7)).unwrap();
        let generated = DefaultSuite::new()
            .generate_stealth_address_with_rng(&keys.meta_address(), &mut rng(8))
            .unwrap();

        let eth = EthereumSuite::new();
        assert!(!eth
            .check_stealth_address(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.public,
            )
            .unwrap());
    }

    #[test]
    fn test_recovery_degenerate_when_spend_cancels_hash() {
        let suite = DefaultSuite::new();
        let keys = generate_stealth_keys_with_rng(&mut rng(10)).unwrap();
        let generated = suite
            .generate_stealth_address_with_rng(&keys.meta_address(), &mut rng(11))
            .unwrap();

        // s = -h makes k = 0
        let shared = suite
            .recipient_shared_secret(&generated.ephemeral_public_key, &keys.view.secret)
            .unwrap();
        let cancelling = curve::scalar_to_secret(&-*shared.h);

        let err = suite
            .compute_stealth_key(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &cancelling,
            )
            .unwrap_err();
        assert!(matches!(err, WraithError::DegenerateDerivation(_)));
    }

    /// Hash whose output is the group order, so it reduces to `h = 0`.
    struct OrderHash;

    impl SharedSecretHash for OrderHash {
        const ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

        fn digest_parts(_parts: &[&[u8]]) -> [u8; 32] {
            let mut n = [0u8; 32];
            hex::decode_to_slice(
                "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
                &mut n,
            )
            .unwrap();
            n
        }
    }

    #[test]
    fn test_zero_shared_secret_hash_is_degenerate() {
        let suite = StealthSuite::<OrderHash, CosmosAddress>::new();
        let keys = generate_stealth_keys_with_rng(&mut rng(13)).unwrap();

        let err = suite
            .generate_stealth_address_with_rng(&keys.meta_address(), &mut rng(14))
            .unwrap_err();
        assert!(matches!(err, WraithError::DegenerateDerivation(_)));

        let err = suite
            .check_stealth_address(
                &StealthAddress::zero(),
                &keys.view.public,
                &keys.view.secret,
                &keys.spend.public,
            )
            .unwrap_err();
        assert!(matches!(err, WraithError::DegenerateDerivation(_)));

        let err = suite
            .compute_stealth_key(
                &StealthAddress::zero(),
                &keys.view.public,
                &keys.view.secret,
                &keys.spend.secret,
            )
            .unwrap_err();
        assert!(matches!(err, WraithError::DegenerateDerivation(_)));
    }

    #[test]
    fn test_rejects_zero_view_secret() {
        let suite = DefaultSuite::new();
        let keys = generate_stealth_keys_with_rng(&mut rng(12)).unwrap();
        let zero = SecretScalar::from_array([0u8; 32]);

        let err = suite
            .check_stealth_address(&StealthAddress::zero(), &keys.view.public, &zero, &keys.spend.public)
            .unwrap_err();
        assert!(matches!(err, WraithError::MalformedKey(_)));
    }

    #[test_case(HashAlgorithm::Sha256, AddressFormat::Cosmos ; "sha256 cosmos")]
    #[test_case(HashAlgorithm::Sha256, AddressFormat::Ethereum ; "sha256 ethereum")]
    #[test_case(HashAlgorithm::Keccak256, AddressFormat::Cosmos ; "keccak256 cosmos")]
    #[test_case(HashAlgorithm::Keccak256, AddressFormat::Ethereum ; "keccak256 ethereum")]
    fn test_suite_for_round_trip(hash: HashAlgorithm, address: AddressFormat) {
        let config = SuiteConfig::new(hash, address);
        let suite = suite_for(&config);
        assert_eq!(suite.config(), config);

        let keys = generate_stealth_keys_with_rng(&mut rng(13)).unwrap();
        let generated = suite.generate_stealth_address(&keys.meta_address()).unwrap();
        assert!(suite
            .check_stealth_address(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.public,
            )
            .unwrap());
        assert!(suite
            .check_view_tag(&generated.ephemeral_public_key, &keys.view.secret, generated.view_tag)
            .unwrap());

        let k = suite
            .compute_stealth_key(
                &generated.address,
                &generated.ephemeral_public_key,
                &keys.view.secret,
                &keys.spend.secret,
            )
            .unwrap();
        assert_eq!(suite.address_of_secret(&k).unwrap(), generated.address);
    }

    #[test]
    fn test_debug_shows_config() {
        assert_eq!(format!("{:?}", DefaultSuite::new()), "StealthSuite(secp256k1/sha256/cosmos)");
        assert_eq!(format!("{:?}", EthereumSuite::new()), "StealthSuite(secp256k1/keccak256/ethereum)");
    }
}
