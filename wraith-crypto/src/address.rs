//! Address derivation from stealth public keys.
//!
//! ```text
//! cosmos:   RIPEMD160(SHA256(compressed_pk))
//! ethereum: Keccak256(uncompressed_pk[1..65])[12..32]
//! ```

use k256::PublicKey;

use wraith_core::config::AddressFormat;
use wraith_core::constants::STEALTH_ADDRESS_SIZE;
use wraith_core::StealthAddress;

use crate::curve::{compress, uncompress};
use crate::hash::{keccak256, ripemd160, sha256};

/// Maps a public key to a 20-byte ledger address.
pub trait AddressScheme: Send + Sync + 'static {
    /// Format identifier, used for configuration round-trips.
    const FORMAT: AddressFormat;

    /// Derives the address of `public_key`.
    fn derive(public_key: &PublicKey) -> StealthAddress;
}

/// CometBFT / Cosmos SDK secp256k1 account address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CosmosAddress;

impl AddressScheme for CosmosAddress {
    const FORMAT: AddressFormat = AddressFormat::Cosmos;

    fn derive(public_key: &PublicKey) -> StealthAddress {
        let compressed = compress(public_key);
        StealthAddress::from_array(ripemd160(&sha256(compressed.as_bytes())))
    }
}

/// Ethereum externally-owned account address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EthereumAddress;

impl AddressScheme for EthereumAddress {
    const FORMAT: AddressFormat = AddressFormat::Ethereum;

    fn derive(public_key: &PublicKey) -> StealthAddress {
        let uncompressed = uncompress(public_key);
        let hash = keccak256(&uncompressed[1..]);

        let mut address = [0u8; STEALTH_ADDRESS_SIZE];
        address.copy_from_slice(&hash[32 - STEALTH_ADDRESS_SIZE..]);
        StealthAddress::from_array(address)
    }
}
