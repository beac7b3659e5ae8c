//! Typed-digest signature authorization for allowances.
//!
//! A permit is an offline-signed message granting a spending allowance
//! without a separate approval call. The digest layout is the EIP-712
//! convention: a domain separator binding protocol name, version, chain
//! identifier, and the ledger's own identity, hashed together with a
//! typed struct hash over `(owner, spender, value, nonce, deadline)`.
//! Embedding the pre-increment nonce gives every signature single-use
//! semantics.

use alloy_primitives::{keccak256, Address, B256, U256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::error::AmmError;

/// A recoverable secp256k1 signature in `(v, r, s)` form.
///
/// `v` carries the recovery id, accepted either raw (`0`/`1`) or with
/// the conventional 27 offset (`27`/`28`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// Recovery id, raw or offset by 27.
    pub v: u8,
    /// First signature scalar, big-endian.
    pub r: B256,
    /// Second signature scalar, big-endian.
    pub s: B256,
}

impl EcdsaSignature {
    /// Creates a signature from its three components.
    #[must_use]
    pub const fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }
}

/// Hash of the domain type string.
fn domain_typehash() -> B256 {
    keccak256(b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
}

/// Hash of the permit type string.
pub(crate) fn permit_typehash() -> B256 {
    keccak256(b"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)")
}

/// Computes a ledger's domain separator.
///
/// Binds the ledger name, protocol version `"1"`, the chain identifier,
/// and the ledger's own identity, so a signature for one ledger or one
/// chain never validates on another.
pub(crate) fn domain_separator(name: &str, chain_id: u64, ledger: Address) -> B256 {
    let mut words = [0u8; 160];
    words[0..32].copy_from_slice(domain_typehash().as_slice());
    words[32..64].copy_from_slice(keccak256(name.as_bytes()).as_slice());
    words[64..96].copy_from_slice(keccak256(b"1").as_slice());
    words[96..128].copy_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    words[128..160].copy_from_slice(ledger.into_word().as_slice());
    keccak256(words)
}

/// Computes the typed struct hash for one permit.
pub(crate) fn permit_struct_hash(
    owner: Address,
    spender: Address,
    value: U256,
    nonce: u64,
    deadline: u64,
) -> B256 {
    let mut words = [0u8; 192];
    words[0..32].copy_from_slice(permit_typehash().as_slice());
    words[32..64].copy_from_slice(owner.into_word().as_slice());
    words[64..96].copy_from_slice(spender.into_word().as_slice());
    words[96..128].copy_from_slice(&value.to_be_bytes::<32>());
    words[128..160].copy_from_slice(&U256::from(nonce).to_be_bytes::<32>());
    words[160..192].copy_from_slice(&U256::from(deadline).to_be_bytes::<32>());
    keccak256(words)
}

/// Folds a domain separator and struct hash into the signable digest.
pub(crate) fn typed_digest(domain: B256, struct_hash: B256) -> B256 {
    let mut message = [0u8; 66];
    message[0] = 0x19;
    message[1] = 0x01;
    message[2..34].copy_from_slice(domain.as_slice());
    message[34..66].copy_from_slice(struct_hash.as_slice());
    keccak256(message)
}

/// Recovers the signing identity from a digest and signature.
///
/// # Errors
///
/// Returns [`AmmError::InvalidSignature`] if the recovery id or scalars
/// are malformed, or if point recovery fails.
pub(crate) fn recover_signer(digest: B256, sig: &EcdsaSignature) -> Result<Address, AmmError> {
    let recovery_id = match sig.v {
        0 | 27 => RecoveryId::from_byte(0),
        1 | 28 => RecoveryId::from_byte(1),
        _ => None,
    }
    .ok_or(AmmError::InvalidSignature)?;

    let signature =
        Signature::from_scalars(sig.r.0, sig.s.0).map_err(|_| AmmError::InvalidSignature)?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|_| AmmError::InvalidSignature)?;
    Ok(address_of(&key))
}

/// Derives the 20-byte identity of a verifying key: the trailing bytes
/// of the keccak hash of the uncompressed public key.
#[must_use]
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Signs a digest, producing a recoverable `(v, r, s)` signature.
///
/// This is the wallet-side half of the permit flow; the ledger only ever
/// verifies.
///
/// # Errors
///
/// Returns [`AmmError::InvalidSignature`] if signing fails for the given
/// key material.
pub fn sign_digest(key: &SigningKey, digest: B256) -> Result<EcdsaSignature, AmmError> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest.as_slice())
        .map_err(|_| AmmError::InvalidSignature)?;
    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    Ok(EcdsaSignature {
        v: 27 + recovery_id.to_byte(),
        r: B256::from(r),
        s: B256::from(s),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn signing_key(byte: u8) -> SigningKey {
        let Ok(key) = SigningKey::from_slice(&[byte; 32]) else {
            panic!("valid scalar");
        };
        key
    }

    #[test]
    fn sign_and_recover_round_trip() {
        let key = signing_key(0x11);
        let owner = address_of(key.verifying_key());
        let digest = keccak256(b"round trip");
        let Ok(sig) = sign_digest(&key, digest) else {
            panic!("expected Ok");
        };
        assert_eq!(recover_signer(digest, &sig), Ok(owner));
    }

    #[test]
    fn different_digest_recovers_different_signer() {
        let key = signing_key(0x11);
        let owner = address_of(key.verifying_key());
        let Ok(sig) = sign_digest(&key, keccak256(b"signed message")) else {
            panic!("expected Ok");
        };
        // Recovery against the wrong digest yields some identity, but not
        // the signer's.
        match recover_signer(keccak256(b"other message"), &sig) {
            Ok(recovered) => assert_ne!(recovered, owner),
            Err(e) => assert_eq!(e, AmmError::InvalidSignature),
        }
    }

    #[test]
    fn malformed_recovery_id_rejected() {
        let key = signing_key(0x22);
        let digest = keccak256(b"payload");
        let Ok(mut sig) = sign_digest(&key, digest) else {
            panic!("expected Ok");
        };
        sig.v = 99;
        assert_eq!(recover_signer(digest, &sig), Err(AmmError::InvalidSignature));
    }

    #[test]
    fn raw_and_offset_v_are_equivalent() {
        let key = signing_key(0x33);
        let digest = keccak256(b"v encoding");
        let Ok(sig) = sign_digest(&key, digest) else {
            panic!("expected Ok");
        };
        let raw = EcdsaSignature::new(sig.v - 27, sig.r, sig.s);
        assert_eq!(recover_signer(digest, &sig), recover_signer(digest, &raw));
    }

    #[test]
    fn domain_separator_is_identity_sensitive() {
        let a = domain_separator("Pairswap V1", 1, Address::repeat_byte(1));
        let b = domain_separator("Pairswap V1", 1, Address::repeat_byte(2));
        let c = domain_separator("Pairswap V1", 2, Address::repeat_byte(1));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn struct_hash_embeds_the_nonce() {
        let owner = Address::repeat_byte(1);
        let spender = Address::repeat_byte(2);
        let h0 = permit_struct_hash(owner, spender, U256::from(10), 0, 100);
        let h1 = permit_struct_hash(owner, spender, U256::from(10), 1, 100);
        assert_ne!(h0, h1);
    }
}
