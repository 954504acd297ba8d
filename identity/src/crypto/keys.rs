//! # Key Management
//!
//! Ed25519 key pairs for Convex accounts: generation, reconstruction from raw
//! secret bytes, and signing of transaction hashes.
//!
//! ## Hashes, not messages
//!
//! [`KeyPair::sign`] takes a finished 32-byte hash, not an arbitrary message.
//! The ledger decides how transactions are hashed; we just sign the digest
//! it hands us, byte for byte. That keeps this module out of the business of
//! knowing which hash function the network uses this year.
//!
//! ## Security considerations
//!
//! - Secret keys are zeroized on drop (ed25519-dalek's `zeroize` feature),
//!   and every API that hands secret bytes out wraps them in [`Zeroizing`].
//! - Generation uses `OsRng`. [`KeyPair::try_generate`] reports a broken OS
//!   random source instead of panicking.
//! - Key bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use zeroize::Zeroizing;

use crate::config::{
    HASH_LENGTH, HEX_PREFIX, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};
use crate::crypto::hash::to_checksum_hex;
use crate::error::{IdentityError, Result};

/// Strips an optional `0x`/`0X` prefix and decodes the rest as hex.
pub(crate) fn decode_hex(text: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(HEX_PREFIX)
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
}

/// An Ed25519 key pair, the atomic unit of identity.
///
/// Only the signing key is stored; the public key is re-derived from it on
/// demand, so the two can never drift apart.
///
/// `KeyPair` intentionally does NOT implement `Serialize`/`Deserialize`.
/// Exporting a private key should be a deliberate act through one of the
/// [`codec`](crate::codec) functions, not a side effect of shoving an
/// account into a JSON response.
///
/// # Examples
///
/// ```
/// use convex_identity::crypto::keys::KeyPair;
///
/// let kp = KeyPair::generate();
/// let hash = [7u8; 32];
/// let sig = kp.sign(&hash).unwrap();
/// assert!(kp.verify(&hash, &sig));
/// ```
pub struct KeyPair {
    signing_key: SigningKey,
}

/// The public half of a key pair, safe to share with the world.
///
/// Always a valid Ed25519 point: every constructor, deserialization
/// included, goes through [`PublicKey::from_bytes`].
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u8; PUBLIC_KEY_LENGTH]", into = "[u8; PUBLIC_KEY_LENGTH]")]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// An Ed25519 signature over a 32-byte hash.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 64 bytes
/// when produced by [`KeyPair::sign`]. A signature of any other length simply
/// fails verification.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS cryptographic RNG.
    ///
    /// Panics only if the OS random source is broken. Use
    /// [`try_generate`](Self::try_generate) if you'd rather get an error.
    pub fn generate() -> Self {
        let kp = Self {
            signing_key: SigningKey::generate(&mut OsRng),
        };
        tracing::debug!(public_key = %kp.public_key().to_hex(), "generated key pair");
        kp
    }

    /// Generate a fresh key pair, reporting RNG failure as
    /// [`IdentityError::EntropyError`].
    pub fn try_generate() -> Result<Self> {
        let mut seed = Zeroizing::new([0u8; PRIVATE_KEY_LENGTH]);
        OsRng
            .try_fill_bytes(&mut seed[..])
            .map_err(|e| IdentityError::EntropyError(e.to_string()))?;
        let kp = Self::from_seed(&seed);
        tracing::debug!(public_key = %kp.public_key().to_hex(), "generated key pair");
        Ok(kp)
    }

    /// Construct a key pair from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed, so this is also the
    /// raw-bytes import.
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a key pair from raw private key bytes.
    ///
    /// # Errors
    ///
    /// [`IdentityError::InvalidKeyFormat`] unless `bytes` is exactly 32 bytes.
    pub fn from_raw_private_bytes(bytes: &[u8]) -> Result<Self> {
        let seed: &[u8; PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            IdentityError::InvalidKeyFormat(format!(
                "expected {PRIVATE_KEY_LENGTH} private key bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_seed(seed))
    }

    /// Returns the public key associated with this key pair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.public_key_bytes(),
        }
    }

    /// Raw 32-byte public key.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key as `0x`-prefixed lowercase hex.
    pub fn public_key_hex(&self) -> String {
        format!("{HEX_PREFIX}{}", self.public_key().to_hex())
    }

    /// Public key as bare hex, the form the Convex HTTP API expects.
    pub fn public_key_api(&self) -> String {
        self.public_key().to_hex()
    }

    /// Public key as `0x`-prefixed, case-checksummed hex.
    pub fn public_key_checksum(&self) -> String {
        self.public_key().to_checksum()
    }

    /// Sign a 32-byte hash.
    ///
    /// Ed25519 is deterministic: the same key and hash always produce the
    /// same signature. `&self` only. Signing never mutates the key, so one
    /// key pair can sign from many threads at once.
    ///
    /// # Errors
    ///
    /// [`IdentityError::SigningError`] if the backend refuses to sign.
    pub fn sign(&self, hash: &[u8; HASH_LENGTH]) -> Result<Signature> {
        let sig = self
            .signing_key
            .try_sign(hash)
            .map_err(|e| IdentityError::SigningError(e.to_string()))?;
        Ok(Signature {
            bytes: sig.to_bytes().to_vec(),
        })
    }

    /// Sign a hex-encoded hash and return the `0x`-prefixed hex signature.
    ///
    /// The hash may carry a `0x` prefix. Anything that isn't exactly 32 bytes
    /// of hex is refused with [`IdentityError::SigningError`].
    pub fn sign_hex(&self, hash_hex: &str) -> Result<String> {
        let bytes = decode_hex(hash_hex)
            .map_err(|e| IdentityError::SigningError(format!("hash is not valid hex: {e}")))?;
        let hash: [u8; HASH_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            IdentityError::SigningError(format!(
                "hash must be {HASH_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(format!("{HEX_PREFIX}{}", self.sign(&hash)?.to_hex()))
    }

    /// Verify a signature against this key pair's public key.
    pub fn verify(&self, hash: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(hash, signature)
    }

    /// Export the raw 32-byte private key.
    ///
    /// **Handle with extreme care.** The buffer is wiped when dropped, but
    /// anything you copy out of it is your problem.
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl Clone for KeyPair {
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self::from_seed(&self.private_key_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material. Not even "partially."
        write!(f, "KeyPair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for KeyPair {
    /// Compares public keys. Comparing secrets in non-constant time is a
    /// bad habit, and the public key determines the identity anyway.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for KeyPair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    /// Build a public key from raw bytes, checking that they are a valid
    /// Ed25519 point.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Result<Self> {
        VerifyingKey::from_bytes(&bytes)
            .map_err(|_| IdentityError::InvalidKeyFormat("not a valid Ed25519 public key".into()))?;
        Ok(Self { bytes })
    }

    /// Parse a hex public key, with or without `0x`, in any letter case.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = decode_hex(text)
            .map_err(|e| IdentityError::InvalidKeyFormat(format!("public key hex: {e}")))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            IdentityError::InvalidKeyFormat(format!(
                "expected {PUBLIC_KEY_LENGTH} public key bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Verify a signature over `hash`.
    ///
    /// Returns a plain boolean: callers want yes/no, and a detailed error
    /// oracle helps nobody but attackers.
    pub fn verify(&self, hash: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Some(dalek_sig) = signature.to_dalek_signature() else {
            return false;
        };
        verifying_key.verify(hash, &dalek_sig).is_ok()
    }

    /// Lowercase hex without prefix. 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// `0x`-prefixed, case-checksummed hex.
    pub fn to_checksum(&self) -> String {
        to_checksum_hex(&self.bytes)
    }
}

impl TryFrom<[u8; PUBLIC_KEY_LENGTH]> for PublicKey {
    type Error = IdentityError;

    fn try_from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl From<PublicKey> for [u8; PUBLIC_KEY_LENGTH] {
    fn from(key: PublicKey) -> Self {
        key.bytes
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns `None` unless the stored bytes are exactly 64 long.
    pub fn to_dalek_signature(&self) -> Option<DalekSignature> {
        let arr: [u8; SIGNATURE_LENGTH] = self.bytes.as_slice().try_into().ok()?;
        Some(DalekSignature::from_bytes(&arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex signature, `0x` optional.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = decode_hex(text)
            .map_err(|e| IdentityError::SigningError(format!("signature hex: {e}")))?;
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(IdentityError::SigningError(format!(
                "expected {SIGNATURE_LENGTH} signature bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HEX_PREFIX}{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "Signature({})", hex_str)
        }
    }
}
