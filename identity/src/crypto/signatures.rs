//! # Signature Verification
//!
//! Signing lives on [`KeyPair`]; this module is for the other side of the
//! conversation, where all you have is a public key, a hash and a signature,
//! usually as hex strings off an API response or a command line.
//!
//! Verification uses ed25519-dalek's strict mode here. We reject some
//! edge-case signatures that lenient implementations accept, which is fine:
//! everything we sign ourselves passes strict verification.

use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};

use super::keys::{decode_hex, KeyPair, PublicKey, Signature};
use crate::config::{HASH_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::error::{IdentityError, Result};

/// Sign a 32-byte hash. Thin wrapper over [`KeyPair::sign`] so call sites
/// read symmetrically with [`verify`].
pub fn sign(keypair: &KeyPair, hash: &[u8; HASH_LENGTH]) -> Result<Signature> {
    keypair.sign(hash)
}

/// Verify a signature over `hash`. `true` if valid, `false` otherwise.
pub fn verify(public_key: &PublicKey, hash: &[u8], signature: &Signature) -> bool {
    public_key.verify(hash, signature)
}

/// Strictly verify raw byte components.
///
/// Returns `Ok(false)` for a well-formed signature that doesn't verify, and
/// an error only when the public key bytes aren't a curve point.
pub fn verify_raw(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    hash: &[u8],
    signature: &[u8; SIGNATURE_LENGTH],
) -> Result<bool> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|_| IdentityError::InvalidKeyFormat("not a valid Ed25519 public key".into()))?;
    let signature = DalekSignature::from_bytes(signature);
    Ok(verifying_key.verify_strict(hash, &signature).is_ok())
}

/// Verify hex-encoded components (`0x` optional on each).
pub fn verify_hex(public_key_hex: &str, hash_hex: &str, signature_hex: &str) -> Result<bool> {
    let public_key = PublicKey::from_hex(public_key_hex)?;
    let hash = decode_hex(hash_hex)
        .map_err(|e| IdentityError::SigningError(format!("hash is not valid hex: {e}")))?;
    let signature = Signature::from_hex(signature_hex)?;
    let Some(sig_bytes) = signature.to_dalek_signature().map(|s| s.to_bytes()) else {
        return Ok(false);
    };
    verify_raw(public_key.as_bytes(), &hash, &sig_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify() {
        let kp = KeyPair::generate();
        let hash = [3u8; 32];
        let sig = sign(&kp, &hash).unwrap();
        assert!(verify(&kp.public_key(), &hash, &sig));
    }

    #[test]
    fn verify_raw_accepts_valid_signature() {
        let kp = KeyPair::generate();
        let hash = [5u8; 32];
        let sig = kp.sign(&hash).unwrap();
        let sig_bytes: [u8; 64] = sig.as_bytes().try_into().unwrap();
        assert!(verify_raw(&kp.public_key_bytes(), &hash, &sig_bytes).unwrap());
    }

    #[test]
    fn verify_raw_rejects_tampered_signature() {
        let kp = KeyPair::generate();
        let hash = [5u8; 32];
        let mut sig_bytes: [u8; 64] = kp.sign(&hash).unwrap().as_bytes().try_into().unwrap();
        sig_bytes[0] ^= 0x01;
        assert!(!verify_raw(&kp.public_key_bytes(), &hash, &sig_bytes).unwrap());
    }

    #[test]
    fn verify_hex_roundtrip() {
        let kp = KeyPair::generate();
        let hash_hex = format!("0x{}", hex::encode([0x11u8; 32]));
        let sig_hex = kp.sign_hex(&hash_hex).unwrap();
        assert!(verify_hex(&kp.public_key_checksum(), &hash_hex, &sig_hex).unwrap());
        assert!(verify_hex(&kp.public_key_api(), &hash_hex[2..], &sig_hex[2..]).unwrap());
    }

    #[test]
    fn verify_hex_other_key_is_false() {
        let kp = KeyPair::generate();
        let other = KeyPair::generate();
        let hash_hex = hex::encode([0x22u8; 32]);
        let sig_hex = kp.sign_hex(&hash_hex).unwrap();
        assert!(!verify_hex(&other.public_key_api(), &hash_hex, &sig_hex).unwrap());
    }

    #[test]
    fn verify_hex_bad_inputs_error() {
        assert!(verify_hex("0x1234", "00", "00").is_err());
    }
}
