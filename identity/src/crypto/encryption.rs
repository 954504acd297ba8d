//! # AES-256-GCM Encryption
//!
//! Authenticated encryption for private keys at rest.
//!
//! We use AES-256-GCM because it's an AEAD cipher: authentication and
//! encryption in one operation. A wrong key or a single flipped bit fails
//! the tag check, which is what lets the archive codec promise "wrong
//! password is an error, never a garbage key".
//!
//! ## Nonce management
//!
//! GCM is notoriously unforgiving about nonce reuse. Every call here draws a
//! fresh random 96-bit nonce from the OS CSPRNG, and every archive also has
//! a fresh salt and therefore a fresh key. Reuse would need both to collide.
//!
//! ## Associated data
//!
//! Callers pass the archive header as associated data, so the KDF
//! parameters and salt can't be swapped out from under the ciphertext.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};
use crate::error::IdentityError;

/// Errors from the AEAD layer.
///
/// Intentionally vague. The difference between "wrong key" and "corrupted
/// ciphertext" is none of an attacker's business.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong key or corrupted ciphertext")]
    DecryptFailed,

    #[error("could not draw a random nonce: {0}")]
    NonceUnavailable(String),
}

impl From<EncryptionError> for IdentityError {
    fn from(err: EncryptionError) -> Self {
        match err {
            EncryptionError::DecryptFailed => IdentityError::DecryptionError,
            EncryptionError::NonceUnavailable(msg) => IdentityError::EntropyError(msg),
            EncryptionError::EncryptFailed => {
                IdentityError::InvalidArchive("could not seal archive".into())
            }
        }
    }
}

/// Encrypt with associated data under a fresh random nonce.
///
/// Returns `(nonce, ciphertext)`; the ciphertext carries the 16-byte tag.
/// The same `aad` must be supplied to [`decrypt_with_aad`].
pub fn encrypt_with_aad(
    key: &[u8; AES_KEY_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<([u8; AES_NONCE_LENGTH], Vec<u8>), EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| EncryptionError::NonceUnavailable(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::EncryptFailed)?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt ciphertext produced by [`encrypt_with_aad`].
///
/// The plaintext comes back in a zeroizing buffer since, in this crate,
/// it is always private key material.
pub fn decrypt_with_aad(
    key: &[u8; AES_KEY_LENGTH],
    nonce: &[u8; AES_NONCE_LENGTH],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map(Zeroizing::new)
        .map_err(|_| EncryptionError::DecryptFailed)
}
