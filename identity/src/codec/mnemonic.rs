//! # Mnemonic Codec
//!
//! Writes a private key down as 24 BIP-39 words, and reads it back.
//!
//! The 32 private key bytes are used directly as BIP-39 entropy. We never
//! run the PBKDF2 seed step: the words *are* the key, so the mapping is
//! lossless in both directions and the same words always give the same key.
//! The trailing checksum bits catch a mistyped or swapped word.

use bip39::{Language, Mnemonic};

use crate::config::{MNEMONIC_WORD_COUNT, PRIVATE_KEY_LENGTH};
use crate::crypto::keys::KeyPair;
use crate::error::{IdentityError, Result};

fn to_mnemonic(keypair: &KeyPair) -> Result<Mnemonic> {
    Mnemonic::from_entropy_in(Language::English, &keypair.private_key_bytes()[..])
        .map_err(|e| IdentityError::InvalidMnemonic(e.to_string()))
}

/// Export the private key as an ordered list of 24 English words.
pub fn export_mnemonic(keypair: &KeyPair) -> Result<Vec<String>> {
    Ok(to_mnemonic(keypair)?
        .words()
        .map(str::to_string)
        .collect())
}

/// Export the private key as a single space-separated phrase.
pub fn export_mnemonic_phrase(keypair: &KeyPair) -> Result<String> {
    Ok(to_mnemonic(keypair)?.to_string())
}

/// Import a key pair from an ordered list of words.
pub fn import_mnemonic<S: AsRef<str>>(words: &[S]) -> Result<KeyPair> {
    let phrase = words
        .iter()
        .map(|w| w.as_ref().trim())
        .collect::<Vec<_>>()
        .join(" ");
    import_mnemonic_phrase(&phrase)
}

/// Import a key pair from a phrase.
///
/// Leading/trailing whitespace, repeated spaces and letter case are
/// forgiven. Anything else (wrong word count, a word outside the English
/// list, a bad checksum) is [`IdentityError::InvalidMnemonic`].
pub fn import_mnemonic_phrase(phrase: &str) -> Result<KeyPair> {
    let normalized = phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>();

    if normalized.len() != MNEMONIC_WORD_COUNT {
        return Err(IdentityError::InvalidMnemonic(format!(
            "expected {MNEMONIC_WORD_COUNT} words, got {}",
            normalized.len()
        )));
    }

    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized.join(" "))
        .map_err(|e| {
            tracing::warn!("mnemonic rejected: {e}");
            IdentityError::InvalidMnemonic(e.to_string())
        })?;

    let (entropy, len) = mnemonic.to_entropy_array();
    if len != PRIVATE_KEY_LENGTH {
        return Err(IdentityError::InvalidMnemonic(format!(
            "expected {PRIVATE_KEY_LENGTH} bytes of entropy, got {len}"
        )));
    }
    let keypair = KeyPair::from_raw_private_bytes(&entropy[..len])?;
    tracing::info!(public_key = %keypair.public_key().to_hex(), "imported key from mnemonic");
    Ok(keypair)
}
