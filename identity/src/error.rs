//! Error types for the identity layer.
//!
//! Every fallible operation in this crate returns an [`IdentityError`].
//! Callers that need to branch on the failure (prompt for another password,
//! reject a CLI argument, ...) should match on [`IdentityError::kind`], which
//! is stable and cheap to copy, rather than on the message text.
//!
//! None of these errors carry secret material. Messages say *what* was
//! wrong with an input, never *which* bytes were in it.

use std::io;

use thiserror::Error;

use crate::identity::address::Address;

/// Errors that can occur while creating, encoding, or using an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Raw private key bytes were the wrong length or not decodable.
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// The archive was well-formed but could not be decrypted. Either the
    /// password is wrong or the ciphertext was tampered with; we don't say
    /// which.
    #[error("decryption failed -- wrong password or corrupted archive")]
    DecryptionError,

    /// The archive text is not an encrypted key archive at all.
    #[error("invalid encrypted archive: {0}")]
    InvalidArchive(String),

    /// Wrong word count, unknown word, or checksum mismatch.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The value cannot be read as an address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// `bind` was called on an account that already has an address.
    #[error("account is already bound to {current}; use rebind to replace it")]
    AlreadyBound {
        /// The address the account is currently bound to.
        current: Address,
    },

    /// The signing backend refused to produce a signature.
    #[error("signing failed: {0}")]
    SigningError(String),

    /// The operating system's random source is unavailable.
    #[error("secure random source unavailable: {0}")]
    EntropyError(String),

    /// Argon2 rejected the parameters or failed to stretch the password.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing an archive file failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Stable discriminant of an [`IdentityError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidKeyFormat,
    DecryptionError,
    InvalidArchive,
    InvalidMnemonic,
    InvalidAddress,
    AlreadyBound,
    SigningError,
    EntropyError,
    KeyDerivation,
    InvalidConfig,
    Io,
}

impl IdentityError {
    /// Returns the failure kind, for callers that branch on it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidKeyFormat(_) => ErrorKind::InvalidKeyFormat,
            IdentityError::DecryptionError => ErrorKind::DecryptionError,
            IdentityError::InvalidArchive(_) => ErrorKind::InvalidArchive,
            IdentityError::InvalidMnemonic(_) => ErrorKind::InvalidMnemonic,
            IdentityError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            IdentityError::AlreadyBound { .. } => ErrorKind::AlreadyBound,
            IdentityError::SigningError(_) => ErrorKind::SigningError,
            IdentityError::EntropyError(_) => ErrorKind::EntropyError,
            IdentityError::KeyDerivation(_) => ErrorKind::KeyDerivation,
            IdentityError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            IdentityError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, IdentityError>;
