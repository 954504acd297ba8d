//! # Password Stretching
//!
//! Turns a human password into a 32-byte AES key with Argon2id.
//!
//! - Argon2id is memory-hard, so GPUs and ASICs don't get the usual
//!   thousand-fold discount on guessing.
//! - The salt is 16 bytes from the OS CSPRNG, fresh for every archive.
//! - Cost parameters travel with the archive (see [`codec::archive`]), so a
//!   file written with today's defaults still opens after we raise them.
//!
//! [`codec::archive`]: crate::codec::archive

use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;
use zeroize::Zeroizing;

use crate::config::{KdfParams, AES_KEY_LENGTH, ARCHIVE_SALT_LENGTH};
use crate::error::{IdentityError, Result};

/// A password used to encrypt or decrypt an archive.
///
/// One type, one encoding: whatever the caller passes in is stored as UTF-8
/// and stretched from its UTF-8 bytes. The buffer is wiped on drop and never
/// shows up in `Debug` output.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Zeroizing::new(text.into()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<&str> for Password {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Password {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Derive an AES-256 key from a password using Argon2id.
pub fn derive_key(
    password: &Password,
    salt: &[u8; ARCHIVE_SALT_LENGTH],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; AES_KEY_LENGTH]>> {
    let params = Params::new(
        params.m_cost,
        params.t_cost,
        params.p_cost,
        Some(AES_KEY_LENGTH),
    )
    .map_err(|e| IdentityError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; AES_KEY_LENGTH]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| IdentityError::KeyDerivation(e.to_string()))?;

    Ok(key)
}
