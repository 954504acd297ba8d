//! # Raw Bytes Codec
//!
//! The private key, unencrypted, as 32 bytes or 64 hex characters. No
//! password, no checksum, no second chances. The caller is responsible for
//! wherever these bytes end up.

use zeroize::Zeroizing;

use crate::config::{HEX_PREFIX, PRIVATE_KEY_LENGTH};
use crate::crypto::keys::{decode_hex, KeyPair};
use crate::error::{IdentityError, Result};

/// Export the raw 32-byte private key. The buffer is wiped on drop.
pub fn export_raw_bytes(keypair: &KeyPair) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
    keypair.private_key_bytes()
}

/// Import a key pair from exactly 32 raw private key bytes.
pub fn import_raw_bytes(bytes: &[u8]) -> Result<KeyPair> {
    KeyPair::from_raw_private_bytes(bytes)
}

/// Export the private key as `0x`-prefixed hex.
pub fn export_raw_hex(keypair: &KeyPair) -> Zeroizing<String> {
    Zeroizing::new(format!(
        "{HEX_PREFIX}{}",
        hex::encode(&export_raw_bytes(keypair)[..])
    ))
}

/// Import a key pair from hex, `0x` optional.
pub fn import_raw_hex(text: &str) -> Result<KeyPair> {
    let bytes = Zeroizing::new(
        decode_hex(text).map_err(|e| IdentityError::InvalidKeyFormat(format!("bad hex: {e}")))?,
    );
    import_raw_bytes(&bytes)
}
