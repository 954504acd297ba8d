//! # Identity Configuration & Constants
//!
//! Every magic number in the identity layer lives here. If you're hardcoding
//! a key length somewhere else, you're doing it wrong and you owe the team
//! coffee.
//!
//! Two kinds of things live in this module:
//!
//! - **Constants** that define formats. Changing these after users have
//!   exported keys is somewhere between "difficult" and "career-ending",
//!   because every archive already on disk was written against them.
//! - **[`IdentityConfig`]**, the runtime knobs: which address model to use
//!   and how hard Argon2 should work when stretching a password.

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::identity::address::AddressScheme;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519, the signature scheme the Convex ledger verifies.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Private key length in bytes. Ed25519 secret keys are 32-byte seeds.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of the hash the ledger asks us to sign. The subsystem never hashes
/// anything itself; callers hand over a finished 32-byte digest.
pub const HASH_LENGTH: usize = 32;

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. Twelve. Not 16. Not 8. Twelve.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Encrypted Archive Format
// ---------------------------------------------------------------------------

/// Armor label of the encrypted archive. Appears in the BEGIN/END lines.
pub const ARCHIVE_LABEL: &str = "CONVEX ENCRYPTED PRIVATE KEY";

/// Archive format version. Bump when the binary layout changes, and keep
/// the old reader around. People have these files in cold storage.
pub const ARCHIVE_VERSION: u8 = 1;

/// Argon2 salt length in bytes (128 bits from the OS CSPRNG).
pub const ARCHIVE_SALT_LENGTH: usize = 16;

/// Width of the base64 body lines, same as PEM.
pub const ARCHIVE_LINE_WIDTH: usize = 64;

/// Argon2id memory cost in KiB. 64 MiB, per the OWASP recommendations.
pub const DEFAULT_ARGON2_M_COST: u32 = 65_536;

/// Argon2id iteration count.
pub const DEFAULT_ARGON2_T_COST: u32 = 3;

/// Argon2id lanes.
pub const DEFAULT_ARGON2_P_COST: u32 = 4;

// ---------------------------------------------------------------------------
// Mnemonic
// ---------------------------------------------------------------------------

/// A 32-byte private key maps to 256 bits of BIP-39 entropy plus an 8-bit
/// checksum: 24 words of 11 bits each.
pub const MNEMONIC_WORD_COUNT: usize = 24;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Marker character allowed in front of a ledger-assigned address (`#42`).
pub const ADDRESS_MARKER: char = '#';

/// Prefix of hex renderings (public keys, legacy key-derived addresses).
pub const HEX_PREFIX: &str = "0x";

// ---------------------------------------------------------------------------
// Runtime Configuration
// ---------------------------------------------------------------------------

/// Argon2id cost parameters used when *writing* an encrypted archive.
///
/// Reading always uses the parameters embedded in the archive header, so
/// lowering these never locks anybody out of an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub m_cost: u32,
    /// Number of passes over memory.
    pub t_cost: u32,
    /// Degree of parallelism.
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: DEFAULT_ARGON2_M_COST,
            t_cost: DEFAULT_ARGON2_T_COST,
            p_cost: DEFAULT_ARGON2_P_COST,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests and benches. Never use these for real keys.
    pub const fn insecure_fast() -> Self {
        Self {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        }
    }

    /// Checks the parameters against what Argon2 will accept.
    pub fn validate(&self) -> Result<(), IdentityError> {
        argon2::Params::new(self.m_cost, self.t_cost, self.p_cost, Some(AES_KEY_LENGTH))
            .map(|_| ())
            .map_err(|e| IdentityError::KeyDerivation(e.to_string()))
    }
}

/// Runtime configuration for the identity layer.
///
/// Defaults are what you want for mainnet: ledger-assigned addresses and
/// full-strength Argon2id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Which address model new accounts are bound under.
    pub address_scheme: AddressScheme,

    /// Password stretching cost for new archives.
    pub kdf: KdfParams,
}

impl IdentityConfig {
    /// Parses a JSON configuration document and validates it.
    ///
    /// Missing fields fall back to their defaults, so `{}` is a valid config.
    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| IdentityError::InvalidConfig(e.to_string()))?;
        config.kdf.validate()?;
        Ok(config)
    }
}
