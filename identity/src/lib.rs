// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Convex Identity
//!
//! The part of a Convex client that holds the keys. Everything that touches
//! a private key lives here, and nothing else has to.
//!
//! Ed25519 for signatures (deterministic, small, fast), Argon2id +
//! AES-256-GCM for the password-protected archive, and BIP-39 words for when
//! the key needs to survive on paper.
//!
//! ## Architecture
//!
//! - **crypto**: key pairs, signatures, hashing, password stretching,
//!   authenticated encryption. Don't roll your own.
//! - **codec**: getting a key out of memory and back in again. Encrypted
//!   text, mnemonic words, raw bytes.
//! - **identity**: addresses and accounts. Which key is which account, and
//!   the rules for changing that.
//! - **config**: constants and the runtime [`IdentityConfig`].
//! - **error**: one [`IdentityError`] for the whole crate.
//!
//! ## Quick tour
//!
//! ```
//! use convex_identity::{Account, KeyPair};
//!
//! let mut account = Account::create(KeyPair::generate(), None, None)?;
//! account.bind("#42")?;
//! assert_eq!(account.to_string(), "Account #42");
//!
//! let signature = account.sign(&[0u8; 32])?;
//! assert!(account.public_key().verify(&[0u8; 32], &signature));
//! # Ok::<(), convex_identity::IdentityError>(())
//! ```
//!
//! ## Ground rules
//!
//! 1. Secret bytes live in zeroizing containers and never reach a log line
//!    or a `Debug` impl.
//! 2. `import(export(k))` is `k`, for every codec. Tested, not hoped.
//! 3. Nothing mutates halfway. An operation either succeeds or leaves
//!    everything as it found it.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;

pub use config::{IdentityConfig, KdfParams};
pub use crypto::kdf::Password;
pub use error::{ErrorKind, IdentityError, Result};
pub use identity::{
    is_valid_address, normalize_address, Account, AccountState, Address, AddressInput,
    AddressScheme, KeyPair, PublicKey, Signature,
};
