//! # Identity Module
//!
//! Who is signing. A Convex participant is an Ed25519 key pair plus the
//! address the ledger knows it by.
//!
//! The stack is layered:
//!
//! 1. **Keypair**: raw Ed25519 key material. Signs hashes, proves ownership.
//! 2. **Address**: the account's name on the ledger. Normally an integer
//!    handle like `#42`; for legacy imports, the checksummed public key.
//! 3. **Account**: a key pair bound (or not yet bound) to an address.
//!
//! ## Design Decisions
//!
//! - Ed25519 via `ed25519-dalek` (RFC 8032). Signatures are deterministic,
//!   so the same key and hash always give the same 64 bytes.
//! - The two address models are two explicit strategies
//!   ([`AddressScheme`]), never guessed at from context. `FromStr` on
//!   [`Address`] is the one place that sniffs the format, and only because
//!   the two textual forms can't be confused.

pub mod account;
pub mod address;

pub use account::{Account, AccountState};
pub use address::{is_valid_address, normalize_address, Address, AddressInput, AddressScheme};
pub use crate::crypto::keys::{KeyPair, PublicKey, Signature};
