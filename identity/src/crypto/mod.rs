//! # Cryptographic Primitives
//!
//! Everything security-related in the identity layer flows through here.
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for signatures is what the Convex ledger verifies.
//! - **Argon2id** for password stretching: memory-hard, GPU-unfriendly.
//! - **AES-256-GCM** for encrypting keys at rest. AEAD done right.
//! - **SHA3-256** for public key checksums, same family the ledger hashes with.
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, please
//! reconsider. Then reconsider again.

pub mod encryption;
pub mod hash;
pub mod kdf;
pub mod keys;
pub mod signatures;

pub use hash::{sha3_256, to_checksum_hex};
pub use kdf::Password;
pub use keys::{KeyPair, PublicKey, Signature};
pub use signatures::{sign, verify, verify_hex};
