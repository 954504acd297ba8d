//! # Key Encodings
//!
//! Three ways to get a private key out of memory and back in again:
//!
//! ```text
//! archive.rs   password-encrypted armored text (and keyfile wrappers)
//! mnemonic.rs  24 BIP-39 words
//! raw.rs       the bare 32 bytes, or their hex
//! ```
//!
//! Each pair obeys the same law: `import(export(k))` is `k`. Same public
//! key, same private bytes, same signatures. A codec that breaks this
//! silently loses someone's account, so every one of them is tested for it.

pub mod archive;
pub mod mnemonic;
pub mod raw;

pub use archive::{
    export_encrypted_text, export_encrypted_text_with_params, export_to_file,
    export_to_file_with_params, import_encrypted_text, import_from_file,
};
pub use mnemonic::{export_mnemonic, export_mnemonic_phrase, import_mnemonic, import_mnemonic_phrase};
pub use raw::{export_raw_bytes, export_raw_hex, import_raw_bytes, import_raw_hex};
