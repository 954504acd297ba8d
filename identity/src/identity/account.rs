//! # Accounts
//!
//! An [`Account`] is a key pair plus the ledger's idea of who that key is:
//! an address, once the ledger has assigned one, and an optional
//! human-friendly name.
//!
//! ```text
//!            create(key, None)             bind(addr)
//!   key ───────────────────────▶ Unbound ─────────────▶ Bound
//!                                                         │  ▲
//!                                                         └──┘
//!                                                      rebind(addr)
//! ```
//!
//! The usual dance with a ledger-assigned address: generate a key, register
//! the public key with the network, get a number back, `bind` it. Binding
//! twice is refused, because silently pointing a key at a different account
//! is how funds end up in the wrong place. `rebind` is the explicit "yes, I
//! mean it" path.
//!
//! Every mutation validates first. A failed `bind` or `rebind` leaves the
//! account exactly as it was.

use std::fmt;
use std::path::Path;

use crate::codec::{archive, mnemonic, raw};
use crate::config::{IdentityConfig, KdfParams, HASH_LENGTH, PRIVATE_KEY_LENGTH};
use crate::crypto::kdf::Password;
use crate::crypto::keys::{KeyPair, PublicKey, Signature};
use crate::error::{IdentityError, Result};
use crate::identity::address::{Address, AddressInput, AddressScheme};
use zeroize::Zeroizing;

/// Whether an account has an address yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountState {
    Unbound,
    Bound,
}

/// A signing identity on the Convex network.
///
/// Owns its key pair exclusively. Cloning an account clones the key, so two
/// clones sign identically but can be bound independently.
#[derive(Clone)]
pub struct Account {
    keypair: KeyPair,
    address: Option<Address>,
    name: Option<String>,
    scheme: AddressScheme,
    kdf: KdfParams,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Account {
    /// Create an account under the default (ledger-assigned) address scheme.
    ///
    /// With `address: None` the account starts out unbound. A supplied
    /// address that doesn't normalize is rejected with
    /// [`IdentityError::InvalidAddress`]; no account is built.
    pub fn create(
        keypair: KeyPair,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::with_scheme(AddressScheme::default(), keypair, address, name)
    }

    /// Create an account under an explicit address scheme.
    ///
    /// Under [`AddressScheme::KeyDerived`] an account with no address
    /// supplied gets one derived from its public key, so it is born bound.
    pub fn with_scheme(
        scheme: AddressScheme,
        keypair: KeyPair,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        let address = match address {
            Some(input) => Some(scheme.normalize(input)?),
            None => scheme.derive(&keypair.public_key()),
        };
        let account = Self {
            keypair,
            address,
            name,
            scheme,
            kdf: KdfParams::default(),
        };
        tracing::debug!(account = %account, ?scheme, "created account");
        Ok(account)
    }

    /// Create an account using the scheme and KDF costs from `config`.
    pub fn from_config(
        config: &IdentityConfig,
        keypair: KeyPair,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        config.kdf.validate()?;
        let mut account = Self::with_scheme(config.address_scheme, keypair, address, name)?;
        account.kdf = config.kdf;
        Ok(account)
    }

    /// A new account with the same key as `other` but its own address and
    /// name. The key is copied; the two accounts are independent afterwards.
    pub fn import_from_account(
        other: &Account,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        let mut account = Self::with_scheme(other.scheme, other.keypair.clone(), address, name)?;
        account.kdf = other.kdf;
        Ok(account)
    }

    /// Import from encrypted archive text.
    pub fn import_from_text(
        text: &str,
        password: &Password,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::import_from_text_with_scheme(AddressScheme::default(), text, password, address, name)
    }

    /// Import from a keyfile holding encrypted archive text.
    pub fn import_from_file(
        path: impl AsRef<Path>,
        password: &Password,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::import_from_file_with_scheme(AddressScheme::default(), path, password, address, name)
    }

    /// Import from a 24-word mnemonic phrase.
    pub fn import_from_mnemonic(
        phrase: &str,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::import_from_mnemonic_with_scheme(AddressScheme::default(), phrase, address, name)
    }

    /// Import from the raw 32-byte private key.
    pub fn import_from_bytes(
        bytes: &[u8],
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::import_from_bytes_with_scheme(AddressScheme::default(), bytes, address, name)
    }

    /// Import from the private key as hex, `0x` optional.
    pub fn import_from_hex(
        text: &str,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::import_from_hex_with_scheme(AddressScheme::default(), text, address, name)
    }

    // Explicit-scheme imports. Legacy key-derived material comes in through
    // these with `AddressScheme::KeyDerived`.

    pub fn import_from_text_with_scheme(
        scheme: AddressScheme,
        text: &str,
        password: &Password,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        let keypair = archive::import_encrypted_text(text, password)?;
        Self::with_scheme(scheme, keypair, address, name)
    }

    pub fn import_from_file_with_scheme(
        scheme: AddressScheme,
        path: impl AsRef<Path>,
        password: &Password,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        let keypair = archive::import_from_file(path, password)?;
        Self::with_scheme(scheme, keypair, address, name)
    }

    pub fn import_from_mnemonic_with_scheme(
        scheme: AddressScheme,
        phrase: &str,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        let keypair = mnemonic::import_mnemonic_phrase(phrase)?;
        Self::with_scheme(scheme, keypair, address, name)
    }

    pub fn import_from_bytes_with_scheme(
        scheme: AddressScheme,
        bytes: &[u8],
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::with_scheme(scheme, raw::import_raw_bytes(bytes)?, address, name)
    }

    pub fn import_from_hex_with_scheme(
        scheme: AddressScheme,
        text: &str,
        address: Option<AddressInput>,
        name: Option<String>,
    ) -> Result<Self> {
        Self::with_scheme(scheme, raw::import_raw_hex(text)?, address, name)
    }
}

// ---------------------------------------------------------------------------
// Address binding
// ---------------------------------------------------------------------------

impl Account {
    /// Attach an address to an unbound account.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::InvalidAddress`] if `address` doesn't normalize
    ///   under this account's scheme.
    /// - [`IdentityError::AlreadyBound`] if the account already has an
    ///   address. Use [`rebind`](Self::rebind) to replace it.
    pub fn bind(&mut self, address: impl Into<AddressInput>) -> Result<()> {
        let address = self.scheme.normalize(address)?;
        if let Some(current) = self.address {
            tracing::warn!(%current, requested = %address, "refusing to bind a bound account");
            return Err(IdentityError::AlreadyBound { current });
        }
        self.address = Some(address);
        tracing::info!(%address, public_key = %self.keypair.public_key().to_hex(), "account bound");
        Ok(())
    }

    /// Replace the account's address, bound or not. Returns the previous
    /// address, if there was one.
    pub fn rebind(&mut self, address: impl Into<AddressInput>) -> Result<Option<Address>> {
        let address = self.scheme.normalize(address)?;
        let previous = self.address.replace(address);
        match previous {
            Some(previous) => tracing::info!(%previous, %address, "account rebound"),
            None => tracing::info!(%address, "account bound"),
        }
        Ok(previous)
    }

    /// The bound address, if any.
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn state(&self) -> AccountState {
        match self.address {
            Some(_) => AccountState::Bound,
            None => AccountState::Unbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.state() == AccountState::Bound
    }

    pub fn scheme(&self) -> AddressScheme {
        self.scheme
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Names are labels for humans. Nothing validates them.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

// ---------------------------------------------------------------------------
// Keys and signing
// ---------------------------------------------------------------------------

impl Account {
    /// Sign a 32-byte transaction hash.
    pub fn sign(&self, hash: &[u8; HASH_LENGTH]) -> Result<Signature> {
        self.keypair.sign(hash)
    }

    /// Sign a hex hash, returning `0x`-prefixed hex.
    pub fn sign_hex(&self, hash_hex: &str) -> Result<String> {
        self.keypair.sign_hex(hash_hex)
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.keypair.public_key_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    pub fn public_key_api(&self) -> String {
        self.keypair.public_key_api()
    }

    pub fn public_key_checksum(&self) -> String {
        self.keypair.public_key_checksum()
    }

    /// Encrypted archive text, using this account's KDF costs.
    pub fn export_to_text(&self, password: &Password) -> Result<String> {
        archive::export_encrypted_text_with_params(&self.keypair, password, &self.kdf)
    }

    /// Write the encrypted archive text to `path`.
    pub fn export_to_file(&self, path: impl AsRef<Path>, password: &Password) -> Result<()> {
        archive::export_to_file_with_params(&self.keypair, path, password, &self.kdf)
    }

    pub fn export_to_mnemonic(&self) -> Result<String> {
        mnemonic::export_mnemonic_phrase(&self.keypair)
    }

    pub fn export_to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        raw::export_raw_bytes(&self.keypair)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "Account {address}"),
            None => write!(f, "Account (unbound)"),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("name", &self.name)
            .field("scheme", &self.scheme)
            .field("public_key", &self.keypair.public_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn unbound() -> Account {
        Account::create(KeyPair::generate(), None, None).unwrap()
    }

    #[test]
    fn test_create_unbound() {
        let account = unbound();
        assert_eq!(account.state(), AccountState::Unbound);
        assert_eq!(account.address(), None);
        assert_eq!(account.to_string(), "Account (unbound)");
    }

    #[test]
    fn test_create_bound() {
        let account = Account::create(KeyPair::generate(), Some("#42".into()), Some("alice".into()))
            .unwrap();
        assert_eq!(account.state(), AccountState::Bound);
        assert_eq!(account.address(), Some(Address::Handle(42)));
        assert_eq!(account.name(), Some("alice"));
        assert_eq!(account.to_string(), "Account #42");
    }

    #[test]
    fn test_create_with_bad_address_fails() {
        let err = Account::create(KeyPair::generate(), Some("abc".into()), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAddress);
        let err = Account::create(KeyPair::generate(), Some((-1i64).into()), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAddress);
    }

    #[test]
    fn test_bind_then_bind_again() {
        let mut account = unbound();
        account.bind(42u64).unwrap();
        assert_eq!(account.address(), Some(Address::Handle(42)));

        let err = account.bind(43u64).unwrap_err();
        match err {
            IdentityError::AlreadyBound { current } => assert_eq!(current, Address::Handle(42)),
            other => panic!("expected AlreadyBound, got {other:?}"),
        }
        assert_eq!(account.address(), Some(Address::Handle(42)));
    }

    #[test]
    fn test_invalid_bind_leaves_unbound() {
        let mut account = unbound();
        let err = account.bind("nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAddress);
        assert_eq!(account.state(), AccountState::Unbound);
    }

    #[test]
    fn test_rebind() {
        let mut account = unbound();
        assert_eq!(account.rebind("#1").unwrap(), None);
        assert_eq!(account.rebind(" 2 ").unwrap(), Some(Address::Handle(1)));
        assert_eq!(account.address(), Some(Address::Handle(2)));
    }

    #[test]
    fn test_failed_rebind_leaves_address_unchanged() {
        let mut account = Account::create(KeyPair::generate(), Some(5u64.into()), None).unwrap();
        for bad in ["", "-5", "#", "five"] {
            assert!(account.rebind(bad).is_err());
            assert_eq!(account.address(), Some(Address::Handle(5)));
        }
    }

    #[test]
    fn test_sign_delegates_to_keypair() {
        let account = unbound();
        let hash = [0u8; 32];
        let a = account.sign(&hash).unwrap();
        let b = account.keypair().sign(&hash).unwrap();
        assert_eq!(a, b);
        assert!(account.public_key().verify(&hash, &a));
        assert_eq!(account.sign_hex(&hex::encode(hash)).unwrap(), a.to_string());
    }

    #[test]
    fn test_import_from_account_copies_key() {
        let original = Account::create(KeyPair::generate(), Some(10u64.into()), Some("a".into()))
            .unwrap();
        let copy =
            Account::import_from_account(&original, Some(11u64.into()), Some("b".into())).unwrap();
        assert_eq!(copy.public_key(), original.public_key());
        assert_eq!(copy.address(), Some(Address::Handle(11)));
        assert_eq!(copy.name(), Some("b"));
        assert_eq!(original.address(), Some(Address::Handle(10)));
        assert_eq!(original.name(), Some("a"));
    }

    #[test]
    fn test_account_as_address_input() {
        let bound = Account::create(KeyPair::generate(), Some(77u64.into()), None).unwrap();
        let mut other = unbound();
        other.bind(&bound).unwrap();
        assert_eq!(other.address(), Some(Address::Handle(77)));

        let empty = unbound();
        let mut target = unbound();
        assert!(target.bind(&empty).is_err());
        assert!(!target.is_bound());
    }

    #[test]
    fn test_key_derived_scheme_binds_itself() {
        let kp = KeyPair::generate();
        let checksum = kp.public_key_checksum();
        let account = Account::with_scheme(AddressScheme::KeyDerived, kp, None, None).unwrap();
        assert!(account.is_bound());
        assert_eq!(account.to_string(), format!("Account {checksum}"));
    }

    #[test]
    fn test_key_derived_scheme_rejects_handles() {
        let mut account =
            Account::with_scheme(AddressScheme::KeyDerived, KeyPair::generate(), None, None)
                .unwrap();
        let before = account.address();
        assert!(account.rebind(42u64).is_err());
        assert_eq!(account.address(), before);
    }

    #[test]
    fn test_from_config() {
        let config = IdentityConfig {
            address_scheme: AddressScheme::KeyDerived,
            kdf: KdfParams::insecure_fast(),
        };
        let account = Account::from_config(&config, KeyPair::generate(), None, None).unwrap();
        assert_eq!(account.scheme(), AddressScheme::KeyDerived);
        assert!(account.is_bound());
    }

    #[test]
    fn test_export_import_text_with_config_costs() {
        let config = IdentityConfig {
            kdf: KdfParams::insecure_fast(),
            ..IdentityConfig::default()
        };
        let account =
            Account::from_config(&config, KeyPair::generate(), Some(3u64.into()), None).unwrap();
        let password = Password::from("p@ss");
        let text = account.export_to_text(&password).unwrap();
        let restored = Account::import_from_text(&text, &password, Some(3u64.into()), None).unwrap();
        assert_eq!(restored.public_key(), account.public_key());
        assert_eq!(restored.address(), account.address());
    }

    #[test]
    fn test_import_from_mnemonic_and_bytes() {
        let account = unbound();
        let phrase = account.export_to_mnemonic().unwrap();
        let from_words = Account::import_from_mnemonic(&phrase, None, None).unwrap();
        assert_eq!(from_words.public_key(), account.public_key());

        let bytes = account.export_to_bytes();
        let from_bytes = Account::import_from_bytes(&bytes[..], None, None).unwrap();
        assert_eq!(from_bytes.public_key(), account.public_key());

        let from_hex =
            Account::import_from_hex(&hex::encode(&bytes[..]), None, None).unwrap();
        assert_eq!(from_hex.public_key(), account.public_key());
    }

    #[test]
    fn test_legacy_imports_bind_to_the_key() {
        let kp = KeyPair::generate();
        let checksum = kp.public_key_checksum();
        let password = Password::from("legacy");
        let text =
            archive::export_encrypted_text_with_params(&kp, &password, &KdfParams::insecure_fast())
                .unwrap();
        let phrase = mnemonic::export_mnemonic_phrase(&kp).unwrap();
        let bytes = raw::export_raw_bytes(&kp);
        let hex_text = raw::export_raw_hex(&kp);

        let imported = [
            Account::import_from_text_with_scheme(
                AddressScheme::KeyDerived,
                &text,
                &password,
                None,
                None,
            )
            .unwrap(),
            Account::import_from_mnemonic_with_scheme(AddressScheme::KeyDerived, &phrase, None, None)
                .unwrap(),
            Account::import_from_bytes_with_scheme(AddressScheme::KeyDerived, &bytes[..], None, None)
                .unwrap(),
            Account::import_from_hex_with_scheme(AddressScheme::KeyDerived, &hex_text, None, None)
                .unwrap(),
        ];
        for account in &imported {
            assert_eq!(account.scheme(), AddressScheme::KeyDerived);
            assert_eq!(account.address().map(|a| a.to_string()), Some(checksum.clone()));
        }

        // The default imports stay on ledger handles and start unbound.
        let plain = Account::import_from_mnemonic(&phrase, None, None).unwrap();
        assert_eq!(plain.scheme(), AddressScheme::LedgerAssigned);
        assert!(!plain.is_bound());
    }

    #[test]
    fn test_legacy_file_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.pem");
        let kp = KeyPair::generate();
        let password = Password::from("legacy");
        archive::export_to_file_with_params(&kp, &path, &password, &KdfParams::insecure_fast())
            .unwrap();

        let account = Account::import_from_file_with_scheme(
            AddressScheme::KeyDerived,
            &path,
            &password,
            Some(kp.public_key_checksum().into()),
            Some("old".into()),
        )
        .unwrap();
        assert_eq!(account.public_key(), kp.public_key());
        assert_eq!(account.scheme(), AddressScheme::KeyDerived);
        assert_eq!(account.name(), Some("old"));
    }

    #[test]
    fn test_set_name() {
        let mut account = unbound();
        account.set_name(Some("savings".into()));
        assert_eq!(account.name(), Some("savings"));
        account.set_name(None);
        assert_eq!(account.name(), None);
    }

    #[test]
    fn test_debug_hides_secret() {
        let kp = KeyPair::generate();
        let secret = hex::encode(&kp.private_key_bytes()[..]);
        let account = Account::create(kp, Some(1u64.into()), None).unwrap();
        let debug = format!("{account:?}");
        assert!(!debug.contains(&secret));
        assert!(debug.contains("#1"));
    }

    #[test]
    fn test_account_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Account>();
    }
}
