//! # Account Addresses
//!
//! Convex has used two address models over its lifetime, and keys exported
//! under either one are still out there:
//!
//! ```text
//! LedgerAssigned (default)   #42                the ledger hands out a
//!                                               number when the account is
//!                                               created
//! KeyDerived     (legacy)    0x5288Fec4...      the address *is* the
//!                                               public key, checksummed
//! ```
//!
//! The two are not reconcilable. A ledger-assigned number says nothing about
//! the key behind it, so there is nothing to "derive". We keep them as two
//! named strategies behind one interface, [`AddressScheme`], and make the
//! caller pick. New accounts use `LedgerAssigned`; `KeyDerived` exists so old
//! material can still be imported and bound.
//!
//! ## Normalization
//!
//! Addresses arrive as integers from API responses, as strings from command
//! lines, and as other accounts. [`AddressInput`] is the closed set of those
//! shapes, and [`AddressScheme::normalize`] is the only way to turn one into
//! an [`Address`]. The ledger-assigned rules:
//!
//! - non-negative integers are taken as-is;
//! - strings are trimmed, may start with a single `#`, and must then be
//!   plain ASCII digits that fit in a `u64`;
//! - an account contributes its own address, if it has one.
//!
//! Everything else is [`IdentityError::InvalidAddress`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::config::{ADDRESS_MARKER, HEX_PREFIX, PUBLIC_KEY_LENGTH};
use crate::crypto::hash::is_checksum_valid;
use crate::crypto::keys::PublicKey;
use crate::error::{IdentityError, Result};
use crate::identity::account::Account;

// ---------------------------------------------------------------------------
// AddressScheme
// ---------------------------------------------------------------------------

/// Which address model to normalize and bind under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressScheme {
    /// Integer handles assigned by the ledger at account creation.
    #[default]
    LedgerAssigned,
    /// Legacy: the checksummed public key is the address. Import only.
    KeyDerived,
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A validated account address.
///
/// Every `u64` is a valid handle, and a key address wraps a [`PublicKey`],
/// which can only be built from a point on the curve. So holding an
/// `Address` means the value already passed validation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// A ledger-assigned account number.
    Handle(u64),
    /// A legacy key-derived address: the public key itself.
    PublicKey(PublicKey),
}

impl Address {
    /// The integer handle, if this is a ledger-assigned address.
    pub fn handle(&self) -> Option<u64> {
        match self {
            Address::Handle(n) => Some(*n),
            Address::PublicKey(_) => None,
        }
    }

    /// The scheme this address belongs to.
    pub fn scheme(&self) -> AddressScheme {
        match self {
            Address::Handle(_) => AddressScheme::LedgerAssigned,
            Address::PublicKey(_) => AddressScheme::KeyDerived,
        }
    }
}

impl From<u64> for Address {
    fn from(n: u64) -> Self {
        Address::Handle(n)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Handle(n) => write!(f, "{ADDRESS_MARKER}{n}"),
            Address::PublicKey(key) => write!(f, "{}", key.to_checksum()),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = IdentityError;

    /// Auto-detects the scheme: `0x...` is a key-derived address, anything
    /// else is read as a ledger handle.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.starts_with(HEX_PREFIX) || trimmed.starts_with("0X") {
            AddressScheme::KeyDerived.normalize(trimmed)
        } else {
            AddressScheme::LedgerAssigned.normalize(trimmed)
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AddressInput
// ---------------------------------------------------------------------------

/// Everything a caller might hand us as "an address".
///
/// Usually built with `.into()` from an integer, a string, an [`Address`],
/// or a `&Account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput {
    /// Any integer. Signed and wide, so negative input can be rejected
    /// rather than wrapped.
    Integer(i128),
    /// Free text, as typed or as received.
    Text(String),
    /// An address that was already validated.
    Address(Address),
    /// An account that hasn't been bound yet. Always rejected.
    UnboundAccount,
}

macro_rules! integer_input {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AddressInput {
                fn from(n: $t) -> Self {
                    AddressInput::Integer(n as i128)
                }
            }
        )*
    };
}

integer_input!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<&str> for AddressInput {
    fn from(s: &str) -> Self {
        AddressInput::Text(s.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(s: String) -> Self {
        AddressInput::Text(s)
    }
}

impl From<&String> for AddressInput {
    fn from(s: &String) -> Self {
        AddressInput::Text(s.clone())
    }
}

impl From<Address> for AddressInput {
    fn from(address: Address) -> Self {
        AddressInput::Address(address)
    }
}

impl From<&Account> for AddressInput {
    fn from(account: &Account) -> Self {
        match account.address() {
            Some(address) => AddressInput::Address(address),
            None => AddressInput::UnboundAccount,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

impl AddressScheme {
    /// Validate `input` under this scheme and return the canonical address.
    pub fn normalize(&self, input: impl Into<AddressInput>) -> Result<Address> {
        let input = input.into();
        match (self, input) {
            (_, AddressInput::UnboundAccount) => Err(IdentityError::InvalidAddress(
                "account has no address yet".into(),
            )),
            (scheme, AddressInput::Address(address)) => {
                if address.scheme() == *scheme {
                    Ok(address)
                } else {
                    Err(IdentityError::InvalidAddress(format!(
                        "{address} is not a {scheme:?} address"
                    )))
                }
            }
            (AddressScheme::LedgerAssigned, AddressInput::Integer(n)) => u64::try_from(n)
                .map(Address::Handle)
                .map_err(|_| IdentityError::InvalidAddress(format!("{n} is out of range"))),
            (AddressScheme::LedgerAssigned, AddressInput::Text(text)) => parse_handle(&text),
            (AddressScheme::KeyDerived, AddressInput::Integer(n)) => Err(
                IdentityError::InvalidAddress(format!("{n} is not a key-derived address")),
            ),
            (AddressScheme::KeyDerived, AddressInput::Text(text)) => parse_key_address(&text),
        }
    }

    /// Derive an address from a public key, if this scheme can.
    ///
    /// `LedgerAssigned` returns `None`: only the ledger knows the number.
    pub fn derive(&self, public_key: &PublicKey) -> Option<Address> {
        match self {
            AddressScheme::LedgerAssigned => None,
            AddressScheme::KeyDerived => Some(Address::PublicKey(*public_key)),
        }
    }
}

/// `#42`, `42`, ` 42 ` → `Handle(42)`.
fn parse_handle(text: &str) -> Result<Address> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(ADDRESS_MARKER).unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdentityError::InvalidAddress(format!(
            "{text:?} is not a ledger address"
        )));
    }

    digits
        .parse::<u64>()
        .map(Address::Handle)
        .map_err(|_| IdentityError::InvalidAddress(format!("{text:?} is out of range")))
}

/// `0x` + 64 hex digits, checksum-correct if mixed case, and a valid curve
/// point.
fn parse_key_address(text: &str) -> Result<Address> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(HEX_PREFIX)
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| {
            IdentityError::InvalidAddress(format!("{text:?} is missing the 0x prefix"))
        })?;

    if digits.len() != PUBLIC_KEY_LENGTH * 2 {
        return Err(IdentityError::InvalidAddress(format!(
            "{text:?} is not {PUBLIC_KEY_LENGTH} bytes of hex"
        )));
    }
    if !is_checksum_valid(digits) {
        return Err(IdentityError::InvalidAddress(format!(
            "{text:?} has a bad checksum"
        )));
    }

    let public_key = PublicKey::from_hex(digits)
        .map_err(|_| IdentityError::InvalidAddress(format!("{text:?} is not a public key")))?;
    Ok(Address::PublicKey(public_key))
}

/// Normalize under the default (ledger-assigned) scheme and return the
/// integer handle.
///
/// ```
/// use convex_identity::identity::address::normalize_address;
///
/// assert_eq!(normalize_address("#42").unwrap(), 42);
/// assert!(normalize_address("-1").is_err());
/// ```
pub fn normalize_address(input: impl Into<AddressInput>) -> Result<u64> {
    let address = AddressScheme::LedgerAssigned.normalize(input)?;
    address
        .handle()
        .ok_or_else(|| IdentityError::InvalidAddress(format!("{address} has no handle")))
}

/// `true` if [`normalize_address`] would accept `input`.
pub fn is_valid_address(input: impl Into<AddressInput>) -> bool {
    normalize_address(input).is_ok()
}
