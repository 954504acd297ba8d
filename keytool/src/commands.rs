//! Subcommand implementations.
//!
//! Each `run_*` returns a serializable report; `main` decides whether it is
//! printed as JSON or as text. Nothing in here prints secrets unless the
//! user asked for them (`new --words`, or the archive, which is encrypted).

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt;

use convex_identity::codec::{
    export_encrypted_text_with_params, export_mnemonic_phrase, export_to_file_with_params,
    import_encrypted_text, import_from_file, import_mnemonic_phrase,
};
use convex_identity::{Account, AddressInput, AddressScheme, KdfParams, KeyPair, Password};

use crate::cli::{CheckAddressArgs, KeyArgs, NewArgs, ShowArgs, SignArgs};

// ---------------------------------------------------------------------------
// Key loading
// ---------------------------------------------------------------------------

/// Load a key from the flags in `args`.
///
/// Precedence: `--keyfile` + `--password`, then `--keytext` + `--password`,
/// then `--keywords`. Returns `Ok(None)` when no key source was given at all.
pub fn load_keypair(args: &KeyArgs) -> Result<Option<KeyPair>> {
    if let Some(path) = &args.keyfile {
        let password = require_password(args)?;
        let keypair = import_from_file(path, &password)
            .with_context(|| format!("failed to load key from {}", path.display()))?;
        return Ok(Some(keypair));
    }

    if let Some(text) = &args.keytext {
        let password = require_password(args)?;
        let keypair = import_encrypted_text(text, &password).context("failed to load key text")?;
        return Ok(Some(keypair));
    }

    if let Some(words) = &args.keywords {
        let keypair = import_mnemonic_phrase(words).context("failed to load key words")?;
        return Ok(Some(keypair));
    }

    Ok(None)
}

/// Load a key and wrap it in an account, bound to `--address` if given.
pub fn load_account(args: &KeyArgs) -> Result<Option<Account>> {
    let Some(keypair) = load_keypair(args)? else {
        return Ok(None);
    };
    let address = args.address.as_deref().map(AddressInput::from);
    let account = Account::create(keypair, address, args.name.clone())
        .context("failed to build account")?;
    tracing::debug!(account = %account, "loaded account");
    Ok(Some(account))
}

fn require_password(args: &KeyArgs) -> Result<Password> {
    match &args.password {
        Some(p) => Ok(Password::from(p.as_str())),
        None => bail!("a password is required to decrypt the key (--password or CONVEX_PASSWORD)"),
    }
}

fn require_account(args: &KeyArgs) -> Result<Account> {
    load_account(args)?.context("no key given: use --keyfile, --keytext or --keywords")
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What `new` prints.
#[derive(Debug, Serialize)]
pub struct NewReport {
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<String>,
}

/// What `show` prints.
#[derive(Debug, Serialize)]
pub struct ShowReport {
    pub public_key: String,
    pub public_key_api: String,
    pub public_key_checksum: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// What `sign` prints.
#[derive(Debug, Serialize)]
pub struct SignReport {
    pub public_key: String,
    pub hash: String,
    pub signature: String,
}

/// What `check-address` prints.
#[derive(Debug, Serialize)]
pub struct CheckAddressReport {
    pub input: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for NewReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "public key : {}", self.public_key)?;
        if let Some(words) = &self.words {
            writeln!(f, "words      : {words}")?;
        }
        if let Some(archive) = &self.archive {
            write!(f, "{archive}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ShowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "public key : {}", self.public_key)?;
        writeln!(f, "api key    : {}", self.public_key_api)?;
        writeln!(f, "checksum   : {}", self.public_key_checksum)?;
        if let Some(address) = &self.address {
            writeln!(f, "address    : {address}")?;
        }
        if let Some(name) = &self.name {
            writeln!(f, "name       : {name}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.signature)
    }
}

impl fmt::Display for CheckAddressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.address, &self.error) {
            (Some(address), _) => writeln!(f, "{:?} is valid: {address}", self.input),
            (None, Some(error)) => writeln!(f, "{:?} is not valid: {error}", self.input),
            (None, None) => writeln!(f, "{:?} is not valid", self.input),
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

pub fn run_new(args: &NewArgs) -> Result<NewReport> {
    run_new_with_params(args, &KdfParams::default())
}

/// `new` with explicit Argon2 costs, so tests don't pay for the real ones.
pub fn run_new_with_params(args: &NewArgs, params: &KdfParams) -> Result<NewReport> {
    let keypair = KeyPair::try_generate().context("failed to generate key")?;

    let archive = match &args.password {
        Some(password) => {
            let password = Password::from(password.as_str());
            let text = match &args.output {
                Some(path) => {
                    export_to_file_with_params(&keypair, path, &password, params)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "wrote keyfile");
                    // Print exactly what landed on disk.
                    std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read back {}", path.display()))?
                }
                None => export_encrypted_text_with_params(&keypair, &password, params)
                    .context("failed to encrypt key")?,
            };
            Some(text)
        }
        None => None,
    };

    let words = if args.words {
        Some(export_mnemonic_phrase(&keypair).context("failed to export words")?)
    } else {
        None
    };

    if archive.is_none() && words.is_none() {
        tracing::warn!("neither --password nor --words given; the new key is not saved anywhere");
    }

    Ok(NewReport {
        public_key: keypair.public_key_hex(),
        archive,
        words,
    })
}

pub fn run_show(args: &ShowArgs) -> Result<ShowReport> {
    let account = require_account(&args.key)?;
    Ok(ShowReport {
        public_key: account.public_key_hex(),
        public_key_api: account.public_key_api(),
        public_key_checksum: account.public_key_checksum(),
        address: account.address().map(|a| a.to_string()),
        name: account.name().map(str::to_string),
    })
}

pub fn run_sign(args: &SignArgs) -> Result<SignReport> {
    let account = require_account(&args.key)?;
    let signature = account.sign_hex(&args.hash).context("failed to sign hash")?;
    Ok(SignReport {
        public_key: account.public_key_hex(),
        hash: args.hash.clone(),
        signature,
    })
}

pub fn run_check_address(args: &CheckAddressArgs) -> CheckAddressReport {
    let trimmed = args.address.trim();
    let scheme = if args.legacy && (trimmed.starts_with("0x") || trimmed.starts_with("0X")) {
        AddressScheme::KeyDerived
    } else {
        AddressScheme::LedgerAssigned
    };

    match scheme.normalize(args.address.as_str()) {
        Ok(address) => CheckAddressReport {
            input: args.address.clone(),
            valid: true,
            address: Some(address.to_string()),
            error: None,
        },
        Err(err) => CheckAddressReport {
            input: args.address.clone(),
            valid: false,
            address: None,
            error: Some(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_new(password: Option<&str>, words: bool) -> NewReport {
        let args = NewArgs {
            password: password.map(str::to_string),
            output: None,
            words,
        };
        run_new_with_params(&args, &KdfParams::insecure_fast()).unwrap()
    }

    #[test]
    fn new_then_show_from_keytext() {
        let report = fast_new(Some("p@ss"), false);
        let key = KeyArgs {
            keytext: report.archive.clone(),
            password: Some("p@ss".into()),
            address: Some("#42".into()),
            ..KeyArgs::default()
        };
        let shown = run_show(&ShowArgs { key }).unwrap();
        assert_eq!(shown.public_key, report.public_key);
        assert_eq!(shown.address.as_deref(), Some("#42"));
    }

    #[test]
    fn new_then_show_from_keyfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.pem");
        let args = NewArgs {
            password: Some("pw".into()),
            output: Some(path.clone()),
            words: false,
        };
        let report = run_new_with_params(&args, &KdfParams::insecure_fast()).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(report.archive.as_deref(), Some(on_disk.as_str()));
        let from_file = import_from_file(&path, &Password::from("pw")).unwrap();
        assert_eq!(from_file.public_key_hex(), report.public_key);

        let key = KeyArgs {
            keyfile: Some(path),
            password: Some("pw".into()),
            ..KeyArgs::default()
        };
        let shown = run_show(&ShowArgs { key }).unwrap();
        assert_eq!(shown.public_key, report.public_key);
        assert_eq!(shown.address, None);
    }

    #[test]
    fn words_load_the_same_key() {
        let report = fast_new(None, true);
        let key = KeyArgs {
            keywords: report.words.clone(),
            ..KeyArgs::default()
        };
        let account = load_account(&key).unwrap().unwrap();
        assert_eq!(account.public_key_hex(), report.public_key);
    }

    #[test]
    fn keytext_without_password_is_an_error() {
        let report = fast_new(Some("pw"), false);
        let key = KeyArgs {
            keytext: report.archive,
            ..KeyArgs::default()
        };
        assert!(load_account(&key).is_err());
    }

    #[test]
    fn no_key_source_is_none() {
        assert!(load_account(&KeyArgs::default()).unwrap().is_none());
        let err = run_show(&ShowArgs {
            key: KeyArgs::default(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("no key given"));
    }

    #[test]
    fn bad_address_is_an_error() {
        let report = fast_new(None, true);
        let key = KeyArgs {
            keywords: report.words,
            address: Some("-1".into()),
            ..KeyArgs::default()
        };
        assert!(load_account(&key).is_err());
    }

    #[test]
    fn sign_matches_library() {
        let report = fast_new(None, true);
        let words = report.words.clone().unwrap();
        let key = KeyArgs {
            keywords: Some(words.clone()),
            ..KeyArgs::default()
        };
        let signed = run_sign(&SignArgs {
            key,
            hash: "00".repeat(32),
        })
        .unwrap();

        let kp = import_mnemonic_phrase(&words).unwrap();
        assert_eq!(signed.signature, kp.sign_hex(&"00".repeat(32)).unwrap());
    }

    #[test]
    fn check_address_reports() {
        let ok = run_check_address(&CheckAddressArgs {
            address: " #42 ".into(),
            legacy: false,
        });
        assert!(ok.valid);
        assert_eq!(ok.address.as_deref(), Some("#42"));

        let bad = run_check_address(&CheckAddressArgs {
            address: "abc".into(),
            legacy: false,
        });
        assert!(!bad.valid);
        assert!(bad.error.is_some());

        let kp = KeyPair::generate();
        let legacy = run_check_address(&CheckAddressArgs {
            address: kp.public_key_checksum(),
            legacy: true,
        });
        assert!(legacy.valid);
        assert_eq!(legacy.address, Some(kp.public_key_checksum()));
    }

    #[test]
    fn reports_serialize() {
        let report = fast_new(None, false);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("public_key").is_some());
        assert!(json.get("archive").is_none());
    }
}
