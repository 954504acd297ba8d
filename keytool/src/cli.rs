//! # CLI Interface
//!
//! Defines the command-line argument structure for `convex-keytool` using
//! `clap` derive. Five subcommands: `new`, `show`, `sign`, `check-address`
//! and `version`.
//!
//! Key material comes in through [`KeyArgs`]. Every flag can also be set
//! from a `CONVEX_*` environment variable, which keeps passwords out of
//! shell history.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Convex account key tool.
///
/// Generates, inspects and uses Convex account keys. Talks to no network:
/// everything here happens on the local machine.
#[derive(Parser, Debug)]
#[command(
    name = "convex-keytool",
    about = "Convex account key tool",
    version,
    propagate_version = true
)]
pub struct KeytoolCli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true, env = "CONVEX_JSON")]
    pub json: bool,

    /// Log output format on stderr.
    #[arg(long, global = true, value_enum, env = "CONVEX_LOG_FORMAT", default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new key and print it as an encrypted archive and/or
    /// mnemonic words.
    New(NewArgs),
    /// Load a key and print its public forms.
    Show(ShowArgs),
    /// Sign a 32-byte hex hash with a loaded key.
    Sign(SignArgs),
    /// Check whether a value is a valid account address.
    CheckAddress(CheckAddressArgs),
    /// Print version information and exit.
    Version,
}

/// How to find the private key. Mirrors the usual convex tool flags.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Path to a file holding an encrypted key archive.
    #[arg(long, short = 'k', env = "CONVEX_KEYFILE")]
    pub keyfile: Option<PathBuf>,

    /// Encrypted key archive text, passed inline.
    #[arg(long, env = "CONVEX_KEYTEXT", conflicts_with = "keyfile")]
    pub keytext: Option<String>,

    /// Password for the encrypted archive.
    #[arg(long, short = 'p', env = "CONVEX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// 24 mnemonic words, space separated.
    #[arg(long, short = 'w', env = "CONVEX_KEYWORDS", hide_env_values = true)]
    pub keywords: Option<String>,

    /// Address to bind the loaded key to (`#42` or `42`).
    #[arg(long, short = 'a', env = "CONVEX_ADDRESS")]
    pub address: Option<String>,

    /// Account name, for display only.
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

/// Arguments for `new`.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Password for the archive. Without one, no archive is printed.
    #[arg(long, short = 'p', env = "CONVEX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Also write the archive to this file.
    #[arg(long, short = 'o', requires = "password")]
    pub output: Option<PathBuf>,

    /// Print the 24 mnemonic words.
    #[arg(long)]
    pub words: bool,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub key: KeyArgs,
}

/// Arguments for `sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// The 32-byte hash to sign, as hex (`0x` optional).
    pub hash: String,
}

/// Arguments for `check-address`.
#[derive(Args, Debug)]
pub struct CheckAddressArgs {
    /// The value to check.
    pub address: String,

    /// Also accept legacy key-derived addresses (`0x` + public key).
    #[arg(long)]
    pub legacy: bool,
}

/// `--log-format` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        KeytoolCli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_keywords() {
        let cli = KeytoolCli::try_parse_from([
            "convex-keytool",
            "show",
            "--keywords",
            "abandon art",
            "--address",
            "#7",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Show(args) => {
                assert_eq!(args.key.keywords.as_deref(), Some("abandon art"));
                assert_eq!(args.key.address.as_deref(), Some("#7"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn keyfile_and_keytext_conflict() {
        let result = KeytoolCli::try_parse_from([
            "convex-keytool",
            "show",
            "--keyfile",
            "a.pem",
            "--keytext",
            "xyz",
        ]);
        assert!(result.is_err());
    }
}
