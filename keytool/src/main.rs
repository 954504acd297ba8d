// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Convex Keytool
//!
//! Entry point for the `convex-keytool` binary. Parses CLI arguments,
//! initializes logging, runs one subcommand and prints its report.
//!
//! - `new`           generate a key, print it encrypted and/or as words
//! - `show`          load a key, print its public forms and address
//! - `sign`          sign a 32-byte hex hash
//! - `check-address` validate an account address
//! - `version`       print build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::fmt::Display;

use cli::{Commands, KeytoolCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = KeytoolCli::parse();

    logging::init_logging(
        logging::default_directives(cli.debug),
        LogFormat::from(cli.log_format),
    );

    match &cli.command {
        Commands::New(args) => emit(cli.json, &commands::run_new(args)?),
        Commands::Show(args) => emit(cli.json, &commands::run_show(args)?),
        Commands::Sign(args) => emit(cli.json, &commands::run_sign(args)?),
        Commands::CheckAddress(args) => {
            let report = commands::run_check_address(args);
            emit(cli.json, &report)?;
            if !report.valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Print a report to stdout, as JSON or as text.
fn emit<T: Serialize + Display>(json: bool, report: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("convex-keytool {}", env!("CARGO_PKG_VERSION"));
    println!("signing        {}", convex_identity::config::SIGNING_ALGORITHM);
    println!("rustc          {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
