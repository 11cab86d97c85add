//! CLI module for tagwright
//!
//! ## Commands
//!
//! - `assign <manifest>` - Assign type tags and rewrite the sidecar store
//! - `check <store>` - Load a sidecar store and print its entries
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::store::StoreFormat;
use crate::version::TAGWRIGHT_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Stable type-tag allocation for generated code
#[derive(Parser, Debug)]
#[command(name = "tagwright")]
#[command(version = TAGWRIGHT_VERSION)]
#[command(about = "Stable type-tag allocation for generated code", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Sidecar store format as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Table,
    Embedded,
}

impl From<FormatArg> for StoreFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => StoreFormat::Table,
            FormatArg::Embedded => StoreFormat::Embedded,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign type tags to the messages of a manifest
    Assign {
        /// Request manifest (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Sidecar store file (format inferred from the extension)
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,
        /// Override the store format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Enum block holding the tags (embedded format)
        #[arg(long = "enum", value_name = "NAME")]
        enum_name: Option<String>,
        /// Constant name prefix
        #[arg(long, default_value = "")]
        prefix: String,
        /// Constant name suffix
        #[arg(long, default_value = "Type")]
        suffix: String,
        /// Print the assignments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the entries of a sidecar store
    Check {
        /// Sidecar store file
        #[arg(value_name = "STORE")]
        store: PathBuf,
        /// Override the store format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Enum block holding the tags (embedded format)
        #[arg(long = "enum", value_name = "NAME")]
        enum_name: Option<String>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Assign {
            manifest,
            store,
            format,
            enum_name,
            prefix,
            suffix,
            json,
        } => commands::assign(&commands::AssignOptions {
            manifest,
            store,
            format: format.map(StoreFormat::from),
            enum_name,
            prefix,
            suffix,
            json,
        }),
        Command::Check {
            store,
            format,
            enum_name,
        } => commands::check(&store, format.map(StoreFormat::from), enum_name.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_assign() {
        let cli = Cli::try_parse_from(["tagwright", "assign", "types.json", "--store", "types.txt"]).unwrap();
        if let Command::Assign {
            manifest,
            store,
            suffix,
            json,
            ..
        } = cli.command
        {
            assert_eq!(manifest, PathBuf::from("types.json"));
            assert_eq!(store, Some(PathBuf::from("types.txt")));
            assert_eq!(suffix, "Type");
            assert!(!json);
        } else {
            panic!("Expected Assign command");
        }
    }

    #[test]
    fn test_cli_parse_assign_embedded() {
        let cli = Cli::try_parse_from([
            "tagwright",
            "assign",
            "types.json",
            "--store",
            "types.txt",
            "--format",
            "embedded",
            "--enum",
            "MessageType",
            "--json",
        ])
        .unwrap();
        if let Command::Assign {
            format, enum_name, json, ..
        } = cli.command
        {
            assert_eq!(format, Some(FormatArg::Embedded));
            assert_eq!(enum_name.as_deref(), Some("MessageType"));
            assert!(json);
        } else {
            panic!("Expected Assign command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["tagwright", "check", "types.proto"]).unwrap();
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tagwright"]).is_err());
    }
}
