use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Normalize repetitive CSV columns into rows",
    long_about = None,
    after_help = "Example:\n  a,b1,b2,c1,c2      a,b,c\n  1,2,3,4,5      ->  1,2,4\n                     1,3,5"
)]
pub struct Cli {
    /// Input CSV file ('-' reads standard input)
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    pub output: Option<PathBuf>,
    /// Character encoding for both input and output
    #[arg(short, long, value_enum, default_value = "sjis")]
    pub encoding: EncodingChoice,
    /// Suppress the output header record
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Never group columns whose name contains this substring
    #[arg(short = 'x', long = "exclude", action = clap::ArgAction::Append, value_delimiter = ',')]
    pub excludes: Vec<String>,
    /// Emit a repeat instance while [all | any] of its columns are non-empty
    #[arg(long = "repeat-if", value_enum, default_value = "any")]
    pub repeat_if: RepeatIf,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EncodingChoice {
    /// Shift_JIS input and output
    Sjis,
    /// UTF-8 input and output
    Utf8,
}

/// Stopping mode for row expansion: a repeat instance is skipped (and
/// expansion halts) once it no longer satisfies the selected condition.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RepeatIf {
    /// Expand while every repeated column is non-empty
    All,
    /// Expand while at least one repeated column is non-empty
    Any,
}
