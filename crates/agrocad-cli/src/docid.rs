//! # Document Subcommands
//!
//! `validate`, `format`, and `generate` — thin wrappers over
//! [`agrocad_core::document`]. Output is line-oriented so the commands
//! compose in shell pipelines.

use anyhow::Result;
use clap::{Args, ValueEnum};

use agrocad_core::document;
use agrocad_core::DocumentKind;

/// Document kind selector for `generate`.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    Cpf,
    Cnpj,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Cpf => DocumentKind::Cpf,
            KindArg::Cnpj => DocumentKind::Cnpj,
        }
    }
}

/// Arguments for the `agrocad validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Documents to check (CPF or CNPJ, punctuated or bare digits).
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<String>,
}

/// Execute the validate subcommand.
///
/// Prints one line per input: the input, its verdict, and the detected
/// kind. Returns exit code 0 when every document is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let mut had_invalid = false;

    for input in &args.documents {
        let digits = document::clean(input);
        let kind = document::classify(&digits)
            .map(|k| k.as_str())
            .unwrap_or("-");
        if document::validate(input) {
            println!("{input}\tvalid\t{kind}");
        } else {
            println!("{input}\tinvalid\t{kind}");
            had_invalid = true;
        }
    }

    Ok(if had_invalid { 1 } else { 0 })
}

/// Arguments for the `agrocad format` subcommand.
#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Documents to format (full or partial).
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<String>,
}

/// Execute the format subcommand.
///
/// Applies the standard CPF/CNPJ punctuation mask to each input, partial
/// inputs included. Formatting never fails; invalid documents still get
/// the mask.
pub fn run_format(args: &FormatArgs) -> Result<u8> {
    for input in &args.documents {
        println!("{}", document::format(input));
    }
    Ok(0)
}

/// Arguments for the `agrocad generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Which document kind to generate.
    #[arg(long, value_enum, default_value = "cpf")]
    pub kind: KindArg,

    /// How many documents to generate.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Print with the standard punctuation mask.
    #[arg(long)]
    pub formatted: bool,
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let kind: DocumentKind = args.kind.into();
    for _ in 0..args.count {
        let digits = document::generate(kind);
        if args.formatted {
            println!("{}", document::format(&digits));
        } else {
            println!("{digits}");
        }
    }
    Ok(0)
}
