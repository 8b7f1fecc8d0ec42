//! # agrocad-cli — CLI Tool for the Agrocad Registry
//!
//! Provides the `agrocad` command-line interface for working with the
//! registry's document rules without running the API.
//!
//! ## Subcommands
//!
//! - `agrocad validate` — Check CPF/CNPJ documents.
//! - `agrocad format` — Apply the standard punctuation mask.
//! - `agrocad generate` — Produce valid documents for test data.
//! - `agrocad seed` — Emit a JSON fixture of producers and farms.
//!
//! ```bash
//! agrocad validate 123.456.789-09
//! agrocad generate --kind cnpj --count 5 --formatted
//! agrocad seed --producers 20 --output fixtures/dev-seed.json
//! ```

pub mod docid;
pub mod seed;
