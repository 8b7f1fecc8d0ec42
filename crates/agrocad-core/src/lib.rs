//! # agrocad-core — Foundational Types for the Agrocad Registry
//!
//! The leaf crate of the workspace: every other crate depends on
//! `agrocad-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One document validator.** The CPF/CNPJ modulo-11 check-digit
//!    algorithms live in [`document`] and nowhere else. Request validation,
//!    the producer model, the CLI, and seed generation all import it —
//!    there is no second copy of the weight tables to drift.
//!
//! 2. **Newtypes for domain primitives.** [`DocumentId`] is a validated
//!    wrapper — no bare strings for documents.
//!
//! 3. **Pure validation.** The validator does no I/O and no logging;
//!    callers decide what to log when a value is rejected.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod document;
pub mod error;

// Re-export primary types for ergonomic imports.
pub use document::{DocumentId, DocumentKind};
pub use error::ValidationError;
