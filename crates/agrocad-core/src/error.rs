//! # Error Hierarchy
//!
//! Structured error types for the Agrocad registry, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Validation errors carry the invalid input and the expected format so that
//! operators can diagnose bad data without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Each constructor enforces its format constraints at construction time;
/// a value of the corresponding type is valid by construction everywhere
/// downstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// CPF/CNPJ failed cleaning, length classification, or the modulo-11
    /// check-digit verification.
    #[error("invalid CPF/CNPJ: \"{0}\" (expected 11 or 14 digits with valid check digits)")]
    InvalidDocument(String),

    /// Not one of the 27 Brazilian state codes.
    #[error("invalid state code: \"{0}\" (expected a two-letter UF, e.g. SP, MG)")]
    InvalidStateCode(String),

    /// Name length outside the accepted range.
    #[error("invalid name: \"{value}\" ({reason})")]
    InvalidName {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Email fails structural validation.
    #[error("invalid email: \"{0}\"")]
    InvalidEmail(String),

    /// Farm area constraint violated.
    #[error("invalid area: {0}")]
    InvalidArea(String),

    /// Harvest year outside the accepted window.
    #[error("invalid harvest year: {year} (expected {min}..={max})")]
    InvalidHarvestYear {
        /// The rejected year.
        year: i32,
        /// Lower bound of the accepted window.
        min: i32,
        /// Upper bound of the accepted window.
        max: i32,
    },

    /// The same crop appears twice for the same harvest on one farm.
    #[error("duplicate crop: {crop} already planted for harvest {harvest}")]
    DuplicateCrop {
        /// The crop display name.
        crop: String,
        /// The harvest year.
        harvest: i32,
    },
}
