//! # CPF/CNPJ Document Validation
//!
//! The single authoritative implementation of the Receita Federal modulo-11
//! check-digit algorithms for Brazilian taxpayer identifiers:
//!
//! - **CPF** — Cadastro de Pessoas Físicas, 11 digits, individual taxpayers.
//! - **CNPJ** — Cadastro Nacional da Pessoa Jurídica, 14 digits, legal entities.
//!
//! Every other layer (request validation, the producer model, the CLI, seed
//! data generation) goes through this module. There is exactly one copy of
//! the weight tables and one formulation of the remainder rule.
//!
//! ## Contract
//!
//! All functions here are pure and synchronous: no I/O, no logging, no
//! panics on malformed input. [`validate`] returns `false` for anything it
//! does not accept — wrong length, non-digit residue, failed check digits,
//! or the mandated all-repeated-digit special case (`000.000.000-00` is
//! checksum-correct but defined invalid).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// CNPJ weight table for the first check digit (payload indices 0..12).
const CNPJ_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// CNPJ weight table for the second check digit (indices 0..13, including
/// the first check digit at position 12).
const CNPJ_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// The kind of taxpayer document, classified by canonical digit length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Individual taxpayer id — 11 digits.
    Cpf,
    /// Legal-entity taxpayer id — 14 digits.
    Cnpj,
}

impl DocumentKind {
    /// Return the string representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
        }
    }

    /// Number of payload digits (before the two check digits).
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Cpf => 9,
            Self::Cnpj => 12,
        }
    }

    /// Total canonical length, payload plus two check digits.
    pub fn total_len(&self) -> usize {
        self.payload_len() + 2
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip every non-digit character from the input.
///
/// Accepts any string; an empty result is legal and simply fails the
/// subsequent length classification.
pub fn clean(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Classify a digits-only string by length.
///
/// Exactly 11 digits is a CPF candidate, exactly 14 a CNPJ candidate.
/// Any other length fails closed with `None`.
pub fn classify(digits: &str) -> Option<DocumentKind> {
    match digits.len() {
        11 => Some(DocumentKind::Cpf),
        14 => Some(DocumentKind::Cnpj),
        _ => None,
    }
}

/// True if every character of the input is identical.
///
/// Both check-digit algorithms must reject such inputs even though the
/// checksum arithmetic may accidentally validate them (an all-zero payload
/// legitimately produces all-zero check digits). This is a mandated special
/// case of the Receita Federal rules, not a derived property.
pub fn is_repeated(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// The modulo-11 remainder rule shared by both algorithms.
///
/// `11 - (sum % 11)` maps to 0 whenever the remainder is below 2, which is
/// the same result the `digit >= 10 -> 0` formulation produces.
fn mod11_check_digit(sum: u32) -> u8 {
    let rem = sum % 11;
    if rem < 2 {
        0
    } else {
        (11 - rem) as u8
    }
}

/// Parse a digits-only string into numeric digit values.
///
/// Returns `None` if any character is not an ASCII digit.
fn digit_values(digits: &str) -> Option<Vec<u8>> {
    digits
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

/// Validate the two trailing check digits of an 11-digit CPF.
///
/// Expects the canonical digits-only form. Returns `false` for wrong
/// length, non-digit characters, all-repeated input, or a check-digit
/// mismatch. Verification short-circuits: the second digit is never
/// evaluated when the first fails.
pub fn validate_cpf(digits: &str) -> bool {
    if digits.len() != 11 || is_repeated(digits) {
        return false;
    }
    let d = match digit_values(digits) {
        Some(d) => d,
        None => return false,
    };

    // First check digit: weights 10 down to 2 over the 9 payload digits.
    let sum: u32 = d[..9]
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit as u32 * (10 - i as u32))
        .sum();
    if mod11_check_digit(sum) != d[9] {
        return false;
    }

    // Second check digit: weights 11 down to 2, now including the first
    // check digit at position 9.
    let sum: u32 = d[..10]
        .iter()
        .enumerate()
        .map(|(i, &digit)| digit as u32 * (11 - i as u32))
        .sum();
    mod11_check_digit(sum) == d[10]
}

/// Validate the two trailing check digits of a 14-digit CNPJ.
///
/// Same contract as [`validate_cpf`], using the standard Receita Federal
/// weight tables.
pub fn validate_cnpj(digits: &str) -> bool {
    if digits.len() != 14 || is_repeated(digits) {
        return false;
    }
    let d = match digit_values(digits) {
        Some(d) => d,
        None => return false,
    };

    let sum: u32 = d[..12]
        .iter()
        .zip(CNPJ_WEIGHTS_FIRST)
        .map(|(&digit, weight)| digit as u32 * weight)
        .sum();
    if mod11_check_digit(sum) != d[12] {
        return false;
    }

    let sum: u32 = d[..13]
        .iter()
        .zip(CNPJ_WEIGHTS_SECOND)
        .map(|(&digit, weight)| digit as u32 * weight)
        .sum();
    mod11_check_digit(sum) == d[13]
}

/// Validate a raw candidate identifier: clean, classify, dispatch.
///
/// Accepts punctuated or bare input; returns `false` for anything that is
/// not a checksum-valid CPF or CNPJ. Never panics.
pub fn validate(raw: &str) -> bool {
    let digits = clean(raw);
    match classify(&digits) {
        Some(DocumentKind::Cpf) => validate_cpf(&digits),
        Some(DocumentKind::Cnpj) => validate_cnpj(&digits),
        None => false,
    }
}

/// Re-insert display punctuation at the fixed CPF/CNPJ offsets.
///
/// This is a display transform, not validation: it supports partial input
/// for live masking by inserting punctuation only at offsets already
/// reached. Up to 11 digits the CPF mask (`ddd.ddd.ddd-dd`) applies; 12 or
/// more digits switch to the CNPJ mask (`dd.ddd.ddd/dddd-dd`), truncated at
/// 14 digits.
pub fn format(raw: &str) -> String {
    let digits = clean(raw);

    let (separators, max_len): (&[(usize, char)], usize) = if digits.len() <= 11 {
        (&[(3, '.'), (6, '.'), (9, '-')], 11)
    } else {
        (&[(2, '.'), (5, '.'), (8, '/'), (12, '-')], 14)
    };

    let mut out = String::with_capacity(max_len + separators.len());
    for (i, c) in digits.chars().take(max_len).enumerate() {
        if let Some(&(_, sep)) = separators.iter().find(|&&(offset, _)| offset == i) {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Compute and append the two check digits for a payload.
///
/// The payload must already have the kind's payload length and contain only
/// digits; this is an internal helper for generation and tests.
fn complete(kind: DocumentKind, payload: &[u8]) -> String {
    debug_assert_eq!(payload.len(), kind.payload_len());

    let mut digits = payload.to_vec();
    match kind {
        DocumentKind::Cpf => {
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &d)| d as u32 * (10 - i as u32))
                .sum();
            digits.push(mod11_check_digit(sum));
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &d)| d as u32 * (11 - i as u32))
                .sum();
            digits.push(mod11_check_digit(sum));
        }
        DocumentKind::Cnpj => {
            let sum: u32 = digits
                .iter()
                .zip(CNPJ_WEIGHTS_FIRST)
                .map(|(&d, w)| d as u32 * w)
                .sum();
            digits.push(mod11_check_digit(sum));
            let sum: u32 = digits
                .iter()
                .zip(CNPJ_WEIGHTS_SECOND)
                .map(|(&d, w)| d as u32 * w)
                .sum();
            digits.push(mod11_check_digit(sum));
        }
    }

    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

/// Generate a structurally valid synthetic identifier for test/seed data.
///
/// Draws the payload digits uniformly at random and appends the computed
/// check digits. All-repeated payloads are redrawn so that the result always
/// passes [`validate`] — the odds of drawing one are negligible, but the
/// guard keeps the generate→validate property unconditional.
pub fn generate(kind: DocumentKind) -> String {
    generate_with(kind, &mut rand::thread_rng())
}

/// [`generate`] with a caller-supplied RNG, for deterministic seed data.
pub fn generate_with<R: rand::Rng + ?Sized>(kind: DocumentKind, rng: &mut R) -> String {
    loop {
        let payload: Vec<u8> = (0..kind.payload_len()).map(|_| rng.gen_range(0..10)).collect();
        if payload.iter().all(|&d| d == payload[0]) {
            continue;
        }
        return complete(kind, &payload);
    }
}

/// A validated CPF or CNPJ in canonical digits-only form.
///
/// The constructor accepts punctuated or bare input and stores the cleaned
/// canonical digits; a `DocumentId` is checksum-valid by construction.
/// `Display` renders the punctuated form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id from a raw string, validating check digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDocument`] if the cleaned input is
    /// not a checksum-valid CPF or CNPJ.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let digits = clean(&raw);
        let valid = match classify(&digits) {
            Some(DocumentKind::Cpf) => validate_cpf(&digits),
            Some(DocumentKind::Cnpj) => validate_cnpj(&digits),
            None => false,
        };
        if !valid {
            return Err(ValidationError::InvalidDocument(raw));
        }
        Ok(Self(digits))
    }

    /// The document kind, derived from the canonical length.
    pub fn kind(&self) -> DocumentKind {
        // Length is 11 or 14 by construction.
        if self.0.len() == 14 {
            DocumentKind::Cnpj
        } else {
            DocumentKind::Cpf
        }
    }

    /// Access the canonical digits-only form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the punctuated display form.
    pub fn formatted(&self) -> String {
        format(&self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for DocumentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Deserialization goes through the validating constructor, so a stored or
/// wire-sourced `DocumentId` is as trustworthy as a freshly built one.
impl TryFrom<String> for DocumentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -- clean / classify --

    #[test]
    fn clean_strips_punctuation_and_whitespace() {
        assert_eq!(clean("123.456.789-09"), "12345678909");
        assert_eq!(clean(" 12.345.678/0001-95 "), "12345678000195");
        assert_eq!(clean("abc"), "");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn classify_by_length_only() {
        assert_eq!(classify("12345678909"), Some(DocumentKind::Cpf));
        assert_eq!(classify("12345678000195"), Some(DocumentKind::Cnpj));
        assert_eq!(classify(""), None);
        assert_eq!(classify("1234567890"), None); // 10
        assert_eq!(classify("123456789012"), None); // 12
        assert_eq!(classify("1234567890123"), None); // 13
        assert_eq!(classify("123456789012345"), None); // 15
    }

    // -- fixture vectors --

    #[test]
    fn cpf_known_valid() {
        assert!(validate("12345678909"));
        assert!(validate_cpf("12345678909"));
    }

    #[test]
    fn cpf_check_digits_for_base_payload() {
        let payload = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert_eq!(complete(DocumentKind::Cpf, &payload), "12345678909");
    }

    #[test]
    fn cnpj_known_valid() {
        assert!(validate("12345678000195"));
        assert!(validate_cnpj("12345678000195"));
    }

    #[test]
    fn wrong_length_always_invalid() {
        for input in ["", "123", "1234567890", "123456789012", "1234567890123", "123456789012345"]
        {
            assert!(!validate(input), "length {} accepted", input.len());
        }
    }

    #[test]
    fn punctuation_invariance() {
        assert_eq!(validate("123.456.789-09"), validate("12345678909"));
        assert_eq!(validate("12.345.678/0001-95"), validate("12345678000195"));
        assert!(validate("123.456.789-09"));
    }

    #[test]
    fn non_digit_residue_rejected() {
        // Cleaning removes letters, so this collapses to a short string.
        assert!(!validate("1234567890a"));
    }

    // -- repeated-digit special case --

    #[test]
    fn repeated_digits_invalid_despite_checksum() {
        // All-zero and all-one CPFs, all-repeated CNPJs: the arithmetic may
        // produce matching check digits, but the rule rejects them outright.
        for d in 0..=9u8 {
            let cpf: String = std::iter::repeat(char::from(b'0' + d)).take(11).collect();
            let cnpj: String = std::iter::repeat(char::from(b'0' + d)).take(14).collect();
            assert!(!validate(&cpf), "{cpf} accepted");
            assert!(!validate(&cnpj), "{cnpj} accepted");
        }
    }

    #[test]
    fn is_repeated_edge_cases() {
        assert!(is_repeated("000"));
        assert!(is_repeated("7"));
        assert!(!is_repeated("010"));
        assert!(!is_repeated(""));
    }

    // -- check-digit sensitivity --

    #[test]
    fn check_digit_positions_are_sensitive() {
        // Mutating either check digit must fail validation; the first
        // mismatch short-circuits before the second digit is examined.
        let valid = "12345678909";
        for pos in [9usize, 10] {
            let original = valid.as_bytes()[pos] - b'0';
            for replacement in 0..=9u8 {
                if replacement == original {
                    continue;
                }
                let mut mutated = valid.as_bytes().to_vec();
                mutated[pos] = b'0' + replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(!validate(&mutated), "{mutated} accepted");
            }
        }
    }

    #[test]
    fn cnpj_check_digit_positions_are_sensitive() {
        let valid = "12345678000195";
        for pos in [12usize, 13] {
            let original = valid.as_bytes()[pos] - b'0';
            for replacement in 0..=9u8 {
                if replacement == original {
                    continue;
                }
                let mut mutated = valid.as_bytes().to_vec();
                mutated[pos] = b'0' + replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(!validate(&mutated), "{mutated} accepted");
            }
        }
    }

    // -- format --

    #[test]
    fn format_full_cpf() {
        assert_eq!(format("12345678909"), "123.456.789-09");
    }

    #[test]
    fn format_full_cnpj() {
        assert_eq!(format("12345678000199"), "12.345.678/0001-99");
    }

    #[test]
    fn format_partial_input_masks_progressively() {
        assert_eq!(format(""), "");
        assert_eq!(format("1"), "1");
        assert_eq!(format("123"), "123");
        assert_eq!(format("1234"), "123.4");
        assert_eq!(format("123456"), "123.456");
        assert_eq!(format("1234567"), "123.456.7");
        assert_eq!(format("1234567890"), "123.456.789-0");
    }

    #[test]
    fn format_switches_to_cnpj_mask_past_eleven_digits() {
        // 12 digits get the CNPJ mask with no dash group yet.
        assert_eq!(format("123456789012"), "12.345.678/9012");
        assert_eq!(format("1234567890123"), "12.345.678/9012-3");
    }

    #[test]
    fn format_truncates_excess_digits() {
        assert_eq!(format("123456780001951111"), "12.345.678/0001-95");
    }

    #[test]
    fn format_is_idempotent_on_its_own_output() {
        assert_eq!(format("123.456.789-09"), "123.456.789-09");
        assert_eq!(format("12.345.678/0001-99"), "12.345.678/0001-99");
    }

    // -- generate --

    #[test]
    fn generate_cpf_validates() {
        for _ in 0..64 {
            let id = generate(DocumentKind::Cpf);
            assert_eq!(id.len(), 11);
            assert!(validate(&id), "{id} did not validate");
        }
    }

    #[test]
    fn generate_cnpj_validates() {
        for _ in 0..64 {
            let id = generate(DocumentKind::Cnpj);
            assert_eq!(id.len(), 14);
            assert!(validate(&id), "{id} did not validate");
        }
    }

    // -- DocumentId newtype --

    #[test]
    fn document_id_accepts_punctuated_input() {
        let id = DocumentId::new("123.456.789-09").unwrap();
        assert_eq!(id.as_str(), "12345678909"); // canonical form
        assert_eq!(id.kind(), DocumentKind::Cpf);
        assert_eq!(id.formatted(), "123.456.789-09");
        assert_eq!(id.to_string(), "123.456.789-09");
    }

    #[test]
    fn document_id_cnpj() {
        let id = DocumentId::new("12345678000195").unwrap();
        assert_eq!(id.kind(), DocumentKind::Cnpj);
        assert_eq!(id.formatted(), "12.345.678/0001-95");
    }

    #[test]
    fn document_id_rejects_invalid() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::new("123").is_err());
        assert!(DocumentId::new("11111111111").is_err());
        assert!(DocumentId::new("12345678900").is_err()); // bad check digit
    }

    #[test]
    fn document_id_serializes_as_canonical_string() {
        let id = DocumentId::new("123.456.789-09").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"12345678909\"");
    }

    #[test]
    fn document_id_deserialization_validates() {
        let id: DocumentId = serde_json::from_str("\"123.456.789-09\"").unwrap();
        assert_eq!(id.as_str(), "12345678909");
        assert!(serde_json::from_str::<DocumentId>("\"11111111111\"").is_err());
        assert!(serde_json::from_str::<DocumentId>("\"123\"").is_err());
    }

    #[test]
    fn document_kind_display() {
        assert_eq!(DocumentKind::Cpf.to_string(), "cpf");
        assert_eq!(DocumentKind::Cnpj.to_string(), "cnpj");
    }

    // -- properties --

    proptest! {
        /// Any non-repeated payload completes to a valid document; repeated
        /// payloads that complete to a repeated id are rejected by the rule.
        #[test]
        fn cpf_completion_validates(payload in proptest::collection::vec(0u8..10, 9)) {
            let full = complete(DocumentKind::Cpf, &payload);
            prop_assert_eq!(validate(&full), !is_repeated(&full));
        }

        #[test]
        fn cnpj_completion_validates(payload in proptest::collection::vec(0u8..10, 12)) {
            let full = complete(DocumentKind::Cnpj, &payload);
            prop_assert_eq!(validate(&full), !is_repeated(&full));
        }

        /// `validate` never panics and is invariant under punctuation noise.
        #[test]
        fn validate_total_on_arbitrary_input(raw in ".{0,40}") {
            let _ = validate(&raw);
            let cleaned = clean(&raw);
            prop_assert_eq!(validate(&raw), validate(&cleaned));
        }
    }
}
