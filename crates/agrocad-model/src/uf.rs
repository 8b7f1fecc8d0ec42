//! # Brazilian State Codes
//!
//! The 27 federative unit (UF) codes. Farms and producer addresses carry a
//! [`Uf`], never a bare string — unknown codes are rejected at the boundary.

use serde::{Deserialize, Serialize};

use agrocad_core::ValidationError;

/// A Brazilian federative unit (state or federal district).
///
/// Serializes as the uppercase two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Uf {
    AC, AL, AP, AM, BA, CE, DF, ES, GO,
    MA, MT, MS, MG, PA, PB, PR, PE, PI,
    RJ, RN, RS, RO, RR, SC, SP, SE, TO,
}

impl Uf {
    /// All 27 federative units, in the conventional alphabetical order.
    pub const ALL: [Uf; 27] = [
        Uf::AC, Uf::AL, Uf::AP, Uf::AM, Uf::BA, Uf::CE, Uf::DF, Uf::ES, Uf::GO,
        Uf::MA, Uf::MT, Uf::MS, Uf::MG, Uf::PA, Uf::PB, Uf::PR, Uf::PE, Uf::PI,
        Uf::RJ, Uf::RN, Uf::RS, Uf::RO, Uf::RR, Uf::SC, Uf::SP, Uf::SE, Uf::TO,
    ];

    /// Return the two-letter code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Uf::AC => "AC", Uf::AL => "AL", Uf::AP => "AP", Uf::AM => "AM",
            Uf::BA => "BA", Uf::CE => "CE", Uf::DF => "DF", Uf::ES => "ES",
            Uf::GO => "GO", Uf::MA => "MA", Uf::MT => "MT", Uf::MS => "MS",
            Uf::MG => "MG", Uf::PA => "PA", Uf::PB => "PB", Uf::PR => "PR",
            Uf::PE => "PE", Uf::PI => "PI", Uf::RJ => "RJ", Uf::RN => "RN",
            Uf::RS => "RS", Uf::RO => "RO", Uf::RR => "RR", Uf::SC => "SC",
            Uf::SP => "SP", Uf::SE => "SE", Uf::TO => "TO",
        }
    }
}

impl std::str::FromStr for Uf {
    type Err = ValidationError;

    /// Parse a two-letter code, case-insensitively and trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Uf::ALL
            .iter()
            .copied()
            .find(|uf| uf.as_str() == code)
            .ok_or_else(|| ValidationError::InvalidStateCode(s.to_string()))
    }
}

impl std::fmt::Display for Uf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_codes() {
        for uf in Uf::ALL {
            assert_eq!(uf.as_str().parse::<Uf>().unwrap(), uf);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" sp ".parse::<Uf>().unwrap(), Uf::SP);
        assert_eq!("mg".parse::<Uf>().unwrap(), Uf::MG);
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!("XX".parse::<Uf>().is_err());
        assert!("".parse::<Uf>().is_err());
        assert!("SPP".parse::<Uf>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Uf::SP).unwrap(), "\"SP\"");
        let uf: Uf = serde_json::from_str("\"TO\"").unwrap();
        assert_eq!(uf, Uf::TO);
    }
}
