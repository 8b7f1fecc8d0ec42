//! # Crop Catalog & Harvest Rules
//!
//! The fixed crop catalog from the registry, the accepted harvest-year
//! window, and the per-farm duplicate rule: one crop kind per harvest.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use agrocad_core::ValidationError;

/// Earliest accepted harvest year.
const HARVEST_MIN_YEAR: i32 = 2000;

/// How far into the future a harvest may be declared.
const HARVEST_FUTURE_YEARS: i32 = 5;

/// A crop from the registry catalog.
///
/// Serialized with the Portuguese display names the registry has always
/// used, so stored data and API payloads stay compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropKind {
    #[serde(rename = "Soja")]
    Soja,
    #[serde(rename = "Milho")]
    Milho,
    #[serde(rename = "Algodão")]
    Algodao,
    #[serde(rename = "Café")]
    Cafe,
    #[serde(rename = "Cana de Açúcar")]
    CanaDeAcucar,
    #[serde(rename = "Arroz")]
    Arroz,
    #[serde(rename = "Feijão")]
    Feijao,
    #[serde(rename = "Trigo")]
    Trigo,
    #[serde(rename = "Sorgo")]
    Sorgo,
    #[serde(rename = "Outros")]
    Outros,
}

impl CropKind {
    /// Every catalog entry.
    pub const ALL: [CropKind; 10] = [
        CropKind::Soja,
        CropKind::Milho,
        CropKind::Algodao,
        CropKind::Cafe,
        CropKind::CanaDeAcucar,
        CropKind::Arroz,
        CropKind::Feijao,
        CropKind::Trigo,
        CropKind::Sorgo,
        CropKind::Outros,
    ];

    /// Return the display name (the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soja => "Soja",
            Self::Milho => "Milho",
            Self::Algodao => "Algodão",
            Self::Cafe => "Café",
            Self::CanaDeAcucar => "Cana de Açúcar",
            Self::Arroz => "Arroz",
            Self::Feijao => "Feijão",
            Self::Trigo => "Trigo",
            Self::Sorgo => "Sorgo",
            Self::Outros => "Outros",
        }
    }
}

impl std::fmt::Display for CropKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A harvest year within the accepted window.
///
/// The registry accepts years from 2000 up to five years in the future,
/// evaluated against the current UTC year at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HarvestYear(i32);

impl HarvestYear {
    /// Create a harvest year, validating the accepted window.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHarvestYear`] outside
    /// `2000..=current_year + 5`.
    pub fn new(year: i32) -> Result<Self, ValidationError> {
        let max = Utc::now().year() + HARVEST_FUTURE_YEARS;
        if year < HARVEST_MIN_YEAR || year > max {
            return Err(ValidationError::InvalidHarvestYear {
                year,
                min: HARVEST_MIN_YEAR,
                max,
            });
        }
        Ok(Self(year))
    }

    /// The year value.
    pub fn year(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for HarvestYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A planted crop on a farm: catalog kind, harvest year, optional area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    /// Catalog entry.
    pub kind: CropKind,
    /// Harvest year within the accepted window.
    pub harvest: HarvestYear,
    /// Planted area in hectares, if declared. Non-negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planted_area: Option<f64>,
}

impl Crop {
    /// Create a crop entry, validating the planted area when present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidArea`] if the planted area is
    /// negative or not a finite number.
    pub fn new(
        kind: CropKind,
        harvest: HarvestYear,
        planted_area: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if let Some(area) = planted_area {
            if !area.is_finite() || area < 0.0 {
                return Err(ValidationError::InvalidArea(format!(
                    "planted area must be a non-negative number, got {area}"
                )));
            }
        }
        Ok(Self {
            kind,
            harvest,
            planted_area,
        })
    }
}

/// Reject duplicate (kind, harvest) pairs within one farm's crop list.
///
/// # Errors
///
/// Returns [`ValidationError::DuplicateCrop`] naming the first offending
/// pair.
pub fn ensure_no_duplicate_crops(crops: &[Crop]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for crop in crops {
        if !seen.insert((crop.kind, crop.harvest)) {
            return Err(ValidationError::DuplicateCrop {
                crop: crop.kind.as_str().to_string(),
                harvest: crop.harvest.year(),
            });
        }
    }
    Ok(())
}
