//! # Farm Area Invariants
//!
//! The land-use arithmetic of a farm: total, agricultural (arable), and
//! vegetation areas in hectares. The registry's central farm rule is that
//! the agricultural and vegetation areas together never exceed the total.

use serde::{Deserialize, Serialize};

use agrocad_core::ValidationError;

use crate::crop::Crop;

/// Smallest accepted total area, in hectares.
const TOTAL_AREA_MIN: f64 = 0.1;

/// Largest accepted total area, in hectares.
const TOTAL_AREA_MAX: f64 = 1_000_000.0;

/// A farm's land-use areas, valid by construction.
///
/// Invariants:
/// - `total` in `0.1..=1_000_000` hectares
/// - `agricultural >= 0`, `vegetation >= 0`
/// - `agricultural + vegetation <= total`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarmAreas {
    /// Total farm area in hectares.
    pub total: f64,
    /// Arable (agricultural) area in hectares.
    pub agricultural: f64,
    /// Preserved vegetation area in hectares.
    pub vegetation: f64,
}

impl FarmAreas {
    /// Create a validated area triple.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidArea`] on non-finite values, a
    /// total outside the accepted range, negative parts, or parts that sum
    /// past the total.
    pub fn new(total: f64, agricultural: f64, vegetation: f64) -> Result<Self, ValidationError> {
        if !total.is_finite() || !agricultural.is_finite() || !vegetation.is_finite() {
            return Err(ValidationError::InvalidArea(
                "areas must be finite numbers".to_string(),
            ));
        }
        if total < TOTAL_AREA_MIN || total > TOTAL_AREA_MAX {
            return Err(ValidationError::InvalidArea(format!(
                "total area must be between {TOTAL_AREA_MIN} and {TOTAL_AREA_MAX} hectares, got {total}"
            )));
        }
        if agricultural < 0.0 {
            return Err(ValidationError::InvalidArea(format!(
                "agricultural area must be non-negative, got {agricultural}"
            )));
        }
        if vegetation < 0.0 {
            return Err(ValidationError::InvalidArea(format!(
                "vegetation area must be non-negative, got {vegetation}"
            )));
        }
        if agricultural + vegetation > total {
            return Err(ValidationError::InvalidArea(format!(
                "agricultural ({agricultural}) + vegetation ({vegetation}) exceeds total ({total})"
            )));
        }
        Ok(Self {
            total,
            agricultural,
            vegetation,
        })
    }

    /// Hectares not classified as agricultural or vegetation.
    pub fn unused(&self) -> f64 {
        self.total - self.agricultural - self.vegetation
    }
}

/// Check that a crop's declared planted area fits the farm's arable area.
///
/// Crops without a declared area always fit.
pub fn crop_fits_farm(crop: &Crop, areas: &FarmAreas) -> Result<(), ValidationError> {
    if let Some(planted) = crop.planted_area {
        if planted > areas.agricultural {
            return Err(ValidationError::InvalidArea(format!(
                "planted area ({planted}) exceeds the farm's agricultural area ({})",
                areas.agricultural
            )));
        }
    }
    Ok(())
}
