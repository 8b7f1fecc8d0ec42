//! # agrocad-model — Domain Rules for the Agrocad Registry
//!
//! Everything a producer or farm record must satisfy before it is stored:
//! the 27-state [`Uf`] enum, the crop catalog with harvest windows, the
//! farm area invariant, and the free-text field rules. All constructors
//! validate; a value of these types is valid wherever it travels.
//!
//! Document (CPF/CNPJ) validation lives in `agrocad-core` — this crate
//! consumes it, never reimplements it.

pub mod crop;
pub mod farm;
pub mod fields;
pub mod uf;

pub use crop::{ensure_no_duplicate_crops, Crop, CropKind, HarvestYear};
pub use farm::{crop_fits_farm, FarmAreas};
pub use fields::{normalize_email, normalize_name, normalize_phone, Address};
pub use uf::Uf;
