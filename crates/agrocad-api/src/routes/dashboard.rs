//! # Dashboard Aggregations
//!
//! Read-only aggregate views over the registry: totals, land-use split,
//! per-state and per-crop distributions, and a farm-size histogram.
//! Everything is computed from the in-memory stores on request; nothing is
//! cached.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{AppState, FarmRecord};

/// Round to two decimal places for presentation.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A labelled count, used for state and crop distributions.
#[derive(Debug, Serialize, ToSchema)]
pub struct LabelledCount {
    pub name: String,
    pub count: usize,
}

/// One land-use slice: absolute hectares plus share of the total.
#[derive(Debug, Serialize, ToSchema)]
pub struct LandUseSlice {
    /// Hectares.
    pub area: f64,
    /// Percentage of the registry's total hectares, 0 when the registry is empty.
    pub percentage: f64,
}

/// Land-use split across all farms.
#[derive(Debug, Serialize, ToSchema)]
pub struct LandUse {
    pub agricultural: LandUseSlice,
    pub vegetation: LandUseSlice,
    pub unused: LandUseSlice,
}

/// Registry-wide dashboard statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_producers: usize,
    pub total_farms: usize,
    /// Sum of all farms' total areas, hectares.
    pub total_hectares: f64,
    /// Mean total area per farm, 0 when there are no farms.
    pub average_farm_size: f64,
    /// Crop entries across all farms (not distinct kinds).
    pub total_crops: usize,
    /// Farm count per federative unit, alphabetical.
    pub farms_by_state: BTreeMap<String, usize>,
    /// Farm count per crop kind (a farm counts once per kind it plants).
    pub farms_by_crop: BTreeMap<String, usize>,
    pub land_use: LandUse,
    /// Up to five states with the most farms, descending.
    pub top_states: Vec<LabelledCount>,
    /// Up to five crops planted on the most farms, descending.
    pub top_crops: Vec<LabelledCount>,
}

/// One bucket of the farm-size histogram.
#[derive(Debug, Serialize, ToSchema)]
pub struct FarmSizeBucket {
    /// Human-readable range label, e.g. "100-500".
    pub range: String,
    pub count: usize,
    /// Mean total area of farms in the bucket, 0 when empty.
    pub average_area: f64,
}

/// Farm-size histogram response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FarmSizesResponse {
    pub buckets: Vec<FarmSizeBucket>,
}

/// Histogram bucket boundaries in hectares. The last bucket is open-ended.
const SIZE_BUCKETS: [(f64, Option<f64>, &str); 6] = [
    (0.0, Some(100.0), "0-100"),
    (100.0, Some(500.0), "100-500"),
    (500.0, Some(1000.0), "500-1000"),
    (1000.0, Some(5000.0), "1000-5000"),
    (5000.0, Some(10000.0), "5000-10000"),
    (10000.0, None, "10000+"),
];

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/dashboard/stats", get(dashboard_stats))
        .route("/v1/dashboard/farm-sizes", get(farm_sizes))
}

fn top_five(counts: &BTreeMap<String, usize>) -> Vec<LabelledCount> {
    let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
    // Descending by count; the BTreeMap iteration order breaks ties alphabetically.
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .take(5)
        .map(|(name, count)| LabelledCount {
            name: name.clone(),
            count: *count,
        })
        .collect()
}

fn land_use_slice(area: f64, total: f64) -> LandUseSlice {
    let percentage = if total > 0.0 {
        round2(area / total * 100.0)
    } else {
        0.0
    };
    LandUseSlice {
        area: round2(area),
        percentage,
    }
}

fn compute_stats(total_producers: usize, farms: &[FarmRecord]) -> DashboardStats {
    let total_farms = farms.len();
    let total_hectares: f64 = farms.iter().map(|f| f.total_area).sum();
    let agricultural: f64 = farms.iter().map(|f| f.agricultural_area).sum();
    let vegetation: f64 = farms.iter().map(|f| f.vegetation_area).sum();
    let unused = total_hectares - agricultural - vegetation;

    let average_farm_size = if total_farms > 0 {
        round2(total_hectares / total_farms as f64)
    } else {
        0.0
    };

    let total_crops: usize = farms.iter().map(|f| f.crops.len()).sum();

    let mut farms_by_state: BTreeMap<String, usize> = BTreeMap::new();
    for farm in farms {
        *farms_by_state
            .entry(farm.state.as_str().to_string())
            .or_default() += 1;
    }

    // A farm counts once per crop kind, regardless of harvests.
    let mut farms_by_crop: BTreeMap<String, usize> = BTreeMap::new();
    for farm in farms {
        let mut kinds: Vec<&str> = farm.crops.iter().map(|c| c.kind.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        for kind in kinds {
            *farms_by_crop.entry(kind.to_string()).or_default() += 1;
        }
    }

    let top_states = top_five(&farms_by_state);
    let top_crops = top_five(&farms_by_crop);

    DashboardStats {
        total_producers,
        total_farms,
        total_hectares: round2(total_hectares),
        average_farm_size,
        total_crops,
        farms_by_state,
        farms_by_crop,
        land_use: LandUse {
            agricultural: land_use_slice(agricultural, total_hectares),
            vegetation: land_use_slice(vegetation, total_hectares),
            unused: land_use_slice(unused, total_hectares),
        },
        top_states,
        top_crops,
    }
}

fn compute_farm_sizes(farms: &[FarmRecord]) -> FarmSizesResponse {
    let buckets = SIZE_BUCKETS
        .iter()
        .map(|(lo, hi, label)| {
            let areas: Vec<f64> = farms
                .iter()
                .map(|f| f.total_area)
                .filter(|a| *a >= *lo && hi.map_or(true, |hi| *a < hi))
                .collect();
            let count = areas.len();
            let average_area = if count > 0 {
                round2(areas.iter().sum::<f64>() / count as f64)
            } else {
                0.0
            };
            FarmSizeBucket {
                range: (*label).to_string(),
                count,
                average_area,
            }
        })
        .collect();
    FarmSizesResponse { buckets }
}

/// GET /v1/dashboard/stats — Registry-wide statistics.
#[utoipa::path(
    get,
    path = "/v1/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
    ),
    tag = "dashboard"
)]
pub async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let farms = state.farms.list();
    Json(compute_stats(state.producers.len(), &farms))
}

/// GET /v1/dashboard/farm-sizes — Farm-size histogram.
#[utoipa::path(
    get,
    path = "/v1/dashboard/farm-sizes",
    responses(
        (status = 200, description = "Farm-size histogram", body = FarmSizesResponse),
    ),
    tag = "dashboard"
)]
pub async fn farm_sizes(State(state): State<AppState>) -> Json<FarmSizesResponse> {
    Json(compute_farm_sizes(&state.farms.list()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrocad_model::{Crop, CropKind, HarvestYear, Uf};
    use chrono::Utc;
    use uuid::Uuid;

    fn farm(state: Uf, total: f64, agri: f64, veg: f64, crops: Vec<Crop>) -> FarmRecord {
        let now = Utc::now();
        FarmRecord {
            id: Uuid::new_v4(),
            producer_id: Uuid::new_v4(),
            name: "Fazenda".to_string(),
            city: "Cidade".to_string(),
            state,
            total_area: total,
            agricultural_area: agri,
            vegetation_area: veg,
            crops,
            created_at: now,
            updated_at: now,
        }
    }

    fn crop(kind: CropKind, year: i32) -> Crop {
        Crop::new(kind, HarvestYear::new(year).unwrap(), None).unwrap()
    }

    #[test]
    fn stats_over_empty_registry_are_zero() {
        let stats = compute_stats(0, &[]);
        assert_eq!(stats.total_farms, 0);
        assert_eq!(stats.total_hectares, 0.0);
        assert_eq!(stats.average_farm_size, 0.0);
        assert_eq!(stats.land_use.agricultural.percentage, 0.0);
        assert!(stats.top_states.is_empty());
    }

    #[test]
    fn stats_aggregate_areas_and_counts() {
        let farms = vec![
            farm(
                Uf::SP,
                100.0,
                60.0,
                40.0,
                vec![crop(CropKind::Soja, 2023), crop(CropKind::Soja, 2024)],
            ),
            farm(Uf::SP, 200.0, 100.0, 50.0, vec![crop(CropKind::Milho, 2024)]),
            farm(Uf::MT, 300.0, 0.0, 0.0, vec![]),
        ];
        let stats = compute_stats(2, &farms);
        assert_eq!(stats.total_producers, 2);
        assert_eq!(stats.total_farms, 3);
        assert_eq!(stats.total_hectares, 600.0);
        assert_eq!(stats.average_farm_size, 200.0);
        assert_eq!(stats.total_crops, 3);
        assert_eq!(stats.farms_by_state["SP"], 2);
        assert_eq!(stats.farms_by_state["MT"], 1);
        // Two Soja harvests on one farm count it once.
        assert_eq!(stats.farms_by_crop["Soja"], 1);
        assert_eq!(stats.farms_by_crop["Milho"], 1);
        assert_eq!(stats.land_use.agricultural.area, 160.0);
        assert!((stats.land_use.agricultural.percentage - 26.67).abs() < 1e-9);
        assert_eq!(stats.land_use.unused.area, 350.0);
        assert_eq!(stats.top_states[0].name, "SP");
    }

    #[test]
    fn farm_sizes_bucket_boundaries() {
        let farms = vec![
            farm(Uf::SP, 99.9, 0.0, 0.0, vec![]),
            farm(Uf::SP, 100.0, 0.0, 0.0, vec![]),
            farm(Uf::SP, 500.0, 0.0, 0.0, vec![]),
            farm(Uf::SP, 20000.0, 0.0, 0.0, vec![]),
        ];
        let sizes = compute_farm_sizes(&farms);
        assert_eq!(sizes.buckets.len(), 6);
        assert_eq!(sizes.buckets[0].range, "0-100");
        assert_eq!(sizes.buckets[0].count, 1);
        assert_eq!(sizes.buckets[1].count, 1); // 100.0 lands in 100-500
        assert_eq!(sizes.buckets[2].count, 1); // 500.0 lands in 500-1000
        assert_eq!(sizes.buckets[3].count, 0);
        assert_eq!(sizes.buckets[5].count, 1);
        assert_eq!(sizes.buckets[5].average_area, 20000.0);
        assert_eq!(sizes.buckets[3].average_area, 0.0);
    }
}
