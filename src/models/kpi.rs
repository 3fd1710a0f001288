use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// One month of quality and production figures.
///
/// Entries carry no id and `(month, year)` is not unique; the KPI screen
/// addresses them by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    #[validate(custom = "not_blank")]
    pub month: String,
    #[validate(custom = "not_blank")]
    pub year: String,
    pub quality_rate: f64,
    pub defects: f64,

    // Reserved and scrapped output
    #[serde(default)]
    pub reserved_blow_pieces: f64,
    #[serde(default)]
    pub reserved_blow_weight: f64,
    #[serde(default)]
    pub reserved_injection_pieces: f64,
    #[serde(default)]
    pub reserved_injection_weight: f64,
    #[serde(default)]
    pub scrapped_pieces: f64,
    #[serde(default)]
    pub scrapped_weight: f64,
    #[serde(default)]
    pub scrapped_blow: f64,
    #[serde(default)]
    pub scrapped_injection: f64,

    // Scrap rates, parts per million
    #[serde(default)]
    pub internal_scrap_ppm: f64,
    #[serde(default)]
    pub external_scrap_ppm: f64,

    // Non-conformance reports per shift
    #[serde(default)]
    pub ncr_shift1: f64,
    #[serde(default)]
    pub ncr_shift2: f64,
    #[serde(default)]
    pub ncr_shift3: f64,

    #[serde(default)]
    pub total_supplied: f64,
    #[serde(default)]
    pub total_returned: f64,
    #[serde(default)]
    pub total_complaints: f64,
    #[serde(default)]
    pub total_production: f64,
    #[serde(default)]
    pub total_internal_reserved: f64,
}
