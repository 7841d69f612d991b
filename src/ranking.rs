//! Display-time distance annotation
//!
//! Results keep the order the geodata service returned them in. Distances
//! are computed when a result set is shown and are never written back onto
//! the records.

use crate::coord::distance::{format_meters, haversine_distance};
use crate::coord::Coordinates;
use crate::facility::FacilityRecord;
use serde::Serialize;

/// A record paired with its distance from the origin
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedFacility<'a> {
    #[serde(flatten)]
    pub record: &'a FacilityRecord,

    /// Great-circle distance from the origin in meters, if an origin is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

impl AnnotatedFacility<'_> {
    /// Distance formatted for display ("1234 m"), or empty without an origin
    pub fn distance_label(&self) -> String {
        self.distance_m.map(format_meters).unwrap_or_default()
    }
}

/// Annotate records with their distance from `origin`, preserving order
pub fn annotate(records: &[FacilityRecord], origin: Option<Coordinates>) -> Vec<AnnotatedFacility<'_>> {
    records
        .iter()
        .map(|record| AnnotatedFacility {
            record,
            distance_m: origin.map(|o| haversine_distance(o, record.location)),
        })
        .collect()
}
