//! Overpass JSON response decoding
//!
//! Elements are decoded into a tagged enum keyed on the `type` field, so the
//! node / way / relation split is exhaustive: nodes must carry `lat`/`lon`,
//! ways and relations must carry a `center`.

use crate::constants::query::UNNAMED_FACILITY;
use crate::coord::Coordinates;
use crate::facility::{ElementKind, FacilityId, FacilityRecord, GeometryKind};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level Overpass response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,

    /// Set by the server when a query ran into a runtime error or timeout
    #[serde(default)]
    pub remark: Option<String>,
}

/// Precomputed center of a way or relation
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One element of the response
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Way {
        id: i64,
        center: Center,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Relation {
        id: i64,
        center: Center,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
}

impl Element {
    /// Normalize into a facility record
    pub fn into_record(self) -> FacilityRecord {
        let (id, location, geometry, tags) = match self {
            Element::Node { id, lat, lon, tags } => (
                FacilityId::new(ElementKind::Node, id),
                Coordinates::new(lat, lon),
                GeometryKind::Point,
                tags,
            ),
            Element::Way { id, center, tags } => (
                FacilityId::new(ElementKind::Way, id),
                Coordinates::new(center.lat, center.lon),
                GeometryKind::Centroid,
                tags,
            ),
            Element::Relation { id, center, tags } => (
                FacilityId::new(ElementKind::Relation, id),
                Coordinates::new(center.lat, center.lon),
                GeometryKind::Centroid,
                tags,
            ),
        };

        FacilityRecord {
            id,
            name: display_name(&tags),
            tags,
            location,
            geometry,
        }
    }
}

/// `name`, else `operator`, else the placeholder
///
/// Blank values are skipped; others are used exactly as tagged.
fn display_name(tags: &BTreeMap<String, String>) -> String {
    ["name", "operator"]
        .iter()
        .filter_map(|key| tags.get(*key))
        .find(|value| !value.trim().is_empty())
        .map(String::as_str)
        .unwrap_or(UNNAMED_FACILITY)
        .to_string()
}

impl OverpassResponse {
    /// Parse a response body
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Normalize all elements, preserving response order
    pub fn into_records(self) -> Vec<FacilityRecord> {
        self.elements.into_iter().map(Element::into_record).collect()
    }
}
