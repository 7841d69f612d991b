//! Facility records
//!
//! A `FacilityRecord` is one hospital returned by the geodata service,
//! normalized into a uniform shape regardless of whether OSM modelled it as
//! a node, a way or a relation. Records are built fresh for every search and
//! never mutated afterwards.

use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OSM element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Way => write!(f, "way"),
            Self::Relation => write!(f, "relation"),
        }
    }
}

/// Identifier of a facility within one result set
///
/// OSM ids are only unique per element kind, so the kind is part of the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityId {
    pub kind: ElementKind,
    pub id: i64,
}

impl FacilityId {
    pub fn new(kind: ElementKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// Link to the element on openstreetmap.org
    pub fn osm_url(&self) -> String {
        format!("https://www.openstreetmap.org/{}/{}", self.kind, self.id)
    }
}

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Where a record's location came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    /// Direct coordinates of a node
    Point,
    /// Precomputed center of a way or relation
    Centroid,
}

/// A hospital found by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: FacilityId,

    /// Display name, never empty
    pub name: String,

    /// All OSM tags of the element (may be empty)
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    pub location: Coordinates,

    pub geometry: GeometryKind,
}

impl FacilityRecord {
    /// Get a tag value, treating empty strings as absent
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Street line for list display
    ///
    /// Prefers `addr:street` (+ house number), falling back to a bare
    /// `street` tag some mappers use.
    pub fn street(&self) -> Option<String> {
        match (self.tag("addr:street"), self.tag("addr:housenumber")) {
            (Some(street), Some(number)) => Some(format!("{} {}", street, number)),
            (Some(street), None) => Some(street.to_string()),
            _ => self.tag("street").map(str::to_string),
        }
    }

    /// Phone number for popups
    pub fn phone(&self) -> Option<&str> {
        self.tag("phone").or_else(|| self.tag("contact:phone"))
    }

    /// Whether the facility advertises an emergency department
    pub fn has_emergency(&self) -> bool {
        self.tag("emergency") == Some("yes")
    }
}
