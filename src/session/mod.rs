//! Client-side session
//!
//! A `Session` holds who is signed in and where they were last located. It is
//! an explicit value passed to the operations that need it; the CLI loads it
//! from the session cache file, the HTTP server keeps one behind a lock.

pub mod identity;
pub mod store;

pub use identity::{resolve_display_name, Identity, IdentityWatch, Profile};
pub use store::SessionStore;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a position was acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// IP geolocation
    Ip,
    /// Geocoded place name
    Geocoded,
    /// Entered by the user or reported by a browser
    Manual,
}

impl std::fmt::Display for PositionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ip => write!(f, "ip"),
            Self::Geocoded => write!(f, "geocoded"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Last-known position of the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coords: Coordinates,
    pub source: PositionSource,
    /// Place description, if the source provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub located_at: DateTime<Utc>,
}

impl Position {
    pub fn new(coords: Coordinates, source: PositionSource) -> Self {
        Self {
            coords,
            source,
            display_name: None,
            located_at: Utc::now(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Signed-in identity plus last-known position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Session {
    /// Empty (signed out) session
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a usable identity is present
    pub fn is_signed_in(&self) -> bool {
        self.identity.as_ref().is_some_and(Identity::is_valid)
    }

    /// Gate an action on sign-in
    ///
    /// `action` completes the sentence "You must sign in to ...".
    pub fn require_identity(&self, action: &str) -> Result<&Identity> {
        self.identity
            .as_ref()
            .filter(|identity| identity.is_valid())
            .ok_or_else(|| Error::NotSignedIn(action.to_string()))
    }

    /// Last-known position, required for searches
    pub fn require_position(&self) -> Result<&Position> {
        self.position.as_ref().ok_or(Error::NoPosition)
    }

    /// Record a sign-in
    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Forget the identity
    ///
    /// The position is dropped too; the next user starts from scratch.
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.position = None;
    }

    /// Replace the last-known position
    pub fn set_position(&mut self, position: Position) {
        self.position = Some(position);
    }
}
