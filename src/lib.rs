//! hosp-locate: find hospitals near you
//!
//! A library and CLI tool that asks OpenStreetMap's Overpass API for
//! hospitals within a radius of the user's position.
//!
//! ## Features
//!
//! - Overpass endpoint fallback: each mirror is tried once, in order
//! - Nodes, ways and relations decoded into uniform facility records
//! - Great-circle distance annotation without reordering results
//! - Signed-in session gate with a persisted last-known position
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hosp_locate::coord::Coordinates;
//! use hosp_locate::overpass::OverpassFetcher;
//! use hosp_locate::session::{Identity, Position, PositionSource, Session};
//!
//! # async fn demo() -> hosp_locate::Result<()> {
//! let mut session = Session::new();
//! session.sign_in(Identity::new("uid-1", "Alice", None));
//! session.set_position(Position::new(
//!     Coordinates::new(40.4168, -3.7038), // Madrid
//!     PositionSource::Manual,
//! ));
//!
//! let fetcher = OverpassFetcher::with_defaults()?;
//! let result = hosp_locate::search_hospitals(&session, &fetcher, 5000.0).await?;
//!
//! println!("{}", result.summary());
//! for entry in result.annotated() {
//!     println!("{} - {}", entry.record.name, entry.distance_label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod facility;
pub mod format;
pub mod geo;
pub mod overpass;
pub mod ranking;
pub mod search;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use facility::{FacilityId, FacilityRecord};
pub use overpass::{Endpoint, HospitalQuery, OverpassFetcher};
pub use search::{search_hospitals, SearchResult};
pub use session::Session;
