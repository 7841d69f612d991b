//! Locate command handler
//!
//! Acquires the user's position and records it in the session.

use crate::cli::session_store;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, get_ip_locator, GeoBackend};
use crate::session::{Position, PositionSource, Session};
use clap::Args;

/// Position source arguments
#[derive(Args, Debug, Default, Clone)]
pub struct LocateArgs {
    /// Latitude
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Named place (geocoded)
    #[arg(long, conflicts_with_all = ["lat", "lng", "here"])]
    pub place: Option<String>,

    /// Use current location (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lng", "place"])]
    pub here: bool,
}

impl LocateArgs {
    /// Whether any position source was given
    pub fn is_given(&self) -> bool {
        self.here || self.place.is_some() || (self.lat.is_some() && self.lng.is_some())
    }
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    if !args.is_given() {
        eprintln!("Error: No location specified. Use --lat/--lng, --place, or --here");
        std::process::exit(1);
    }

    let config = Config::load()?;
    let store = session_store(&config)?;
    let mut session = store.load();

    let position = update_position(&mut session, &args).await?;
    store.save(&session)?;

    match &position.display_name {
        Some(name) => println!("Position: {} {}", position.coords, name),
        None => println!("Position: {}", position.coords),
    }

    Ok(())
}

/// Acquire a position from `args` and store it in `session`
///
/// Gated on sign-in; nothing is looked up for a signed-out session.
pub async fn update_position(session: &mut Session, args: &LocateArgs) -> Result<Position> {
    session.require_identity("use your location")?;

    let position = acquire(args).await?;
    session.set_position(position.clone());
    Ok(position)
}

async fn acquire(args: &LocateArgs) -> Result<Position> {
    if args.here {
        let location = get_ip_locator().locate().await?;
        eprintln!("Using IP location: {}", location.display_name);
        return Ok(location.into_position(PositionSource::Ip));
    }

    if let Some(place) = &args.place {
        let geocoder = get_geocoder()?;
        return match geocoder.geocode(place).await? {
            Some(location) => {
                eprintln!("Geocoded to: {}", location.display_name);
                Ok(location.into_position(PositionSource::Geocoded))
            }
            None => Err(Error::Geo(format!("Could not geocode '{}'", place))),
        };
    }

    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let coords = Coordinates::new(lat, lng);
            coords.validate()?;
            Ok(Position::new(coords, PositionSource::Manual))
        }
        _ => Err(Error::Geo("No position source given".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;

    fn manual(lat: f64, lng: f64) -> LocateArgs {
        LocateArgs {
            lat: Some(lat),
            lng: Some(lng),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_locate_requires_sign_in() {
        let mut session = Session::new();
        let err = update_position(&mut session, &manual(40.0, -3.0))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "You must sign in to use your location");
        assert!(session.position.is_none());
    }

    #[tokio::test]
    async fn test_locate_manual() {
        let mut session = Session::new();
        session.sign_in(Identity::new("uid-1", "Alice", None));

        let position = update_position(&mut session, &manual(40.0, -3.0)).await.unwrap();

        assert_eq!(position.source, PositionSource::Manual);
        assert_eq!(session.require_position().unwrap().coords, Coordinates::new(40.0, -3.0));
    }

    #[tokio::test]
    async fn test_locate_rejects_bad_coordinates() {
        let mut session = Session::new();
        session.sign_in(Identity::new("uid-1", "Alice", None));

        let err = update_position(&mut session, &manual(95.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates(_)));
        assert!(session.position.is_none());
    }

    #[test]
    fn test_is_given() {
        assert!(!LocateArgs::default().is_given());
        assert!(manual(1.0, 2.0).is_given());
        assert!(LocateArgs { here: true, ..Default::default() }.is_given());
    }
}
