//! HTTP API routes
//!
//! JSON endpoints a browser map front-end drives: report who is signed in,
//! record the browser's position, and run hospital searches.

use crate::coord::Coordinates;
use crate::error::Error;
use crate::search::search_hospitals;
use crate::server::state::AppState;
use crate::session::{Identity, Position, PositionSource, Profile, Session};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/session", get(session_handler).delete(sign_out_handler))
        .route("/api/session/identity", put(sign_in_handler))
        .route("/api/session/position", put(position_handler))
        .route("/api/hospitals", post(hospitals_handler))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip, default = "default_error_status")]
    pub status: StatusCode,
}

fn default_error_status() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::InvalidRadius(_) => (StatusCode::BAD_REQUEST, "INVALID_RADIUS"),
            Error::NotSignedIn(_) => (StatusCode::UNAUTHORIZED, "NOT_SIGNED_IN"),
            Error::NoPosition => (StatusCode::BAD_REQUEST, "NO_POSITION"),
            Error::AllEndpointsExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
            status,
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Overpass endpoints in priority order
    pub endpoints: Vec<String>,
    /// Timeout hint sent with queries
    pub timeout_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: state
            .fetcher()
            .endpoints()
            .iter()
            .map(|e| e.url.clone())
            .collect(),
        timeout_secs: state.config.overpass.timeout_secs,
    })
}

/// Session response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub signed_in: bool,
    #[serde(flatten)]
    pub session: Session,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            signed_in: session.is_signed_in(),
            session,
        }
    }
}

/// Current session
///
/// GET /api/session
async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(state.session().await.into())
}

/// Record a sign-in reported by the identity provider
///
/// PUT /api/session/identity
async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<Profile>,
) -> Result<Json<SessionResponse>, ApiError> {
    let identity = Identity::from_profile(&profile);
    if profile.uid.trim().is_empty() || !identity.is_valid() {
        return Err(ApiError {
            error: "Profile must carry a user id and a name or email".to_string(),
            code: "INVALID_PROFILE".to_string(),
            status: StatusCode::BAD_REQUEST,
        });
    }

    let session = state.update_session(|s| s.sign_in(identity)).await;
    Ok(Json(session.into()))
}

/// Sign out
///
/// DELETE /api/session
async fn sign_out_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.update_session(Session::sign_out).await;
    StatusCode::NO_CONTENT
}

/// Position report from the browser
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Record the browser's position
///
/// PUT /api/session/position
async fn position_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<Option<Position>>, ApiError> {
    let session = record_position(&state, Coordinates::new(req.lat, req.lng)).await?;
    Ok(Json(session.position))
}

/// Validate and store a browser-reported position, gated on sign-in
///
/// The gate is checked under the session write lock so a concurrent
/// sign-out cannot be overwritten with a stale position.
async fn record_position(state: &AppState, coords: Coordinates) -> Result<Session, ApiError> {
    let session = state
        .try_update_session(|s| {
            s.require_identity("use your location")?;
            coords.validate()?;
            s.set_position(Position::new(coords, PositionSource::Manual));
            Ok(s.clone())
        })
        .await?;
    Ok(session)
}

/// Hospital search request
#[derive(Debug, Default, Deserialize)]
pub struct HospitalsRequest {
    /// Radius in meters (config default when absent)
    #[serde(default)]
    pub radius: Option<f64>,
    /// Fresh position to record before searching
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Search for hospitals around the session position
///
/// POST /api/hospitals
async fn hospitals_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HospitalsRequest>,
) -> Result<Response, ApiError> {
    let session = match (req.lat, req.lng) {
        (Some(lat), Some(lng)) => record_position(&state, Coordinates::new(lat, lng)).await?,
        (None, None) => state.session().await,
        _ => {
            return Err(Error::InvalidCoordinates(
                "lat and lng must be given together".to_string(),
            )
            .into())
        }
    };
    let radius = req.radius.unwrap_or(state.config.defaults.radius);

    let result = search_hospitals(&session, state.fetcher(), radius).await?;

    Ok(Json(result.report()).into_response())
}
