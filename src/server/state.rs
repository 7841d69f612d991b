//! Server shared state
//!
//! Holds configuration, the session and the fetcher for the HTTP server.

use crate::config::Config;
use crate::error::Result;
use crate::overpass::OverpassFetcher;
use crate::session::{IdentityWatch, Session, SessionStore};
use tokio::sync::RwLock;
use tracing::warn;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration (read-only while serving)
    pub config: Config,

    /// Current session
    session: RwLock<Session>,

    /// Where the session is persisted, if anywhere
    store: Option<SessionStore>,

    /// Sign-in transitions
    identity: IdentityWatch,

    fetcher: OverpassFetcher,
}

impl AppState {
    /// Create new application state
    ///
    /// The session is loaded from `store` when one is given.
    pub fn new(config: Config, store: Option<SessionStore>) -> Result<Self> {
        let session = store.as_ref().map(SessionStore::load).unwrap_or_default();
        let fetcher = OverpassFetcher::from_config(&config.overpass)?;
        let identity = IdentityWatch::new(session.identity.clone());

        Ok(Self {
            config,
            session: RwLock::new(session),
            store,
            identity,
            fetcher,
        })
    }

    /// Snapshot of the current session
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Apply a change to the session, persist it and publish identity changes
    pub async fn update_session<F>(&self, f: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.session.write().await;
        f(&mut session);
        self.commit(&session);
        session.clone()
    }

    /// Like [`update_session`](Self::update_session), for changes that can be refused
    ///
    /// `f` runs under the write lock, so checks it makes still hold when it
    /// mutates. On error nothing is persisted or published; `f` must leave
    /// the session untouched before returning an error.
    pub async fn try_update_session<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        let mut session = self.session.write().await;
        let value = f(&mut session)?;
        self.commit(&session);
        Ok(value)
    }

    fn commit(&self, session: &Session) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(session) {
                warn!("Failed to persist session: {}", e);
            }
        }

        self.identity.publish(session.identity.clone());
    }

    pub fn identity_watch(&self) -> &IdentityWatch {
        &self.identity
    }

    pub fn fetcher(&self) -> &OverpassFetcher {
        &self.fetcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::session::{Identity, Position, PositionSource};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_refused_update_is_not_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));
        let state = AppState::new(Config::default(), Some(store.clone())).unwrap();

        let result = state
            .try_update_session(|s| {
                s.require_identity("use your location")?;
                s.set_position(Position::new(Coordinates::new(1.0, 2.0), PositionSource::Manual));
                Ok(())
            })
            .await;

        assert!(result.is_err());
        assert!(state.session().await.position.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sign_out_never_leaves_a_position_behind() {
        let state = std::sync::Arc::new(AppState::new(Config::default(), None).unwrap());

        for round in 0..50 {
            state
                .update_session(|s| s.sign_in(Identity::new("uid-1", "Alice", None)))
                .await;

            let writer = {
                let state = state.clone();
                tokio::spawn(async move {
                    let _ = state
                        .try_update_session(|s| {
                            s.require_identity("use your location")?;
                            s.set_position(Position::new(
                                Coordinates::new(round as f64 / 10.0, 0.0),
                                PositionSource::Manual,
                            ));
                            Ok(())
                        })
                        .await;
                })
            };
            let signer_out = {
                let state = state.clone();
                tokio::spawn(async move { state.update_session(Session::sign_out).await })
            };

            writer.await.unwrap();
            signer_out.await.unwrap();

            let session = state.session().await;
            assert!(session.identity.is_some() || session.position.is_none());
        }
    }
}
