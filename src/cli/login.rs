//! Login, logout and whoami handlers
//!
//! The identity provider's profile arrives as flags; the resolved identity is
//! written to the session cache.

use crate::cli::session_store;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{Identity, Profile, Session, SessionStore};
use clap::Args;

/// Login command arguments
#[derive(Args)]
pub struct LoginArgs {
    /// Stable user id from the identity provider
    #[arg(long)]
    pub uid: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,
}

impl LoginArgs {
    fn into_profile(self) -> Profile {
        Profile {
            uid: self.uid,
            display_name: self.name,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// Run the login command
pub fn run(args: LoginArgs) -> Result<()> {
    let config = Config::load()?;
    let store = session_store(&config)?;
    let mut session = store.load();

    let identity = sign_in(&mut session, args.into_profile())?;
    store.save(&session)?;

    println!("Signed in as {}", identity.name);
    Ok(())
}

/// Run the logout command
pub fn logout() -> Result<()> {
    let config = Config::load()?;
    let store = session_store(&config)?;

    let message = sign_out(&store)?;
    println!("{}", message);
    Ok(())
}

/// Forget the cached session, identity and position alike
fn sign_out(store: &SessionStore) -> Result<&'static str> {
    let was_signed_in = store.load().is_signed_in();
    store.clear()?;

    Ok(if was_signed_in { "Signed out" } else { "Not signed in" })
}

/// Run the whoami command
pub fn whoami() -> Result<()> {
    let config = Config::load()?;
    let session = session_store(&config)?.load();

    match session.identity.as_ref().filter(|i| i.is_valid()) {
        Some(identity) => {
            println!("{}", identity.name);
            if let Some(email) = &identity.email {
                println!("  Email: {}", email);
            }
            println!("  Since: {}", identity.signed_in_at.to_rfc3339());
            if let Some(position) = &session.position {
                println!("  Position: {} ({})", position.coords, position.source);
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

/// Resolve a profile and record it as the session identity
fn sign_in(session: &mut Session, profile: Profile) -> Result<Identity> {
    if profile.uid.trim().is_empty() {
        return Err(Error::Session("User id must not be empty".to_string()));
    }

    let identity = Identity::from_profile(&profile);
    if !identity.is_valid() {
        return Err(Error::Session(
            "A name or email is required to sign in".to_string(),
        ));
    }
    session.sign_in(identity.clone());
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(uid: &str) -> Profile {
        Profile {
            uid: uid.to_string(),
            display_name: None,
            email: Some("alice@example.com".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: None,
        }
    }

    #[test]
    fn test_sign_in_resolves_name() {
        let mut session = Session::new();
        let identity = sign_in(&mut session, profile("uid-1")).unwrap();

        assert_eq!(identity.name, "Alice");
        assert!(session.is_signed_in());
    }

    #[test]
    fn test_sign_in_rejects_nameless_profile() {
        let mut session = Session::new();
        let nameless = Profile {
            uid: "uid-9".to_string(),
            ..Profile::default()
        };

        assert!(sign_in(&mut session, nameless).is_err());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_sign_out_clears_orphan_position() {
        use crate::coord::Coordinates;
        use crate::session::{Position, PositionSource};

        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));

        let mut session = Session::new();
        session.set_position(Position::new(Coordinates::new(40.0, -3.0), PositionSource::Manual));
        store.save(&session).unwrap();

        assert_eq!(sign_out(&store).unwrap(), "Not signed in");
        assert!(!store.path().exists());
        assert!(store.load().position.is_none());
    }

    #[test]
    fn test_sign_in_rejects_empty_uid() {
        let mut session = Session::new();
        assert!(sign_in(&mut session, profile("  ")).is_err());
        assert!(!session.is_signed_in());
    }
}
