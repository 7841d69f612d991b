//! Signed-in identity
//!
//! Authentication itself belongs to an external identity provider. This
//! module only records what the provider reports and tells interested
//! parts of the program when the sign-in state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider user id
    pub uid: String,
    /// Display name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            email,
            signed_in_at: Utc::now(),
        }
    }

    /// Build an identity from a provider profile
    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(
            profile.uid.clone(),
            resolve_display_name(profile),
            profile.email.clone(),
        )
    }

    /// An identity without a display name does not count as signed in
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// What the identity provider and user profile store report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Pick the name shown to the user
///
/// First + last name, then first name alone, then the provider's display
/// name, then the email address. Empty when none of them is present, which
/// leaves the identity signed out.
pub fn resolve_display_name(profile: &Profile) -> String {
    let present = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    match (present(&profile.first_name), present(&profile.last_name)) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(first), None) => first,
        _ => present(&profile.display_name)
            .or_else(|| present(&profile.email))
            .unwrap_or_default(),
    }
}

/// Broadcasts sign-in state transitions
///
/// Subscribers get the current identity on subscribe and are woken on
/// every change.
#[derive(Debug, Clone)]
pub struct IdentityWatch {
    tx: watch::Sender<Option<Identity>>,
}

impl IdentityWatch {
    pub fn new(initial: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Subscribe to changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    /// Current identity
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Publish a new sign-in state
    ///
    /// Subscribers are only notified when the state actually changes.
    pub fn publish(&self, identity: Option<Identity>) {
        self.tx.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        });
    }
}

impl Default for IdentityWatch {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            uid: "uid-1".to_string(),
            display_name: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            first_name: Some("Alice".to_string()),
            last_name: Some("Example".to_string()),
        }
    }

    #[test]
    fn test_display_name_full_name() {
        assert_eq!(resolve_display_name(&profile()), "Alice Example");
    }

    #[test]
    fn test_display_name_first_name_only() {
        let p = Profile {
            last_name: None,
            ..profile()
        };
        assert_eq!(resolve_display_name(&p), "Alice");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let p = Profile {
            first_name: None,
            last_name: Some("Example".to_string()),
            ..profile()
        };
        assert_eq!(resolve_display_name(&p), "alice");

        let p = Profile {
            uid: "uid-9".to_string(),
            email: Some("bob@example.com".to_string()),
            ..Profile::default()
        };
        assert_eq!(resolve_display_name(&p), "bob@example.com");

        let p = Profile {
            uid: "uid-9".to_string(),
            display_name: Some("   ".to_string()),
            ..Profile::default()
        };
        assert_eq!(resolve_display_name(&p), "");
    }

    #[test]
    fn test_profile_without_name_or_email_is_signed_out() {
        let p = Profile {
            uid: "uid-9".to_string(),
            ..Profile::default()
        };
        let identity = Identity::from_profile(&p);

        assert!(!identity.is_valid());
    }

    #[test]
    fn test_identity_from_profile() {
        let identity = Identity::from_profile(&profile());
        assert_eq!(identity.uid, "uid-1");
        assert_eq!(identity.name, "Alice Example");
        assert!(identity.is_valid());
    }

    #[tokio::test]
    async fn test_watch_notifies_on_change() {
        let watch = IdentityWatch::default();
        let mut rx = watch.subscribe();
        assert!(rx.borrow().is_none());

        let identity = Identity::from_profile(&profile());
        watch.publish(Some(identity.clone()));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&identity));

        // Same state again is not a transition
        watch.publish(Some(identity));
        assert!(!rx.has_changed().unwrap());

        watch.publish(None);
        assert!(rx.has_changed().unwrap());
        assert!(watch.current().is_none());
    }
}
