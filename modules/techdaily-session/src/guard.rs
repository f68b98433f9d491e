use chrono::{DateTime, Utc};
use tracing::warn;

use crate::claims::{decode_claims, Role};
use crate::storage::TokenStorage;
use crate::store::SessionStore;

/// Where a rejected navigation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    Home,
    Dashboard,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Login => "/login",
            Destination::Home => "/",
            Destination::Dashboard => "/todays",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Destination),
}

/// Gate for member-only views. Any session at all gets through; token
/// contents are not inspected here.
pub fn require_session(store: &SessionStore) -> GuardDecision {
    if store.is_authenticated() {
        GuardDecision::Proceed
    } else {
        GuardDecision::Redirect(Destination::Login)
    }
}

/// Gate for the login view. An existing session skips straight to the
/// dashboard.
pub fn require_no_session(store: &SessionStore) -> GuardDecision {
    if store.is_authenticated() {
        GuardDecision::Redirect(Destination::Dashboard)
    } else {
        GuardDecision::Proceed
    }
}

/// Gate for the review console. Works off the durable token, not the
/// in-memory session, and is the one place expiry is enforced: expired or
/// undecodable tokens are removed from storage and bounced to login, while
/// a live non-admin keeps its token and lands on the home page.
pub fn require_admin(storage: &TokenStorage, now: DateTime<Utc>) -> GuardDecision {
    let token = match storage.load() {
        Ok(Some(token)) => token,
        Ok(None) => return GuardDecision::Redirect(Destination::Login),
        Err(e) => {
            warn!(error = %e, "Could not read stored token");
            return GuardDecision::Redirect(Destination::Login);
        }
    };

    let claims = match decode_claims(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "Stored token failed to decode, clearing it");
            clear_stored_token(storage);
            return GuardDecision::Redirect(Destination::Login);
        }
    };

    if claims.is_expired(now) {
        clear_stored_token(storage);
        return GuardDecision::Redirect(Destination::Login);
    }
    if claims.role != Role::Admin {
        return GuardDecision::Redirect(Destination::Home);
    }
    GuardDecision::Proceed
}

fn clear_stored_token(storage: &TokenStorage) {
    if let Err(e) = storage.clear() {
        warn!(error = %e, "Could not remove stored token");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenClaims;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use tempfile::{tempdir, TempDir};

    const NOW_SECS: i64 = 1_756_000_000;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW_SECS, 0).unwrap()
    }

    fn mint<T: Serialize>(claims: &T) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    fn token_for(role: Role, exp: i64) -> String {
        mint(&TokenClaims {
            user_id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            role,
            exp,
        })
    }

    fn storage_with(dir: &TempDir, token: Option<&str>) -> TokenStorage {
        let storage = TokenStorage::new(dir.path().join("token"));
        if let Some(token) = token {
            storage.save(token).unwrap();
        }
        storage
    }

    #[test]
    fn protected_views_need_a_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::hydrate(storage_with(&dir, None));
        assert_eq!(
            require_session(&store),
            GuardDecision::Redirect(Destination::Login)
        );

        let store = SessionStore::hydrate(storage_with(&dir, Some("any.tok.en")));
        assert_eq!(require_session(&store), GuardDecision::Proceed);
    }

    #[test]
    fn login_view_skips_past_existing_sessions() {
        let dir = tempdir().unwrap();
        let store = SessionStore::hydrate(storage_with(&dir, Some("any.tok.en")));
        assert_eq!(
            require_no_session(&store),
            GuardDecision::Redirect(Destination::Dashboard)
        );

        let dir = tempdir().unwrap();
        let store = SessionStore::hydrate(storage_with(&dir, None));
        assert_eq!(require_no_session(&store), GuardDecision::Proceed);
    }

    #[test]
    fn admin_without_a_stored_token_goes_to_login() {
        let dir = tempdir().unwrap();
        let storage = storage_with(&dir, None);
        assert_eq!(
            require_admin(&storage, now()),
            GuardDecision::Redirect(Destination::Login)
        );
    }

    #[test]
    fn admin_passes_a_live_admin_token() {
        let dir = tempdir().unwrap();
        let token = token_for(Role::Admin, NOW_SECS + 3600);
        let storage = storage_with(&dir, Some(&token));
        assert_eq!(require_admin(&storage, now()), GuardDecision::Proceed);
        assert_eq!(storage.load().unwrap().as_deref(), Some(token.as_str()));
    }

    #[test]
    fn admin_accepts_a_never_expiring_token() {
        let dir = tempdir().unwrap();
        let token = token_for(Role::Admin, i64::MAX);
        let storage = storage_with(&dir, Some(&token));
        assert_eq!(require_admin(&storage, Utc::now()), GuardDecision::Proceed);
        assert!(storage.load().unwrap().is_some());
    }

    #[test]
    fn admin_bounces_non_admins_home_keeping_the_token() {
        let dir = tempdir().unwrap();
        let token = token_for(Role::Viewer, NOW_SECS + 3600);
        let storage = storage_with(&dir, Some(&token));
        assert_eq!(
            require_admin(&storage, now()),
            GuardDecision::Redirect(Destination::Home)
        );
        assert_eq!(storage.load().unwrap().as_deref(), Some(token.as_str()));
    }

    #[test]
    fn unknown_roles_are_not_admins() {
        #[derive(Serialize)]
        struct RawClaims<'a> {
            user_id: &'a str,
            email: &'a str,
            role: &'a str,
            exp: i64,
        }
        let dir = tempdir().unwrap();
        let token = mint(&RawClaims {
            user_id: "u-1",
            email: "ada@example.com",
            role: "superuser",
            exp: NOW_SECS + 3600,
        });
        let storage = storage_with(&dir, Some(&token));
        assert_eq!(
            require_admin(&storage, now()),
            GuardDecision::Redirect(Destination::Home)
        );
        assert!(storage.load().unwrap().is_some());
    }

    #[test]
    fn admin_clears_expired_tokens_regardless_of_role() {
        let dir = tempdir().unwrap();
        let token = token_for(Role::Admin, NOW_SECS - 10);
        let storage = storage_with(&dir, Some(&token));
        assert_eq!(
            require_admin(&storage, now()),
            GuardDecision::Redirect(Destination::Login)
        );
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn admin_clears_undecodable_tokens() {
        let dir = tempdir().unwrap();
        let storage = storage_with(&dir, Some("not-a-jwt"));
        assert_eq!(
            require_admin(&storage, now()),
            GuardDecision::Redirect(Destination::Login)
        );
        assert_eq!(storage.load().unwrap(), None);
    }
}
