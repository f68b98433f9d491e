use thiserror::Error;
use tracing::warn;

use techdaily_common::User;

use crate::storage::TokenStorage;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// In-memory session state backed by a durable token file. The token is the
/// sole authentication signal; the user profile only exists after a fresh
/// login exchange in the same process. Also tracks the login request
/// lifecycle so a front end can show progress and the last failure.
pub struct SessionStore {
    storage: TokenStorage,
    token: Option<String>,
    user: Option<User>,
    loading: bool,
    error: Option<String>,
}

impl SessionStore {
    /// Seed the session from durable storage. Unreadable storage degrades to
    /// a logged-out session rather than failing startup.
    pub fn hydrate(storage: TokenStorage) -> Self {
        let token = match storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read stored token, starting logged out");
                None
            }
        };
        Self {
            storage,
            token,
            user: None,
            loading: false,
            error: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Authenticated means a token is present. Expiry is not checked here;
    /// the admin guard is the only expiry checkpoint.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed login, until the next attempt starts.
    pub fn login_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A login exchange has been sent. Clears any stale failure message.
    pub fn login_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// The login exchange came back unusable.
    pub fn login_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Install a fresh login: the token plus the profile the exchange
    /// returned. Memory is only updated once the token is safely on disk.
    pub fn sign_in(&mut self, token: String, user: User) -> Result<(), SessionError> {
        self.storage.save(&token)?;
        self.token = Some(token);
        self.user = Some(user);
        self.loading = false;
        self.error = None;
        Ok(())
    }

    /// Install a token on its own. The redirect callback hands us a token
    /// with no profile attached.
    pub fn set_token(&mut self, token: String) -> Result<(), SessionError> {
        self.storage.save(&token)?;
        self.token = Some(token);
        Ok(())
    }

    /// Drop the session. The in-memory state always resets; a failure to
    /// remove the token file is logged and otherwise ignored.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
        self.loading = false;
        self.error = None;
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Could not remove stored token");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            role: "viewer".to_string(),
            subscription: "free".to_string(),
        }
    }

    #[test]
    fn hydrates_logged_out_without_a_file() {
        let dir = tempdir().unwrap();
        let store = SessionStore::hydrate(TokenStorage::new(dir.path().join("token")));
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert!(!store.is_loading());
        assert!(store.login_error().is_none());
    }

    #[test]
    fn hydrates_from_a_stored_token() {
        let dir = tempdir().unwrap();
        let storage = TokenStorage::new(dir.path().join("token"));
        storage.save("stored.tok.en").unwrap();

        let store = SessionStore::hydrate(storage);
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("stored.tok.en"));
        assert!(store.user().is_none());
    }

    #[test]
    fn sign_in_persists_the_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");

        let mut store = SessionStore::hydrate(TokenStorage::new(&path));
        store.login_started();
        store.sign_in("fresh.tok.en".to_string(), user()).unwrap();
        assert!(store.is_authenticated());
        assert!(!store.is_loading());
        assert_eq!(
            store.user().map(|u| u.email.as_str()),
            Some("ada@example.com")
        );

        let reopened = SessionStore::hydrate(TokenStorage::new(&path));
        assert_eq!(reopened.token(), Some("fresh.tok.en"));
    }

    #[test]
    fn failed_login_keeps_the_message_until_the_next_attempt() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::hydrate(TokenStorage::new(dir.path().join("token")));

        store.login_started();
        assert!(store.is_loading());
        store.login_failed("Google login failed".to_string());
        assert!(!store.is_loading());
        assert_eq!(store.login_error(), Some("Google login failed"));
        assert!(!store.is_authenticated());

        store.login_started();
        assert!(store.login_error().is_none());
    }

    #[test]
    fn token_only_login_has_no_profile() {
        let dir = tempdir().unwrap();
        let mut store = SessionStore::hydrate(TokenStorage::new(dir.path().join("token")));
        store.set_token("callback.tok.en".to_string()).unwrap();
        assert!(store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn sign_out_removes_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");

        let mut store = SessionStore::hydrate(TokenStorage::new(&path));
        store.sign_in("tok".to_string(), user()).unwrap();
        store.sign_out();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(TokenStorage::new(&path).load().unwrap(), None);
    }
}
