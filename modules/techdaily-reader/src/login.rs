use tracing::{info, warn};

use techdaily_client::{login_failure_message, ApiClient};
use techdaily_session::{Destination, SessionError, SessionStore};

/// Exchange a Google id_token for a session. On success the store holds the
/// token and profile; on failure the store records the human-facing message.
/// Returns whether a session was installed.
pub async fn sign_in_with_google(
    client: &ApiClient,
    store: &mut SessionStore,
    id_token: &str,
) -> Result<bool, SessionError> {
    store.login_started();
    match client.google_login(id_token).await {
        Ok(login) => {
            info!(email = %login.user.email, "Signed in");
            store.sign_in(login.access_token, login.user)?;
            Ok(true)
        }
        Err(e) => {
            warn!(error = %e, "Google login exchange failed");
            store.login_failed(login_failure_message(&e));
            Ok(false)
        }
    }
}

/// Decide where the OAuth return lands. A `token` query parameter is a
/// one-shot credential: store it and head for the dashboard. With no token,
/// an existing session still reaches the dashboard and everything else goes
/// back to login.
pub fn consume_callback_token(
    store: &mut SessionStore,
    query: &str,
) -> Result<Destination, SessionError> {
    if let Some(token) = token_param(query) {
        store.set_token(token)?;
        return Ok(Destination::Dashboard);
    }
    if store.is_authenticated() {
        return Ok(Destination::Dashboard);
    }
    Ok(Destination::Login)
}

/// Pull a non-empty `token` parameter out of a query string. The leading
/// `?` is optional.
fn token_param(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == "token" && !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
