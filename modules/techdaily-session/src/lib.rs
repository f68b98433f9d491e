pub mod claims;
pub mod guard;
pub mod storage;
pub mod store;

pub use claims::{decode_claims, ClaimsError, Role, TokenClaims};
pub use guard::{require_admin, require_no_session, require_session, Destination, GuardDecision};
pub use storage::TokenStorage;
pub use store::{SessionError, SessionStore};
