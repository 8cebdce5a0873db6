//! Session configuration loaded from environment variables.
//!
//! Authentication itself happens elsewhere; the binary only needs to know which user it
//! acts for. `BIZTRACK_USER_ID` names that user and `BIZTRACK_BUSINESS_NAME` optionally
//! names the business created for them on first sign-in.

use crate::{
    errors::{Error, Result},
    models::Session,
};

/// Environment variable holding the signed-in user's id
pub const USER_ID_VAR: &str = "BIZTRACK_USER_ID";

/// Environment variable holding the business name used when creating a profile
pub const BUSINESS_NAME_VAR: &str = "BIZTRACK_BUSINESS_NAME";

/// Builds a [`Session`] from `BIZTRACK_USER_ID`.
///
/// # Errors
/// Returns [`Error::NotAuthenticated`] when the variable is missing or blank.
pub fn session_from_env() -> Result<Session> {
    let user_id = std::env::var(USER_ID_VAR).map_err(|_| Error::NotAuthenticated)?;
    Session::new(user_id)
}

/// Business name to use for a new profile, if one is configured.
#[must_use]
pub fn business_name_from_env() -> Option<String> {
    std::env::var(BUSINESS_NAME_VAR)
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
