use tracing::info;

use crate::models::Scope;
use crate::store::{KeyValueStorage, PersistenceError};

const CURRENT_USER_KEY: &str = "currentUser";
const THEME_KEY: &str = "theme";
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("username is required")]
    MissingUsername,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("not logged in; run `flowspend login <username> <password>` or pass --demo")]
    NotLoggedIn,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Start a session for `username`. Credentials are only shape-checked;
/// nothing is verified against a stored secret.
pub(crate) fn login<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    username: &str,
    password: &str,
) -> Result<Scope, SessionError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(SessionError::MissingUsername);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SessionError::PasswordTooShort);
    }
    storage.set(CURRENT_USER_KEY, username)?;
    info!(user = username, "logged in");
    Ok(Scope::user(username))
}

/// Register and log in. A new user simply starts with an empty ledger.
pub(crate) fn signup<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<Scope, SessionError> {
    if password != confirm {
        return Err(SessionError::PasswordMismatch);
    }
    login(storage, username, password)
}

pub(crate) fn logout<S: KeyValueStorage + ?Sized>(storage: &mut S) -> Result<(), SessionError> {
    storage.remove(CURRENT_USER_KEY)?;
    info!("logged out");
    Ok(())
}

pub(crate) fn current_user<S: KeyValueStorage + ?Sized>(
    storage: &S,
) -> Result<Option<String>, SessionError> {
    Ok(storage
        .get(CURRENT_USER_KEY)?
        .filter(|user| !user.trim().is_empty()))
}

/// Pick the active scope: demo wins, then an explicit user, then the
/// stored session.
pub(crate) fn resolve_scope<S: KeyValueStorage + ?Sized>(
    storage: &S,
    demo: bool,
    user_override: Option<&str>,
) -> Result<Scope, SessionError> {
    if demo {
        return Ok(Scope::Demo);
    }
    if let Some(user) = user_override.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(Scope::user(user));
    }
    current_user(storage)?
        .map(|user| Scope::user(&user))
        .ok_or(SessionError::NotLoggedIn)
}

// ── Theme ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light-mode",
            Self::Dark => "dark-mode",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light-mode" | "light" => Some(Self::Light),
            "dark-mode" | "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

pub(crate) fn theme<S: KeyValueStorage + ?Sized>(storage: &S) -> Result<Theme, SessionError> {
    Ok(storage
        .get(THEME_KEY)?
        .and_then(|raw| Theme::parse(&raw))
        .unwrap_or_default())
}

pub(crate) fn set_theme<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    theme: Theme,
) -> Result<(), SessionError> {
    storage.set(THEME_KEY, theme.as_str())?;
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
