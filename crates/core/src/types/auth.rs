//! Login and registration payloads.

use serde::{Deserialize, Serialize};

use super::user::User;
use super::validation::{ValidationError, require};

/// Body of `POST /auth/login`.
///
/// `Debug` is implemented by hand so the password never reaches a log line.
#[derive(Clone, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Build login credentials.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Missing` if the username or password is blank.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        let password = password.into();
        require(&username, "username")?;
        require(&password, "password")?;
        Ok(Self { username, password })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize)]
pub struct Registration {
    #[serde(flatten)]
    credentials: Credentials,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<String>,
}

impl Registration {
    /// Build a registration request. A blank avatar URL is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Missing` if the username or password is blank.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        avatar_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            credentials: Credentials::new(username, password)?,
            avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("credentials", &self.credentials)
            .field("avatar_url", &self.avatar_url)
            .finish()
    }
}

/// Successful response of the login and registration endpoints.
///
/// The user profile is kept as raw JSON: the session caches whatever the
/// server sent, and [`AuthResponse::profile`] decodes it when the fields are
/// known.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: serde_json::Value,
}

impl AuthResponse {
    /// Decode the cached profile as a [`User`].
    ///
    /// # Errors
    ///
    /// Returns an error if the profile lacks the `id` or `username` fields.
    pub fn profile(&self) -> Result<User, serde_json::Error> {
        serde_json::from_value(self.user.clone())
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}
