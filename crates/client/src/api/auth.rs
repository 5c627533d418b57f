//! Login, registration, and logout.

use spark_canvas_core::{AuthResponse, Credentials, Registration};
use tracing::{info, instrument, warn};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Log in and store the returned token and profile in the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for rejected credentials, or
    /// `ApiError::Session` if the session cannot be written.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.post("/auth/login", credentials).await?;
        self.store_session(&response)?;
        info!("Logged in");
        Ok(response)
    }

    /// Create an account and log straight into it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the server refuses the registration, or
    /// `ApiError::Session` if the session cannot be written.
    #[instrument(skip(self, registration), fields(username = %registration.username()))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.post("/auth/register", registration).await?;
        self.store_session(&response)?;
        info!("Registered");
        Ok(response)
    }

    /// Forget the stored token and profile. No request is made.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the store cannot be written.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        if let Some(session) = self.session() {
            session.clear()?;
        }
        info!("Logged out");
        Ok(())
    }

    fn store_session(&self, response: &AuthResponse) -> Result<(), ApiError> {
        match self.session() {
            Some(session) => Ok(session.save(&response.token, &response.user)?),
            None => {
                warn!("No session configured, token not stored");
                Ok(())
            }
        }
    }
}
