//! User profiles.

use spark_canvas_core::{Image, User, UserId};
use tracing::instrument;

use super::list_or_empty;
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Get a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the user does not exist.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.get(&format!("/users/{id}")).await
    }

    /// Images uploaded by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user_images(&self, id: UserId) -> Result<Vec<Image>, ApiError> {
        let images: Option<Vec<Image>> = self.get(&format!("/users/{id}/images")).await?;
        Ok(list_or_empty(images))
    }
}
