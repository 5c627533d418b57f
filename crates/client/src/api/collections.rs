//! Collection (mood board) operations.

use spark_canvas_core::{Collection, CollectionDetail, CollectionId, Created, NewCollection};
use tracing::{debug, instrument};

use super::list_or_empty;
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        let collections: Option<Vec<Collection>> = self.get("/collections").await?;
        Ok(list_or_empty(collections))
    }

    /// Get a collection with its images.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the collection does not exist.
    #[instrument(skip(self), fields(collection_id = %id))]
    pub async fn get_collection(&self, id: CollectionId) -> Result<CollectionDetail, ApiError> {
        self.get(&format!("/collections/{id}")).await
    }

    /// Create a collection owned by the logged-in user.
    ///
    /// Requires a session token; without one the server answers 401 and the
    /// unauthorized hook runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, collection), fields(title = %collection.title()))]
    pub async fn create_collection(
        &self,
        collection: &NewCollection,
    ) -> Result<Created<CollectionId>, ApiError> {
        let created: Created<CollectionId> = self.post("/collections", collection).await?;
        debug!(collection_id = %created.id, "Collection created");
        Ok(created)
    }
}
