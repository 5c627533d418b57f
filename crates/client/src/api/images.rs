//! Image feed, tags, hearts, and uploads.

use reqwest::multipart::{Form, Part};
use spark_canvas_core::{
    Created, HeartCount, Image, ImageId, ImageUpload, Page, TagCount, UserId,
};
use tracing::{debug, instrument};

use super::list_or_empty;
use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiError;

#[derive(serde::Serialize)]
struct HeartRequest {
    user_id: UserId,
}

impl ApiClient {
    /// List images, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(limit = page.limit, offset = page.offset))]
    pub async fn list_images(&self, page: Page) -> Result<Vec<Image>, ApiError> {
        let images: Option<Vec<Image>> = self.get(&format!("/images?{}", page.query())).await?;
        let images = list_or_empty(images);
        debug!(count = images.len(), "Fetched images");
        Ok(images)
    }

    /// Get a single image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the image does not exist.
    #[instrument(skip(self), fields(image_id = %id))]
    pub async fn get_image(&self, id: ImageId) -> Result<Image, ApiError> {
        self.get(&format!("/images/{id}")).await
    }

    /// List images carrying `tag`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(limit = page.limit, offset = page.offset))]
    pub async fn images_by_tag(&self, tag: &str, page: Page) -> Result<Vec<Image>, ApiError> {
        let path = format!(
            "/images/tag/{}?{}",
            urlencoding::encode(tag.trim()),
            page.query()
        );
        let images: Option<Vec<Image>> = self.get(&path).await?;
        Ok(list_or_empty(images))
    }

    /// Heart an image on behalf of `user`. Returns the new heart count.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(image_id = %id, user_id = %user))]
    pub async fn heart_image(&self, id: ImageId, user: UserId) -> Result<HeartCount, ApiError> {
        self.post(
            &format!("/images/{id}/heart"),
            &HeartRequest { user_id: user },
        )
        .await
    }

    /// Most used tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn trending_tags(&self) -> Result<Vec<TagCount>, ApiError> {
        let tags: Option<Vec<TagCount>> = self.get("/tags/trending").await?;
        Ok(list_or_empty(tags))
    }

    /// Upload an image as `multipart/form-data`.
    ///
    /// Fields: `file`, `caption` and `tags` (only when set), `uploaded_by`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for an unusable content type, or an
    /// API error if the upload is rejected.
    #[instrument(skip(self, upload), fields(file = %upload.file_name(), size = upload.bytes().len()))]
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<Created<ImageId>, ApiError> {
        let form = upload_form(upload)?;
        let created: Created<ImageId> = self
            .post_multipart("/images", form, RequestOptions::default())
            .await?;
        debug!(image_id = %created.id, "Image uploaded");
        Ok(created)
    }
}

fn upload_form(upload: &ImageUpload) -> Result<Form, ApiError> {
    let mut file = Part::bytes(upload.bytes().to_vec()).file_name(upload.file_name().to_owned());
    if let Some(content_type) = upload.content_type() {
        file = file
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidRequest(format!("content type {content_type:?}: {e}")))?;
    }

    let mut form = Form::new().part("file", file);
    if let Some(caption) = upload.caption() {
        form = form.text("caption", caption.to_owned());
    }
    if let Some(tags) = upload.tags_field() {
        form = form.text("tags", tags);
    }
    Ok(form.text("uploaded_by", upload.uploaded_by().to_string()))
}
