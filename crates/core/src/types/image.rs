//! Image records and upload payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{ImageId, UserId};
use super::user::empty_as_none;
use super::validation::{ValidationError, require};

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    /// Storage URL, usually `https://ipfs.io/ipfs/<cid>` or `ipfs://<cid>`.
    pub url: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub caption: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hearts: i32,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

impl Image {
    /// Caption to show, falling back to a generic label.
    #[must_use]
    pub fn alt_text(&self) -> &str {
        self.caption.as_deref().unwrap_or("Image")
    }
}

/// Acknowledgement returned by creation endpoints (`{id, ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created<I> {
    pub id: I,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response of `POST /images/{id}/heart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartCount {
    pub hearts: i32,
}

/// One row of `GET /tags/trending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

/// Split a comma-separated tag list, trimming whitespace and dropping empties.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A file to be sent as `multipart/form-data` to `POST /images`.
#[derive(Clone)]
pub struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
    content_type: Option<String>,
    caption: Option<String>,
    tags: Vec<String>,
    uploaded_by: UserId,
}

impl ImageUpload {
    /// Build an upload. The file and the uploader are the only required parts.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Missing` if the file name is blank or the
    /// file is empty.
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        uploaded_by: UserId,
    ) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        require(&file_name, "file name")?;
        if bytes.is_empty() {
            return Err(ValidationError::Missing("file"));
        }
        Ok(Self {
            file_name,
            bytes,
            content_type: None,
            caption: None,
            tags: Vec::new(),
            uploaded_by,
        })
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Attach a caption. Blank captions are ignored.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.caption = (!caption.trim().is_empty()).then_some(caption);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Tags in the comma-separated form the server expects, if any.
    #[must_use]
    pub fn tags_field(&self) -> Option<String> {
        (!self.tags.is_empty()).then(|| self.tags.join(","))
    }

    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("caption", &self.caption)
            .field("tags", &self.tags)
            .field("uploaded_by", &self.uploaded_by)
            .finish()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_image_deserialize_full() {
        let image: Image = serde_json::from_str(
            r#"{
                "id": 5,
                "url": "https://ipfs.io/ipfs/QmHash",
                "caption": "sunset",
                "tags": ["sky", "orange"],
                "hearts": 3,
                "uploaded_by": 1,
                "uploaded_at": "2025-05-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(image.id, ImageId::new(5));
        assert_eq!(image.caption.as_deref(), Some("sunset"));
        assert_eq!(image.tags, vec!["sky", "orange"]);
        assert_eq!(image.alt_text(), "sunset");
    }

    #[test]
    fn test_image_deserialize_omitted_fields() {
        let image: Image = serde_json::from_str(
            r#"{"id":5,"url":"ipfs://Qm","hearts":0,"uploaded_by":1,"uploaded_at":"2025-05-01T12:00:00+02:00","tags":null}"#,
        )
        .unwrap();
        assert!(image.caption.is_none());
        assert!(image.tags.is_empty());
        assert_eq!(image.alt_text(), "Image");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("sky, sea ,,sand"), vec!["sky", "sea", "sand"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_upload_requires_file() {
        assert_eq!(
            ImageUpload::new("a.png", Vec::new(), UserId::new(1)).unwrap_err(),
            ValidationError::Missing("file")
        );
        assert_eq!(
            ImageUpload::new(" ", vec![1], UserId::new(1)).unwrap_err(),
            ValidationError::Missing("file name")
        );
    }

    #[test]
    fn test_upload_optional_fields() {
        let upload = ImageUpload::new("a.png", vec![1, 2, 3], UserId::new(9))
            .unwrap()
            .with_caption("  ")
            .with_tags(parse_tags("sky,sea"));
        assert!(upload.caption().is_none());
        assert_eq!(upload.tags_field().as_deref(), Some("sky,sea"));
        assert_eq!(upload.uploaded_by(), UserId::new(9));

        let untagged = ImageUpload::new("a.png", vec![1], UserId::new(9)).unwrap();
        assert!(untagged.tags_field().is_none());
    }

    #[test]
    fn test_upload_debug_omits_bytes() {
        let upload = ImageUpload::new("a.png", vec![0xAB; 64], UserId::new(9)).unwrap();
        let debug_output = format!("{upload:?}");
        assert!(debug_output.contains("size: 64"));
        assert!(!debug_output.contains("171"));
    }

    #[test]
    fn test_created_with_url() {
        let created: Created<ImageId> =
            serde_json::from_str(r#"{"id":7,"url":"https://ipfs.io/ipfs/Qm"}"#).unwrap();
        assert_eq!(created.id, ImageId::new(7));
        assert_eq!(created.url.as_deref(), Some("https://ipfs.io/ipfs/Qm"));
    }
}
