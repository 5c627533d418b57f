//! Collections (mood boards) of images.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CollectionId, UserId};
use super::image::Image;
use super::validation::{ValidationError, require};

/// A user-created collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

/// Response of `GET /collections/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub collection: Collection,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<Image>,
}

/// Body of `POST /collections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCollection {
    title: String,
    description: String,
}

impl NewCollection {
    /// Build a collection request. The description may be empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Missing` if the title is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        require(&title, "title")?;
        Ok(Self {
            title,
            description: description.into(),
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl CollectionId {
    /// Screen path of this collection (`/collections/{id}`).
    #[must_use]
    pub fn screen_path(&self) -> String {
        format!("/collections/{self}")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Image>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Image>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collection_requires_title() {
        assert_eq!(
            NewCollection::new("", "desc").unwrap_err(),
            ValidationError::Missing("title")
        );
    }

    #[test]
    fn test_new_collection_serializes_empty_description() {
        let new = NewCollection::new("My Board", "").unwrap();
        assert_eq!(
            serde_json::to_value(&new).unwrap(),
            serde_json::json!({"title": "My Board", "description": ""})
        );
    }

    #[test]
    fn test_collection_detail_null_images() {
        let detail: CollectionDetail = serde_json::from_str(
            r#"{"collection":{"id":42,"title":"My Board","created_by":1},"images":null}"#,
        )
        .unwrap();
        assert_eq!(detail.collection.id, CollectionId::new(42));
        assert_eq!(detail.collection.description, "");
        assert!(detail.images.is_empty());
    }

    #[test]
    fn test_screen_path() {
        assert_eq!(CollectionId::new(42).screen_path(), "/collections/42");
    }
}
