//! Google Books `volumes` request and response types.
//!
//! Only the fields the finder reads are modelled; everything else in the
//! JSON is ignored.

use serde::{Deserialize, Serialize};
use shared::BookItem;

/// Result ordering understood by the volumes endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Newest,
    Relevance,
}

impl OrderBy {
    pub fn as_str(&self) -> &str {
        match self {
            OrderBy::Newest => "newest",
            OrderBy::Relevance => "relevance",
        }
    }
}

/// One request against the search interface
///
/// The access credential is not part of the request; the backend owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    pub print_type: String,
    pub order_by: OrderBy,
    pub max_results: u32,
    pub start_index: u32,
    pub lang_restrict: Option<String>,
}

/// Volumes list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u32,
    /// Absent when the page is empty
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

impl VolumesResponse {
    pub fn into_items(self) -> Vec<Volume> {
        self.items.unwrap_or_default()
    }
}

/// A single volume entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub language: String,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

impl Volume {
    /// Category labels attached to this volume (possibly none)
    pub fn categories(&self) -> &[String] {
        &self.volume_info.categories
    }

    pub fn language(&self) -> &str {
        &self.volume_info.language
    }
}

impl From<Volume> for BookItem {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        BookItem {
            id: volume.id,
            title: info.title,
            authors: info.authors,
            description: info.description,
            thumbnail_url: info.image_links.and_then(|links| links.thumbnail),
            language: info.language,
        }
    }
}
