use serde::{Deserialize, Serialize};
pub use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Supported platforms
#[derive(EnumIter, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub enum Platform {
    Youtube,
    Spotify,
}

// Audio format representation
#[derive(EnumIter, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4A,
    Opus,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::M4A => ".m4a",
            AudioFormat::Opus => ".opus",
            AudioFormat::Wav => ".wav",
        }
    }

    /// Wire value sent to the download service
    pub fn as_request_value(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4A => "m4a",
            AudioFormat::Opus => "opus",
            AudioFormat::Wav => "wav",
        }
    }
}

/// Structured form of a raw link or search phrase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub id: String,
    pub platform: Platform,
    pub is_collection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    pub is_search_query: bool,
}

impl MediaDescriptor {
    /// Create a single-item descriptor
    pub fn single(id: String, platform: Platform) -> Self {
        Self {
            id,
            platform,
            is_collection: false,
            collection_id: None,
            is_search_query: false,
        }
    }

    /// Create a collection descriptor; `id` keys the artwork and may equal the collection id
    pub fn collection(id: String, collection_id: String, platform: Platform) -> Self {
        Self {
            id,
            platform,
            is_collection: true,
            collection_id: Some(collection_id),
            is_search_query: false,
        }
    }

    /// Create a search-query descriptor from an already percent-encoded phrase
    pub fn search(query: String) -> Self {
        Self {
            id: query,
            platform: Platform::Youtube,
            is_collection: false,
            collection_id: None,
            is_search_query: true,
        }
    }
}

/// Lightweight metadata shown to the user before a download starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPreview {
    pub title: String,
    pub author: String,
    pub artwork_url: String,
    pub platform: Platform,
    pub is_collection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
    pub url: String,
    pub id: String,
    /// Sibling candidates when the preview came from a search, best match first
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alternates: Vec<MediaPreview>,
}

impl MediaPreview {
    pub fn new(title: String, author: String, platform: Platform, url: String, id: String) -> Self {
        Self {
            title,
            author,
            artwork_url: String::new(),
            platform,
            is_collection: false,
            item_count: None,
            url,
            id,
            alternates: Vec::new(),
        }
    }

    /// Set artwork URL
    pub fn with_artwork(mut self, artwork_url: String) -> Self {
        self.artwork_url = artwork_url;
        self
    }

    /// Mark as a collection with an optional item count
    pub fn with_collection(mut self, item_count: Option<u32>) -> Self {
        self.is_collection = true;
        self.item_count = item_count;
        self
    }
}

/// Metadata recovered from a downloaded artifact's ID3 container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddedTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl EmbeddedTags {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.year.is_none()
    }
}
