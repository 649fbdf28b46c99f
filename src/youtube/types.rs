use serde::Deserialize;

/// Embeddable-metadata response for a watch or playlist URL
#[derive(Debug, Clone, Deserialize)]
pub struct OembedResponse {
    pub title: String,
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Keyed search API response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSnippet {
    pub title: String,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: SearchThumbnails,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchThumbnails {
    pub high: Option<SearchThumbnail>,
    pub medium: Option<SearchThumbnail>,
    #[serde(rename = "default")]
    pub fallback: Option<SearchThumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct SearchThumbnail {
    pub url: String,
}

impl SearchThumbnails {
    /// Best available thumbnail URL, preferring higher resolutions
    pub fn best(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.fallback.as_ref())
            .map(|t| t.url.as_str())
    }
}
