use serde::Deserialize;

/// Embeddable-metadata response for a track or playlist URL
#[derive(Debug, Clone, Deserialize)]
pub struct OembedResponse {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub provider_name: Option<String>,
}
