use async_trait::async_trait;
use log::warn;

use crate::config::Config;
use crate::core::{MediaDescriptor, MediaPreview, Platform};
use crate::download::download_json;
use crate::error::Result;
use crate::preview::PreviewSource;

pub mod types;

use types::OembedResponse;

const UNKNOWN_AUTHOR: &str = "Unknown";
const FALLBACK_AUTHOR: &str = "Unknown Artist";
const PROVIDER_NAME: &str = "Spotify";

/// Streaming-platform preview source
#[derive(Debug, Clone)]
pub struct SpotifySource;

#[async_trait]
impl PreviewSource for SpotifySource {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    async fn resolve(&self, _cfg: &Config, descriptor: &MediaDescriptor) -> Result<MediaPreview> {
        Ok(resolve_preview(descriptor).await)
    }
}

/// Canonical open URL for a track or playlist id
pub fn build_canonical_url(descriptor: &MediaDescriptor) -> String {
    if descriptor.is_collection {
        format!(
            "https://open.spotify.com/playlist/{}",
            descriptor
                .collection_id
                .as_deref()
                .unwrap_or(&descriptor.id)
        )
    } else {
        format!("https://open.spotify.com/track/{}", descriptor.id)
    }
}

fn build_oembed_url(target: &str) -> String {
    format!(
        "https://open.spotify.com/oembed?url={}",
        urlencoding::encode(target)
    )
}

/// The oembed endpoint combines artist and title as "Artist - Title".
/// Without a separator the whole string is the title.
pub fn split_track_title(combined: &str) -> (String, String) {
    match combined.split_once(" - ") {
        Some((author, title)) if !title.trim().is_empty() => {
            (author.trim().to_string(), title.trim().to_string())
        }
        _ => (UNKNOWN_AUTHOR.to_string(), combined.trim().to_string()),
    }
}

/// Streaming previews never fail: any fetch problem degrades to a generic
/// placeholder since this endpoint is the only metadata source available.
async fn resolve_preview(descriptor: &MediaDescriptor) -> MediaPreview {
    let url = build_canonical_url(descriptor);

    let meta: Option<OembedResponse> = match download_json(&build_oembed_url(&url)).await {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!("streaming metadata unavailable for {}: {}", url, e);
            None
        }
    };

    let (title, author) = match &meta {
        Some(meta) if descriptor.is_collection => (
            meta.title.trim().to_string(),
            // No owner attribution is exposed for playlists
            meta.provider_name
                .clone()
                .unwrap_or_else(|| PROVIDER_NAME.to_string()),
        ),
        Some(meta) => split_track_title(&meta.title),
        None if descriptor.is_collection => {
            ("Playlist".to_string(), FALLBACK_AUTHOR.to_string())
        }
        None => ("Track".to_string(), FALLBACK_AUTHOR.to_string()),
    };

    let artwork = meta
        .as_ref()
        .and_then(|m| m.thumbnail_url.clone())
        .unwrap_or_default();

    let mut preview = MediaPreview::new(
        title,
        author,
        Platform::Spotify,
        url,
        descriptor.id.clone(),
    )
    .with_artwork(artwork);
    if descriptor.is_collection {
        // Item count is never available from this endpoint
        preview = preview.with_collection(None);
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_title_splits_on_first_separator() {
        let (author, title) = split_track_title("Daft Punk - Harder, Better - Faster");
        assert_eq!(author, "Daft Punk");
        assert_eq!(title, "Harder, Better - Faster");
    }

    #[test]
    fn missing_separator_keeps_whole_title() {
        let (author, title) = split_track_title("Untitled Demo");
        assert_eq!(author, "Unknown");
        assert_eq!(title, "Untitled Demo");
    }

    #[test]
    fn canonical_urls() {
        let track = MediaDescriptor::single("abc123".into(), Platform::Spotify);
        assert_eq!(
            build_canonical_url(&track),
            "https://open.spotify.com/track/abc123"
        );

        let playlist =
            MediaDescriptor::collection("p1".into(), "p1".into(), Platform::Spotify);
        assert_eq!(
            build_canonical_url(&playlist),
            "https://open.spotify.com/playlist/p1"
        );
    }
}
