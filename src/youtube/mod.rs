use async_trait::async_trait;
use log::{debug, warn};

use crate::config::Config;
use crate::core::{MediaDescriptor, MediaPreview, Platform};
use crate::download::{download_json, probe};
use crate::error::{Result, TunegrabError};
use crate::normalize::{clean_author, clean_title};
use crate::preview::PreviewSource;

pub mod search;
pub mod types;
pub mod utils;

use types::OembedResponse;
use utils::{
    build_fallback_thumbnail_url, build_oembed_url, build_playlist_url, build_thumbnail_url,
    build_watch_url, video_id_from_thumbnail,
};

const COLLECTION_FALLBACK_TITLE: &str = "Playlist";
const COLLECTION_FALLBACK_AUTHOR: &str = "Various Artists";

/// Video-platform preview source
#[derive(Debug, Clone)]
pub struct YoutubeSource;

#[async_trait]
impl PreviewSource for YoutubeSource {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    async fn resolve(&self, cfg: &Config, descriptor: &MediaDescriptor) -> Result<MediaPreview> {
        if descriptor.is_search_query {
            return search::resolve_search(cfg, &descriptor.id).await;
        }
        if descriptor.is_collection {
            return Ok(resolve_collection(descriptor).await);
        }
        resolve_single(descriptor).await
    }
}

/// Fetch embeddable metadata for one video. A failed fetch propagates since a
/// single item has no meaningful fallback.
async fn resolve_single(descriptor: &MediaDescriptor) -> Result<MediaPreview> {
    let watch_url = build_watch_url(&descriptor.id);
    let meta: OembedResponse = download_json(&build_oembed_url(&watch_url))
        .await
        .map_err(|e| TunegrabError::PreviewUnavailable(e.to_string()))?;

    let raw_author = meta.author_name.unwrap_or_default();
    let author = clean_author(&raw_author);
    let title = clean_title(&meta.title, Some(&raw_author));
    let artwork = pick_thumbnail(&descriptor.id).await;

    Ok(
        MediaPreview::new(title, author, Platform::Youtube, watch_url, descriptor.id.clone())
            .with_artwork(artwork),
    )
}

/// Best-effort collection preview. Metadata failures degrade to generic
/// placeholders, never an error.
async fn resolve_collection(descriptor: &MediaDescriptor) -> MediaPreview {
    let collection_id = descriptor
        .collection_id
        .clone()
        .unwrap_or_else(|| descriptor.id.clone());
    let playlist_url = build_playlist_url(&collection_id);

    let meta: Option<OembedResponse> = match download_json(&build_oembed_url(&playlist_url)).await {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!("playlist metadata unavailable for {}: {}", collection_id, e);
            None
        }
    };

    let (title, author) = match &meta {
        Some(meta) => (
            clean_title(&meta.title, None),
            meta.author_name
                .as_deref()
                .map(clean_author)
                .unwrap_or_else(|| COLLECTION_FALLBACK_AUTHOR.to_string()),
        ),
        None => (
            COLLECTION_FALLBACK_TITLE.to_string(),
            COLLECTION_FALLBACK_AUTHOR.to_string(),
        ),
    };

    // Thumbnail key: a member video when one is known, else the collection id
    let member_id = if descriptor.id != collection_id {
        Some(descriptor.id.clone())
    } else {
        meta.as_ref()
            .and_then(|m| m.thumbnail_url.as_deref())
            .and_then(video_id_from_thumbnail)
    };
    let artwork = match member_id {
        Some(id) => pick_thumbnail(&id).await,
        None => meta
            .as_ref()
            .and_then(|m| m.thumbnail_url.clone())
            .unwrap_or_else(|| build_fallback_thumbnail_url(&collection_id)),
    };

    MediaPreview::new(
        title,
        author,
        Platform::Youtube,
        playlist_url,
        collection_id,
    )
    .with_artwork(artwork)
    .with_collection(None)
}

/// Prefer the high-resolution thumbnail when it exists
async fn pick_thumbnail(video_id: &str) -> String {
    let hires = build_thumbnail_url(video_id);
    if probe(&hires).await {
        hires
    } else {
        debug!("no high-resolution thumbnail for {}", video_id);
        build_fallback_thumbnail_url(video_id)
    }
}
