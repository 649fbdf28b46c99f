use crate::config::Config;
use crate::core::{MediaPreview, Platform};
use crate::download::download_json;
use crate::error::{Result, TunegrabError};
use crate::normalize::{clean_author, clean_title};
use crate::youtube::types::{SearchItem, SearchResponse};
use crate::youtube::utils::build_watch_url;

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
const MAX_RESULTS: u8 = 5;

/// Resolve a free-text query to the best-matching video, keeping every
/// candidate in the preview's alternates so the user can switch between them.
/// `encoded_query` is the percent-encoded phrase produced by classification.
pub async fn resolve_search(cfg: &Config, encoded_query: &str) -> Result<MediaPreview> {
    let key = cfg
        .youtube_api_key
        .as_deref()
        .ok_or(TunegrabError::ApiKeyMissing)?;

    let url = format!(
        "{}?part=snippet&maxResults={}&q={}&type=video&key={}",
        SEARCH_ENDPOINT, MAX_RESULTS, encoded_query, key
    );

    let response: SearchResponse = download_json(&url).await?;
    let candidates = build_candidates(&response);
    assemble_search_preview(candidates, encoded_query)
}

/// One preview per returned item, in the search API's ranking order
pub(crate) fn build_candidates(response: &SearchResponse) -> Vec<MediaPreview> {
    response
        .items
        .iter()
        .filter_map(candidate_from_item)
        .collect()
}

fn candidate_from_item(item: &SearchItem) -> Option<MediaPreview> {
    let video_id = item.id.video_id.as_deref()?;
    let author = clean_author(&item.snippet.channel_title);
    let title = clean_title(&item.snippet.title, Some(&item.snippet.channel_title));
    let artwork = item
        .snippet
        .thumbnails
        .best()
        .unwrap_or_default()
        .to_string();

    Some(
        MediaPreview::new(
            title,
            author,
            Platform::Youtube,
            build_watch_url(video_id),
            video_id.to_string(),
        )
        .with_artwork(artwork),
    )
}

/// Promote the top-ranked candidate to the preview itself, carrying the whole
/// candidate list along. Zero results is a hard failure.
pub(crate) fn assemble_search_preview(
    candidates: Vec<MediaPreview>,
    encoded_query: &str,
) -> Result<MediaPreview> {
    let Some(top) = candidates.first() else {
        let query = urlencoding::decode(encoded_query)
            .map(|q| q.into_owned())
            .unwrap_or_else(|_| encoded_query.to_string());
        return Err(TunegrabError::NoSearchResults(query));
    };

    let mut preview = top.clone();
    preview.alternates = candidates;
    Ok(preview)
}
