use url::Url;

use crate::core::{MediaDescriptor, Platform};

/// Parse free-form input into a structured descriptor.
///
/// Input without scheme or host markers becomes a search query. Recognized
/// platform URLs become single-item or collection descriptors. Anything else,
/// including malformed URLs, is `None` and should surface as invalid input.
pub fn classify(input: &str) -> Option<MediaDescriptor> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !looks_like_url(trimmed) {
        return Some(MediaDescriptor::search(
            urlencoding::encode(trimmed).into_owned(),
        ));
    }

    // Tolerate scheme-less platform links like "youtube.com/watch?v=..."
    let normalized = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&normalized).ok()?;
    let host = parsed.domain()?;

    if host == "youtu.be" || host.ends_with(".youtu.be") {
        return classify_short_link(&parsed);
    }
    if host == "youtube.com" || host.ends_with(".youtube.com") {
        return classify_youtube(&parsed);
    }
    if host == "spotify.com" || host.ends_with(".spotify.com") {
        return classify_spotify(&parsed);
    }

    None
}

/// Scheme or host markers: an explicit scheme, or a dotted host with no spaces
fn looks_like_url(input: &str) -> bool {
    input.contains("://") || (input.contains('.') && !input.contains(char::is_whitespace))
}

fn classify_short_link(url: &Url) -> Option<MediaDescriptor> {
    let id = url
        .path_segments()?
        .next()
        .filter(|s| !s.is_empty())?
        .to_string();
    Some(MediaDescriptor::single(id, Platform::Youtube))
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn classify_youtube(url: &Url) -> Option<MediaDescriptor> {
    let video_id = query_param(url, "v");
    let list_id = query_param(url, "list");

    if let Some(list) = list_id {
        // Keep a co-present video id so a member thumbnail can be derived
        let id = video_id.unwrap_or_else(|| list.clone());
        return Some(MediaDescriptor::collection(id, list, Platform::Youtube));
    }

    if url.path().starts_with("/playlist") {
        let list = url.path_segments()?.nth(1)?.to_string();
        if list.is_empty() {
            return None;
        }
        return Some(MediaDescriptor::collection(
            list.clone(),
            list,
            Platform::Youtube,
        ));
    }

    let id = video_id?;
    if id.len() != 11 {
        return None;
    }
    Some(MediaDescriptor::single(id, Platform::Youtube))
}

fn classify_spotify(url: &Url) -> Option<MediaDescriptor> {
    let mut segments = url.path_segments()?;
    let kind = segments.next()?;
    let raw_id = segments.next()?;
    // Defensive strip of an embedded query like "id?si=..."
    let id = raw_id.split('?').next().unwrap_or(raw_id).to_string();
    if id.is_empty() {
        return None;
    }

    match kind {
        "track" => Some(MediaDescriptor::single(id, Platform::Spotify)),
        "playlist" => Some(MediaDescriptor::collection(
            id.clone(),
            id,
            Platform::Spotify,
        )),
        _ => None,
    }
}
