/// Validate if a string is a valid YouTube video ID (11 characters, alphanumeric + - and _)
pub fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11 && id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Construct YouTube watch URL from video ID
pub fn build_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Construct YouTube playlist URL from playlist ID
pub fn build_playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

/// High-resolution thumbnail URL for a video ID
pub fn build_thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Lower-resolution thumbnail URL, always available when the video exists
pub fn build_fallback_thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)
}

/// Embeddable-metadata endpoint for a canonical watch or playlist URL
pub fn build_oembed_url(target: &str) -> String {
    format!(
        "https://www.youtube.com/oembed?url={}&format=json",
        urlencoding::encode(target)
    )
}

/// Recover a member video ID from a thumbnail URL like ".../vi/<id>/hqdefault.jpg"
pub fn video_id_from_thumbnail(thumbnail_url: &str) -> Option<String> {
    let re = regex::Regex::new(r"/vi(?:_webp)?/([A-Za-z0-9_-]{11})/").unwrap();
    re.captures(thumbnail_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_validation() {
        assert!(is_valid_video_id("dQw4w9WgXcQ"));
        assert!(is_valid_video_id("a-b_c123456"));
        assert!(!is_valid_video_id("short"));
        assert!(!is_valid_video_id("exactly12ch."));
    }

    #[test]
    fn member_id_recovered_from_thumbnail() {
        assert_eq!(
            video_id_from_thumbnail("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            video_id_from_thumbnail("https://i.ytimg.com/vi_webp/dQw4w9WgXcQ/sddefault.webp")
                .as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(video_id_from_thumbnail("https://example.com/art.jpg"), None);
    }

    #[test]
    fn oembed_url_percent_encodes_target() {
        let url = build_oembed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert!(url.starts_with("https://www.youtube.com/oembed?url=https%3A%2F%2F"));
        assert!(url.ends_with("&format=json"));
    }
}
