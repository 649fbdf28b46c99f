use std::io::Cursor;

use id3::{Tag, TagLike};
use log::debug;

use crate::core::EmbeddedTags;

/// Inspect a downloaded artifact's ID3 container for title, artist, album and
/// year. Never fails: parse errors and non-MP3 artifacts yield empty tags.
pub fn read_embedded_tags(artifact: &[u8]) -> EmbeddedTags {
    if !looks_like_mp3(artifact) {
        return EmbeddedTags::default();
    }

    match Tag::read_from2(Cursor::new(artifact)) {
        Ok(tag) => EmbeddedTags {
            title: tag.title().map(str::to_string),
            artist: first_artist(&tag),
            album: tag.album().map(str::to_string),
            year: tag.year(),
        },
        Err(e) => {
            debug!("no readable tag container: {}", e);
            EmbeddedTags::default()
        }
    }
}

/// First of possibly several artists
fn first_artist(tag: &Tag) -> Option<String> {
    tag.artists()
        .and_then(|artists| artists.first().map(|a| a.to_string()))
        .or_else(|| tag.artist().map(str::to_string))
}

/// ID3v2 header or a bare MPEG frame sync
fn looks_like_mp3(data: &[u8]) -> bool {
    data.starts_with(b"ID3") || (data.len() > 1 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::Version;

    fn tagged_artifact() -> Vec<u8> {
        let mut tag = Tag::new();
        tag.set_title("Never Gonna Give You Up");
        tag.set_artist("Rick Astley");
        tag.set_album("Whenever You Need Somebody");
        tag.set_year(1987);

        let mut buf = Vec::new();
        tag.write_to(&mut buf, Version::Id3v24).unwrap();
        buf
    }

    #[test]
    fn reads_title_artist_album_year() {
        let tags = read_embedded_tags(&tagged_artifact());
        assert_eq!(tags.title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(tags.artist.as_deref(), Some("Rick Astley"));
        assert_eq!(tags.album.as_deref(), Some("Whenever You Need Somebody"));
        assert_eq!(tags.year, Some(1987));
    }

    #[test]
    fn non_mp3_artifact_yields_empty_tags() {
        assert!(read_embedded_tags(b"PK\x03\x04zipzipzip").is_empty());
        assert!(read_embedded_tags(&[]).is_empty());
    }

    #[test]
    fn truncated_header_yields_empty_tags() {
        // Valid magic, garbage afterwards
        let mut data = b"ID3".to_vec();
        data.extend_from_slice(&[0xFF; 4]);
        assert!(read_embedded_tags(&data).is_empty());
    }
}
