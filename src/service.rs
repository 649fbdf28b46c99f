use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::classify::classify;
use crate::config::Config;
use crate::core::{AudioFormat, EmbeddedTags, MediaPreview, Platform};
use crate::download::{get_raw, post_json_raw};
use crate::error::{Result, TunegrabError};
use crate::normalize::{UNTITLED, clean_title};
use crate::session::{DownloadSession, DownloadState, ProgressTicker};
use crate::tags::read_embedded_tags;

const TITLE_HINT_HEADER: &str = "x-song-title";
const ARTIST_HINT_HEADER: &str = "x-song-artist";

/// Initiation request body
#[derive(Debug, Serialize)]
struct InitiateRequest<'a> {
    url: &'a str,
    format: &'a str,
    metadata: RequestMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct RequestMetadata<'a> {
    artist: &'a str,
    title: &'a str,
}

/// Decomposed initiation response. The shared endpoint answers with binary
/// audio, a collection-ready status, or an error, and only the content type
/// and payload tell them apart, so interpretation works on this plain struct.
#[derive(Debug, Default)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub disposition: Option<String>,
    pub title_hint: Option<String>,
    pub artist_hint: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug)]
pub(crate) enum InitiateOutcome {
    Audio {
        body: Vec<u8>,
        disposition: Option<String>,
        title_hint: Option<String>,
        artist_hint: Option<String>,
    },
    CollectionReady {
        collection_id: Option<String>,
        name: Option<String>,
    },
}

/// Client for the remote download service, driving the multi-step protocol
/// for one item or a whole collection.
pub struct DownloadClient {
    api_base: String,
    token: Option<String>,
}

impl DownloadClient {
    pub fn new(cfg: &Config) -> Self {
        Self {
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            token: cfg.auth_token.clone(),
        }
    }

    fn initiate_url(&self) -> String {
        format!("{}/api/download", self.api_base)
    }

    fn archive_url(&self, collection_id: &str) -> String {
        format!("{}/api/download/playlist/{}", self.api_base, collection_id)
    }

    fn auth_headers(token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        Ok(headers)
    }

    /// Drive a download to completion, populating the session.
    ///
    /// An already-complete session short-circuits without touching the network
    /// (the artifact is replayed by `save`); a session mid-download is a
    /// re-entrant no-op. Every failure stops the progress ticker, moves the
    /// session to `Failed` and clears any partial artifact.
    pub async fn download(
        &self,
        preview: &MediaPreview,
        format: AudioFormat,
        session: &mut DownloadSession,
    ) -> Result<()> {
        match session.state {
            DownloadState::Complete => {
                info!("session already complete, skipping network");
                return Ok(());
            }
            DownloadState::Downloading => return Ok(()),
            DownloadState::Idle | DownloadState::Failed => {}
        }

        let Some(token) = self.token.clone() else {
            session.fail();
            return Err(TunegrabError::AuthRequired);
        };

        session.reset();
        session.state = DownloadState::Downloading;
        let ticker = ProgressTicker::start(session.progress_handle());

        match self.run(preview, format, &token).await {
            Ok((artifact, filename, tags)) => {
                ticker.finish();
                session.complete(artifact, filename, tags);
                Ok(())
            }
            Err(e) => {
                ticker.cancel();
                session.fail();
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        preview: &MediaPreview,
        format: AudioFormat,
        token: &str,
    ) -> Result<(Vec<u8>, String, Option<EmbeddedTags>)> {
        let request = InitiateRequest {
            url: &preview.url,
            format: format.as_request_value(),
            metadata: RequestMetadata {
                artist: &preview.author,
                title: &preview.title,
            },
        };

        info!("initiating download for {}", preview.url);
        let response =
            post_json_raw(&self.initiate_url(), &request, Self::auth_headers(token)?).await?;
        let raw = decompose(response).await?;

        match interpret_initiate(raw)? {
            InitiateOutcome::Audio {
                body,
                disposition,
                title_hint,
                artist_hint,
            } => Ok(finish_audio(
                preview,
                format,
                body,
                disposition,
                title_hint,
                artist_hint,
            )),
            InitiateOutcome::CollectionReady {
                collection_id,
                name,
            } => self.fetch_archive(preview, collection_id, name, token).await,
        }
    }

    /// Collections arrive as a secondary archive resource
    async fn fetch_archive(
        &self,
        preview: &MediaPreview,
        collection_id: Option<String>,
        name: Option<String>,
        token: &str,
    ) -> Result<(Vec<u8>, String, Option<EmbeddedTags>)> {
        let collection_id = collection_id
            .or_else(|| classify(&preview.url).and_then(|d| d.collection_id))
            .or_else(|| preview.is_collection.then(|| preview.id.clone()))
            .ok_or_else(|| {
                TunegrabError::RemoteFailure("collection identifier missing from response".into())
            })?;

        info!("fetching archive for collection {}", collection_id);
        let response = get_raw(
            &self.archive_url(&collection_id),
            Self::auth_headers(token)?,
        )
        .await?;
        let status = response.status();
        let body = response.bytes().await.map_err(TunegrabError::from)?.to_vec();

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("error"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    format!("archive endpoint returned HTTP {}", status.as_u16())
                });
            return Err(TunegrabError::RemoteFailure(message));
        }
        if body.is_empty() {
            return Err(TunegrabError::EmptyArtifact);
        }

        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                if looks_generic(&preview.title) {
                    "playlist".to_string()
                } else {
                    preview.title.clone()
                }
            });

        Ok((body, safe_filename(&format!("{}.zip", name)), None))
    }
}

/// Write a completed session's artifact into `dir`. Idempotent: saving the
/// same session again rewrites the same file without re-fetching anything.
pub fn save(session: &DownloadSession, dir: &Path) -> Result<PathBuf> {
    let (Some(artifact), Some(filename)) = (session.artifact.as_ref(), session.filename.as_ref())
    else {
        return Err(TunegrabError::SaveFailure(
            "no completed download to save".into(),
        ));
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, artifact)?;
    info!("saved {}", path.display());
    Ok(path)
}

/// Pull the fields interpretation needs out of a live response
async fn decompose(response: reqwest::Response) -> Result<RawResponse> {
    let status = response.status().as_u16();
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(CONTENT_TYPE.as_str());
    let disposition = header(CONTENT_DISPOSITION.as_str());
    let title_hint = header(TITLE_HINT_HEADER);
    let artist_hint = header(ARTIST_HINT_HEADER);
    let body = response.bytes().await.map_err(TunegrabError::from)?.to_vec();

    Ok(RawResponse {
        status,
        content_type,
        disposition,
        title_hint,
        artist_hint,
        body,
    })
}

/// Sort the shared initiation endpoint's answer into one of its outcomes
pub(crate) fn interpret_initiate(raw: RawResponse) -> Result<InitiateOutcome> {
    if raw.status == 429 {
        return Err(TunegrabError::RateLimited);
    }

    let content_type = raw
        .content_type
        .as_deref()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if content_type.starts_with("audio/") || content_type == "application/octet-stream" {
        if raw.body.is_empty() {
            return Err(TunegrabError::EmptyArtifact);
        }
        return Ok(InitiateOutcome::Audio {
            body: raw.body,
            disposition: raw.disposition,
            title_hint: raw.title_hint,
            artist_hint: raw.artist_hint,
        });
    }

    if content_type == "application/json" || content_type.ends_with("+json") {
        return interpret_json(&raw);
    }

    if !(200..300).contains(&raw.status) {
        return Err(TunegrabError::RemoteFailure(format!(
            "download service returned HTTP {}",
            raw.status
        )));
    }

    Err(TunegrabError::UnexpectedResponse(if content_type.is_empty() {
        "missing content type".to_string()
    } else {
        content_type
    }))
}

fn interpret_json(raw: &RawResponse) -> Result<InitiateOutcome> {
    let value: Value = serde_json::from_slice(&raw.body).map_err(|_| {
        TunegrabError::RemoteFailure("malformed status response from download service".into())
    })?;
    let message = value.get("message").and_then(Value::as_str);

    // The video platform signals a finished collection only through its
    // success phrasing, with no numeric identifier, so check that first
    if let Some(m) = message
        && is_collection_ready_message(m)
    {
        return Ok(InitiateOutcome::CollectionReady {
            collection_id: json_field_string(&value, "playlist_id"),
            name: extract_quoted_name(m),
        });
    }

    if let Some(collection_id) = json_field_string(&value, "playlist_id") {
        return Ok(InitiateOutcome::CollectionReady {
            collection_id: Some(collection_id),
            name: message.and_then(extract_quoted_name),
        });
    }

    if let Some(detail) = value
        .get("detail")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
    {
        return Err(TunegrabError::RemoteFailure(detail.to_string()));
    }

    if !(200..300).contains(&raw.status) {
        return Err(TunegrabError::RemoteFailure(
            message
                .map(str::to_string)
                .unwrap_or_else(|| format!("download service returned HTTP {}", raw.status)),
        ));
    }

    warn!("unrecognized status payload: {}", value);
    Err(TunegrabError::UnexpectedResponse(
        "unrecognized status payload".to_string(),
    ))
}

fn json_field_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_collection_ready_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("playlist")
        && ["success", "downloaded", "ready", "created", "zipped"]
            .iter()
            .any(|marker| lower.contains(marker))
}

/// Human-readable collection name quoted inside a status message
fn extract_quoted_name(message: &str) -> Option<String> {
    let re = Regex::new(r#"["']([^"']+)["']"#).unwrap();
    re.captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Compute the artifact and final filename for a single-item download
fn finish_audio(
    preview: &MediaPreview,
    format: AudioFormat,
    body: Vec<u8>,
    disposition: Option<String>,
    title_hint: Option<String>,
    artist_hint: Option<String>,
) -> (Vec<u8>, String, Option<EmbeddedTags>) {
    let tags = if format == AudioFormat::Mp3 {
        let tags = read_embedded_tags(&body);
        (!tags.is_empty()).then_some(tags)
    } else {
        None
    };

    let mut title = preview.title.clone();
    if looks_generic(&title) {
        // Weak upstream metadata, prefer what the artifact itself says
        if let Some(better) = tags
            .as_ref()
            .and_then(|t| t.title.clone())
            .or(title_hint)
        {
            title = better;
        }
    }

    let author = tags
        .as_ref()
        .and_then(|t| t.artist.clone())
        .or(artist_hint)
        .unwrap_or_else(|| preview.author.clone());
    if preview.platform == Platform::Youtube {
        title = clean_title(&title, Some(&author));
    }

    let filename = if !looks_generic(&title) {
        format!("{}{}", title, format.extension())
    } else if let Some(name) = disposition.as_deref().and_then(disposition_filename) {
        name
    } else {
        format!(
            "tunegrab-{}{}",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
            format.extension()
        )
    };

    (body, safe_filename(&filename), tags)
}

/// Placeholder titles that should never become a filename
pub(crate) fn looks_generic(title: &str) -> bool {
    let title = title.trim();
    title.is_empty()
        || title.eq_ignore_ascii_case(UNTITLED)
        || title.eq_ignore_ascii_case("track")
        || title.eq_ignore_ascii_case("playlist")
        || title.eq_ignore_ascii_case("audio")
}

fn disposition_filename(header: &str) -> Option<String> {
    let re = Regex::new(r#"filename\s*=\s*"?([^";]+)"?"#).unwrap();
    re.captures(header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Remove filesystem-illegal characters from a computed filename
pub fn safe_filename(name: &str) -> String {
    const ILLEGAL: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];
    let stripped: String = name.chars().filter(|c| !ILLEGAL.contains(c)).collect();
    sanitize_filename::sanitize(stripped.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Platform;

    fn preview(title: &str, url: &str, is_collection: bool) -> MediaPreview {
        let mut p = MediaPreview::new(
            title.to_string(),
            "Artist".to_string(),
            Platform::Youtube,
            url.to_string(),
            "dQw4w9WgXcQ".to_string(),
        );
        p.is_collection = is_collection;
        p
    }

    fn json_response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn rate_limit_is_distinct_from_generic_failure() {
        let limited = interpret_initiate(RawResponse {
            status: 429,
            ..Default::default()
        })
        .unwrap_err();
        let generic = interpret_initiate(RawResponse {
            status: 500,
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(limited, TunegrabError::RateLimited));
        assert!(matches!(generic, TunegrabError::RemoteFailure(_)));
        assert_ne!(limited.to_string(), generic.to_string());
    }

    #[test]
    fn audio_body_becomes_artifact() {
        let outcome = interpret_initiate(RawResponse {
            status: 200,
            content_type: Some("audio/mpeg".to_string()),
            body: vec![0xFF, 0xFB, 1, 2, 3],
            ..Default::default()
        })
        .unwrap();

        match outcome {
            InitiateOutcome::Audio { body, .. } => assert_eq!(body.len(), 5),
            other => panic!("expected audio outcome, got {other:?}"),
        }
    }

    #[test]
    fn empty_audio_body_fails() {
        let err = interpret_initiate(RawResponse {
            status: 200,
            content_type: Some("audio/mpeg".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, TunegrabError::EmptyArtifact));
    }

    #[test]
    fn json_error_detail_is_surfaced() {
        let err =
            interpret_initiate(json_response(400, r#"{"detail": "video is private"}"#)).unwrap_err();
        assert!(matches!(err, TunegrabError::RemoteFailure(m) if m == "video is private"));
    }

    #[test]
    fn video_platform_success_phrasing_signals_collection() {
        let outcome = interpret_initiate(json_response(
            200,
            r#"{"message": "Playlist 'Chill Mix' downloaded successfully"}"#,
        ))
        .unwrap();

        match outcome {
            InitiateOutcome::CollectionReady {
                collection_id,
                name,
            } => {
                assert_eq!(collection_id, None);
                assert_eq!(name.as_deref(), Some("Chill Mix"));
            }
            other => panic!("expected collection outcome, got {other:?}"),
        }
    }

    #[test]
    fn explicit_playlist_id_signals_collection() {
        let outcome = interpret_initiate(json_response(
            200,
            r#"{"message": "queued", "playlist_id": 42}"#,
        ))
        .unwrap();

        match outcome {
            InitiateOutcome::CollectionReady { collection_id, .. } => {
                assert_eq!(collection_id.as_deref(), Some("42"));
            }
            other => panic!("expected collection outcome, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_content_type_fails() {
        let err = interpret_initiate(RawResponse {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: b"<html></html>".to_vec(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, TunegrabError::UnexpectedResponse(ct) if ct == "text/html"));
    }

    #[test]
    fn malformed_json_fails() {
        let err = interpret_initiate(json_response(200, "{not json")).unwrap_err();
        assert!(matches!(err, TunegrabError::RemoteFailure(_)));
    }

    #[test]
    fn filename_prefers_clean_preview_title() {
        let (_, filename, _) = finish_audio(
            &preview("Never Gonna Give You Up", "https://example", false),
            AudioFormat::Mp3,
            vec![1, 2, 3],
            None,
            None,
            None,
        );
        assert_eq!(filename, "Never Gonna Give You Up.mp3");
    }

    #[test]
    fn generic_title_falls_back_to_disposition() {
        let (_, filename, _) = finish_audio(
            &preview("Untitled Track", "https://example", false),
            AudioFormat::Mp3,
            vec![1, 2, 3],
            Some(r#"attachment; filename="Server Name.mp3""#.to_string()),
            None,
            None,
        );
        assert_eq!(filename, "Server Name.mp3");
    }

    #[test]
    fn generic_title_without_disposition_gets_dated_name() {
        let (_, filename, _) = finish_audio(
            &preview("", "https://example", false),
            AudioFormat::Mp3,
            vec![1, 2, 3],
            None,
            None,
            None,
        );
        assert!(filename.starts_with("tunegrab-"));
        assert!(filename.ends_with(".mp3"));
    }

    #[test]
    fn title_hint_rescues_generic_title() {
        let (_, filename, _) = finish_audio(
            &preview("Track", "https://example", false),
            AudioFormat::M4A,
            vec![1, 2, 3],
            None,
            Some("Hinted Song".to_string()),
            Some("Hinted Artist".to_string()),
        );
        assert_eq!(filename, "Hinted Song.m4a");
    }

    #[test]
    fn sanitized_filenames_contain_no_illegal_characters() {
        let dirty = r#"AC/DC: Back?<In>Black %100* "live" |mix|\"#;
        let cleaned = safe_filename(dirty);
        for c in ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'] {
            assert!(!cleaned.contains(c), "{cleaned:?} still contains {c:?}");
        }
        assert!(!cleaned.is_empty());
    }

    #[test]
    fn quoted_name_extraction() {
        assert_eq!(
            extract_quoted_name("Playlist 'My Mix' downloaded successfully").as_deref(),
            Some("My Mix")
        );
        assert_eq!(
            extract_quoted_name(r#"Playlist "Other" ready"#).as_deref(),
            Some("Other")
        );
        assert_eq!(extract_quoted_name("no quotes here"), None);
    }

    #[test]
    fn generic_titles_detected() {
        assert!(looks_generic(""));
        assert!(looks_generic("  "));
        assert!(looks_generic("Untitled Track"));
        assert!(looks_generic("track"));
        assert!(looks_generic("Playlist"));
        assert!(!looks_generic("Never Gonna Give You Up"));
    }

    #[tokio::test]
    async fn complete_session_short_circuits_without_network() {
        // Unroutable base: any network attempt would error out
        let cfg = Config {
            api_base: "http://127.0.0.1:1".to_string(),
            youtube_api_key: None,
            auth_token: None,
        };
        let client = DownloadClient::new(&cfg);

        let mut session = DownloadSession::new();
        session.complete(vec![9, 9, 9], "done.mp3".to_string(), None);

        client
            .download(
                &preview("Done", "https://example", false),
                AudioFormat::Mp3,
                &mut session,
            )
            .await
            .unwrap();
        assert_eq!(session.state, DownloadState::Complete);

        let dir = tempfile::tempdir().unwrap();
        let path = save(&session, dir.path()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![9, 9, 9]);

        // Saving again re-triggers nothing and succeeds
        let again = save(&session, dir.path()).unwrap();
        assert_eq!(again, path);
    }

    #[tokio::test]
    async fn missing_token_is_terminal_auth_failure() {
        let cfg = Config {
            api_base: "http://127.0.0.1:1".to_string(),
            youtube_api_key: None,
            auth_token: None,
        };
        let client = DownloadClient::new(&cfg);

        let mut session = DownloadSession::new();
        let err = client
            .download(
                &preview("Song", "https://example", false),
                AudioFormat::Mp3,
                &mut session,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TunegrabError::AuthRequired));
        assert_eq!(session.state, DownloadState::Failed);
        assert!(session.artifact.is_none());
    }

    #[tokio::test]
    async fn downloading_session_is_reentrant_noop() {
        let cfg = Config {
            api_base: "http://127.0.0.1:1".to_string(),
            youtube_api_key: None,
            auth_token: Some("t".to_string()),
        };
        let client = DownloadClient::new(&cfg);

        let mut session = DownloadSession::new();
        session.state = DownloadState::Downloading;

        client
            .download(
                &preview("Song", "https://example", false),
                AudioFormat::Mp3,
                &mut session,
            )
            .await
            .unwrap();
        assert_eq!(session.state, DownloadState::Downloading);
    }

    #[test]
    fn save_without_artifact_fails() {
        let session = DownloadSession::new();
        let dir = tempfile::tempdir().unwrap();
        let err = save(&session, dir.path()).unwrap_err();
        assert!(matches!(err, TunegrabError::SaveFailure(_)));
    }
}
