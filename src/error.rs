use thiserror::Error;

#[derive(Error, Debug)]
pub enum TunegrabError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    #[error("HTTP error {status} for URL: {url}")]
    Http { status: u16, url: String },

    #[error("Unrecognized link or search input: {0}")]
    InvalidInput(String),

    #[error("Could not load a preview: {0}")]
    PreviewUnavailable(String),

    #[error("No search API key configured, set TUNEGRAB_YOUTUBE_API_KEY")]
    ApiKeyMissing,

    #[error("No results found for \"{0}\"")]
    NoSearchResults(String),

    #[error("Sign in before downloading")]
    AuthRequired,

    #[error("You are downloading too fast, please wait a moment and try again")]
    RateLimited,

    #[error("Download failed: {0}")]
    RemoteFailure(String),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    #[error("The server returned an empty file")]
    EmptyArtifact,

    #[error("Could not save the file: {0}")]
    SaveFailure(String),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TunegrabError>;
