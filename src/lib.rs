pub mod classify;
pub mod config;
pub mod core;
mod download;
pub mod error;
pub mod normalize;
pub mod preview;
pub mod service;
pub mod session;
pub mod spotify;
pub mod tags;
pub mod youtube;

pub use classify::classify;
pub use config::Config;
pub use core::{AudioFormat, EmbeddedTags, MediaDescriptor, MediaPreview, Platform};
pub use error::{Result, TunegrabError};
pub use preview::resolve_preview;
pub use service::{DownloadClient, save};
pub use session::{DownloadSession, DownloadState};
pub use spotify::SpotifySource;
pub use youtube::YoutubeSource;

/// Classify raw input and resolve its preview in one step
pub async fn preview_input(cfg: &Config, input: &str) -> Result<MediaPreview> {
    let descriptor = classify::classify(input)
        .ok_or_else(|| TunegrabError::InvalidInput(input.trim().to_string()))?;
    preview::resolve_preview(cfg, &descriptor).await
}
