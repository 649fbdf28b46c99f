use async_trait::async_trait;

use crate::config::Config;
use crate::core::{MediaDescriptor, MediaPreview, Platform};
use crate::error::{Result, TunegrabError};
use crate::spotify::SpotifySource;
use crate::youtube::YoutubeSource;

/// Trait for resolving previews from different platforms
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// Get platform identifier
    fn platform(&self) -> Platform;

    /// Resolve a classified descriptor into a preview
    async fn resolve(&self, cfg: &Config, descriptor: &MediaDescriptor) -> Result<MediaPreview>;
}

static SOURCES: &[&dyn PreviewSource] = &[&YoutubeSource, &SpotifySource];

/// Resolve preview metadata for a classified descriptor (auto-dispatch by platform)
pub async fn resolve_preview(cfg: &Config, descriptor: &MediaDescriptor) -> Result<MediaPreview> {
    for source in SOURCES {
        if source.platform() == descriptor.platform {
            return source.resolve(cfg, descriptor).await;
        }
    }
    Err(TunegrabError::PreviewUnavailable(format!(
        "No preview source for platform: {:?}",
        descriptor.platform
    )))
}
