// ABOUTME: One-shot rendering of a layer's initial view without a terminal UI
// ABOUTME: Drives the same state machine as the interactive preview to a single frame

use super::fetcher::{self, FetchResult};
use super::{Effect, MapPreview, PreviewMessage, PreviewState};
use anyhow::{Result, anyhow};
use geoserver_sdk::GeoServerClient;

/// Load metadata if the preview wants it, fetch the first view, and return
/// the rendered frame. A failed fetch returns the client's error unchanged.
pub async fn snapshot(client: &GeoServerClient, mut preview: MapPreview) -> Result<String> {
    let mut effect = preview.start();

    if preview.awaiting_metadata() {
        let metadata = client
            .layer_metadata(preview.workspace(), preview.layer())
            .await
            .map_err(|e| e.to_string());
        effect = preview.update(PreviewMessage::MetadataLoaded(metadata));
    }

    let Some(Effect::Fetch(request)) = effect else {
        return Err(anyhow!("Preview did not request a map"));
    };

    let bytes = fetcher::fetch_map(client, &request).await?;
    preview.update(PreviewMessage::FetchCompleted(FetchResult {
        request,
        outcome: Ok(bytes),
    }));

    match preview.state() {
        PreviewState::Ready => Ok(preview.frame().unwrap_or_default().to_string()),
        PreviewState::Error(message) => Err(anyhow!("{}", message)),
        other => Err(anyhow!("Preview ended in unexpected state {:?}", other)),
    }
}
