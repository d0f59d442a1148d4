// ABOUTME: Issues GetMap and layer metadata calls for the preview
// ABOUTME: Results come back to the event loop as messages on its mailbox

use super::PreviewMessage;
use super::viewport::Viewport;
use crate::image_protocols::scaling::request_pixels;
use geoserver_sdk::{GeoServerClient, GeoServerError, GetMapRequest};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Snapshot of everything one fetch needs, taken when it is issued.
pub type FetchRequest = GetMapRequest;

/// Outcome of one fetch, paired with the request that produced it.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub request: FetchRequest,
    pub outcome: Result<Vec<u8>, String>,
}

/// Build the request for the current view of `workspace:layer` on a
/// component of `cols`×`rows` cells.
pub fn build_request(
    workspace: &str,
    layer: &str,
    viewport: &Viewport,
    style: Option<&str>,
    cols: u16,
    rows: u16,
) -> FetchRequest {
    let (width, height) = request_pixels(cols, rows);
    GetMapRequest {
        workspace: workspace.to_string(),
        layer: layer.to_string(),
        style: style.map(str::to_string),
        width,
        height,
        bbox: viewport.bbox(),
    }
}

/// Perform one fetch. Errors become the message shown to the user.
pub async fn fetch(client: &GeoServerClient, request: FetchRequest) -> FetchResult {
    let outcome = fetch_map(client, &request).await.map_err(|e| e.to_string());
    FetchResult { request, outcome }
}

/// Perform one fetch, keeping the typed error.
pub async fn fetch_map(
    client: &GeoServerClient,
    request: &FetchRequest,
) -> Result<Vec<u8>, GeoServerError> {
    client.get_map(request).await.inspect_err(|e| {
        log::warn!(
            "GetMap for {} failed (retryable: {}): {}",
            request.qualified_layer(),
            e.is_retryable(),
            e
        );
    })
}

/// Run `fetch` on its own task and post the result to the event loop.
pub fn spawn_fetch(
    client: GeoServerClient,
    request: FetchRequest,
    tx: mpsc::Sender<PreviewMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = fetch(&client, request).await;
        // The loop may already have shut down; nothing left to deliver to
        let _ = tx.send(PreviewMessage::FetchCompleted(result)).await;
    })
}

/// Look up the layer's extent and styles on its own task.
pub fn spawn_metadata(
    client: GeoServerClient,
    workspace: String,
    layer: String,
    tx: mpsc::Sender<PreviewMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let metadata = client
            .layer_metadata(&workspace, &layer)
            .await
            .map_err(|e| e.to_string());
        let _ = tx.send(PreviewMessage::MetadataLoaded(metadata)).await;
    })
}
