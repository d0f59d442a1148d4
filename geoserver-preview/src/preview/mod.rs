// ABOUTME: Interactive map preview state machine and its supporting pieces
// ABOUTME: Pure message-in, effect-out core driven by the terminal runtime

pub mod fetcher;
pub mod keymap;
pub mod runtime;
pub mod snapshot;
pub mod styles;
pub mod view;
pub mod viewport;

use crate::image_protocols::{FrameRenderer, Protocol};
use crossterm::event::KeyEvent;
use geoserver_sdk::{BoundingBox, LayerMetadata};

pub use fetcher::{FetchRequest, FetchResult};
pub use keymap::Command;
pub use styles::StyleSelection;
pub use viewport::Viewport;

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum PreviewMessage {
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    Tick,
    MetadataLoaded(Result<LayerMetadata, String>),
    FetchCompleted(FetchResult),
    /// The terminal stopped delivering input
    InputClosed,
}

/// Work the runtime performs on the state machine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchRequest),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    Ready,
    Error(String),
    Closed,
}

/// What the preview starts from.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub workspace: String,
    pub layer: String,
    pub zoom: f64,
    /// Caller-supplied extent; wins over the server's
    pub bounds: Option<BoundingBox>,
    /// Caller-supplied styles; win over the server's
    pub styles: Vec<String>,
    /// Wait for layer metadata before the first fetch
    pub load_metadata: bool,
}

pub struct MapPreview {
    workspace: String,
    layer: String,
    viewport: Viewport,
    styles: StyleSelection,
    explicit_bounds: bool,
    explicit_styles: bool,
    awaiting_metadata: bool,
    state: PreviewState,
    image: Option<Vec<u8>>,
    frame: Option<String>,
    renderer: FrameRenderer,
    cols: u16,
    rows: u16,
    spinner_frame: usize,
    on_close: Option<Box<dyn FnOnce() + Send>>,
}

impl MapPreview {
    pub fn new(options: PreviewOptions, renderer: FrameRenderer, cols: u16, rows: u16) -> Self {
        let viewport = Viewport::from_bounds(
            options.bounds.unwrap_or(BoundingBox::WORLD),
            options.zoom,
        );

        Self {
            workspace: options.workspace,
            layer: options.layer,
            viewport,
            explicit_bounds: options.bounds.is_some(),
            explicit_styles: !options.styles.is_empty(),
            styles: StyleSelection::new(options.styles),
            awaiting_metadata: options.load_metadata,
            state: PreviewState::Loading,
            image: None,
            frame: None,
            renderer,
            cols,
            rows,
            spinner_frame: 0,
            on_close: None,
        }
    }

    /// Register a callback run once when the preview closes.
    pub fn set_on_close(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    /// First effect after construction. When metadata is pending the first
    /// fetch waits for `MetadataLoaded` instead.
    pub fn start(&mut self) -> Option<Effect> {
        if self.awaiting_metadata {
            None
        } else {
            Some(self.begin_fetch())
        }
    }

    pub fn awaiting_metadata(&self) -> bool {
        self.awaiting_metadata
    }

    pub fn update(&mut self, msg: PreviewMessage) -> Option<Effect> {
        if self.state == PreviewState::Closed {
            return None;
        }

        match msg {
            PreviewMessage::Key(key) => {
                let command = keymap::command_for(&key)?;
                self.handle_command(command)
            }
            PreviewMessage::Resize { cols, rows } => {
                self.cols = cols;
                self.rows = rows;
                if let Some(image) = &self.image {
                    self.frame = Some(self.renderer.render(image, cols, rows));
                }
                None
            }
            PreviewMessage::Tick => {
                if self.state == PreviewState::Loading {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
                None
            }
            PreviewMessage::MetadataLoaded(metadata) => self.apply_metadata(metadata),
            PreviewMessage::FetchCompleted(result) => {
                self.apply_result(result);
                None
            }
            PreviewMessage::InputClosed => self.handle_command(Command::Close),
        }
    }

    pub fn handle_command(&mut self, command: Command) -> Option<Effect> {
        match command {
            Command::Close => {
                self.state = PreviewState::Closed;
                self.frame = None;
                self.image = None;
                if let Some(callback) = self.on_close.take() {
                    callback();
                }
                return Some(Effect::Close);
            }
            Command::ZoomIn => {
                self.viewport.zoom_in();
            }
            Command::ZoomOut => {
                self.viewport.zoom_out();
            }
            Command::PanUp => self.viewport.pan_up(),
            Command::PanDown => self.viewport.pan_down(),
            Command::PanLeft => self.viewport.pan_left(),
            Command::PanRight => self.viewport.pan_right(),
            Command::Refresh => {}
            Command::NextStyle => {
                self.styles.next();
            }
            Command::PrevStyle => {
                self.styles.prev();
            }
        }

        Some(self.begin_fetch())
    }

    fn apply_metadata(&mut self, metadata: Result<LayerMetadata, String>) -> Option<Effect> {
        if !self.awaiting_metadata {
            log::debug!("Ignoring layer metadata that arrived after the first fetch");
            return None;
        }
        self.awaiting_metadata = false;

        match metadata {
            Ok(metadata) => {
                if let Some(bounds) = metadata.bounds.filter(|_| !self.explicit_bounds) {
                    self.viewport
                        .set_bounds(bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y);
                }
                if !self.explicit_styles && !metadata.styles.is_empty() {
                    self.styles.set_styles(metadata.styles);
                }
            }
            Err(e) => {
                log::warn!(
                    "Layer metadata for {}:{} unavailable, using defaults: {}",
                    self.workspace,
                    self.layer,
                    e
                );
            }
        }

        Some(self.begin_fetch())
    }

    /// Clear the displayed frame and issue a fetch for the current view.
    fn begin_fetch(&mut self) -> Effect {
        self.state = PreviewState::Loading;
        self.frame = None;
        self.image = None;

        let request = self.current_request();
        log::debug!(
            "Fetching {} bbox={} style={:?}",
            request.qualified_layer(),
            request.bbox,
            request.style
        );
        Effect::Fetch(request)
    }

    /// The request a fetch issued now would carry.
    pub fn current_request(&self) -> FetchRequest {
        fetcher::build_request(
            &self.workspace,
            &self.layer,
            &self.viewport,
            self.styles.current(),
            self.cols,
            self.rows,
        )
    }

    /// A result is current when it was issued for the view and style on screen now.
    fn is_current(&self, request: &FetchRequest) -> bool {
        request.bbox == self.viewport.bbox() && request.style.as_deref() == self.styles.current()
    }

    fn apply_result(&mut self, result: FetchResult) {
        if !self.is_current(&result.request) {
            log::debug!("Discarding stale result for bbox={}", result.request.bbox);
            return;
        }

        match result.outcome {
            Ok(bytes) => {
                self.frame = Some(self.renderer.render(&bytes, self.cols, self.rows));
                self.image = Some(bytes);
                self.state = PreviewState::Ready;
            }
            Err(message) => {
                self.frame = None;
                self.image = None;
                self.state = PreviewState::Error(message);
            }
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == PreviewState::Closed
    }

    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn styles(&self) -> &StyleSelection {
        &self.styles
    }

    pub fn protocol(&self) -> Protocol {
        self.renderer.protocol()
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn qualified_layer(&self) -> String {
        format!("{}:{}", self.workspace, self.layer)
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }
}
