// ABOUTME: Terminal graphics tiers for drawing a rendered map image
// ABOUTME: Detection picks a tier once; the renderer walks its fallback chain per frame

use anyhow::Result;

pub trait ImageProtocol {
    /// Short name shown in the preview and in logs
    fn name(&self) -> &'static str;

    /// Render PNG bytes into a terminal-printable frame sized to `grid`
    fn render_image(&self, data: &[u8], grid: GridSize) -> Result<String>;
}

pub mod ascii;
pub mod chafa;
pub mod detection;
pub mod helper;
pub mod renderer;
pub mod scaling;
pub mod sixel;

pub use ascii::AsciiProtocol;
pub use chafa::{ChafaMode, ChafaProtocol};
pub use detection::{Detection, DetectionEnv, Protocol, SystemEnv};
pub use helper::{HelperRunner, SystemRunner};
pub use renderer::FrameRenderer;
pub use scaling::GridSize;
pub use sixel::SixelProtocol;
