// ABOUTME: Sixel render tier backed by img2sixel
// ABOUTME: Streams the PNG on stdin and returns the sixel escape sequence

use super::helper::{HelperRunner, printable_output};
use super::{GridSize, ImageProtocol};
use crate::constants::helpers;
use anyhow::Result;
use std::sync::Arc;

pub struct SixelProtocol {
    runner: Arc<dyn HelperRunner>,
}

impl SixelProtocol {
    pub fn new(runner: Arc<dyn HelperRunner>) -> Self {
        Self { runner }
    }
}

impl ImageProtocol for SixelProtocol {
    fn name(&self) -> &'static str {
        helpers::SIXEL
    }

    /// img2sixel keeps the image's own pixel size; the grid only matters to
    /// the request that produced the image.
    fn render_image(&self, data: &[u8], _grid: GridSize) -> Result<String> {
        let output = self
            .runner
            .run(helpers::SIXEL, &["-".to_string()], Some(data))?;
        printable_output(helpers::SIXEL, output)
    }
}
