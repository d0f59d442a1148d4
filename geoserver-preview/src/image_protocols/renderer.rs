// ABOUTME: Frame renderer that walks a protocol's fallback chain
// ABOUTME: Each failing helper tier is logged and the next one tried, ending in ASCII

use super::scaling::{ascii_grid, helper_grid};
use super::{
    AsciiProtocol, ChafaMode, ChafaProtocol, HelperRunner, ImageProtocol, Protocol, SixelProtocol,
    SystemRunner,
};
use std::sync::Arc;

/// Helper invocation attempted before the ASCII fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperTier {
    ChafaKitty,
    ChafaSymbols,
    Sixel,
    ChafaColor,
}

impl Protocol {
    /// Helper tiers tried for this protocol, in order. ASCII always follows.
    pub fn helper_tiers(self) -> &'static [HelperTier] {
        match self {
            Protocol::Native => &[HelperTier::ChafaKitty, HelperTier::ChafaSymbols],
            Protocol::SixelHelper => &[HelperTier::Sixel],
            Protocol::GeneralHelper => &[HelperTier::ChafaColor],
            Protocol::Ascii => &[],
        }
    }
}

pub struct FrameRenderer {
    protocol: Protocol,
    runner: Arc<dyn HelperRunner>,
}

impl FrameRenderer {
    pub fn new(protocol: Protocol) -> Self {
        Self::with_runner(protocol, Arc::new(SystemRunner))
    }

    pub fn with_runner(protocol: Protocol, runner: Arc<dyn HelperRunner>) -> Self {
        Self { protocol, runner }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn tier(&self, tier: HelperTier) -> Box<dyn ImageProtocol> {
        let runner = Arc::clone(&self.runner);
        match tier {
            HelperTier::ChafaKitty => Box::new(ChafaProtocol::new(ChafaMode::Kitty, runner)),
            HelperTier::ChafaSymbols => Box::new(ChafaProtocol::new(ChafaMode::Symbols, runner)),
            HelperTier::Sixel => Box::new(SixelProtocol::new(runner)),
            HelperTier::ChafaColor => Box::new(ChafaProtocol::new(ChafaMode::Color, runner)),
        }
    }

    /// Render PNG bytes for a component of `cols`×`rows` cells.
    ///
    /// Never fails: the chain ends in the ASCII renderer, which substitutes a
    /// placeholder for undecodable input.
    pub fn render(&self, data: &[u8], cols: u16, rows: u16) -> String {
        for &tier in self.protocol.helper_tiers() {
            let protocol = self.tier(tier);
            match protocol.render_image(data, helper_grid(cols, rows)) {
                Ok(frame) => return frame,
                Err(e) => log::debug!("{} render failed, falling back: {:#}", protocol.name(), e),
            }
        }

        if self.protocol != Protocol::Ascii {
            log::warn!("All {} helpers failed; using ASCII renderer", self.protocol);
        }
        AsciiProtocol.render(data, ascii_grid(cols, rows))
    }
}
