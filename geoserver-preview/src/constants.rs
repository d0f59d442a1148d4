// ABOUTME: Centralized constants for the GeoServer map preview
// ABOUTME: Contains viewport limits, layout chrome, renderer grids, and helper names

/// Viewport zoom and pan behaviour
pub mod viewport {
    pub const MIN_ZOOM: f64 = 0.0;
    pub const MAX_ZOOM: f64 = 20.0;
    pub const DEFAULT_ZOOM: f64 = 2.0;
    pub const ZOOM_STEP: f64 = 0.5;

    /// Fraction of the visible extent moved per pan
    pub const PAN_FRACTION: f64 = 0.125;

    pub const WORLD_WIDTH: f64 = 360.0;
    pub const WORLD_HEIGHT: f64 = 180.0;
}

/// Pixel size requested from the WMS, derived from the component size
pub mod request {
    /// Approximate pixels per character cell; cells are about twice as tall as wide
    pub const CELL_WIDTH_PX: u32 = 8;
    pub const CELL_HEIGHT_PX: u32 = 16;

    pub const CHROME_COLS: u16 = 20;
    pub const CHROME_ROWS: u16 = 10;

    pub const MIN_WIDTH_PX: u32 = 256;
    pub const MAX_WIDTH_PX: u32 = 1024;
    pub const MIN_HEIGHT_PX: u32 = 192;
    pub const MAX_HEIGHT_PX: u32 = 768;
}

/// Character grid the renderer draws into
pub mod grid {
    /// Columns reserved for padding
    pub const CHROME_COLS: u16 = 4;
    /// Rows reserved for the title bar, control bar, and status line
    pub const CHROME_ROWS: u16 = 8;

    pub const MIN_COLS: u16 = 40;
    pub const MIN_ROWS: u16 = 15;

    pub const HELPER_MAX_COLS: u16 = 120;
    pub const HELPER_MAX_ROWS: u16 = 50;

    pub const ASCII_MAX_COLS: u16 = 100;
    pub const ASCII_MAX_ROWS: u16 = 40;
}

/// Software renderer tuning
pub mod ascii {
    /// Glyphs from sparse (light) to dense (dark)
    pub const RAMP: &[u8] = b" .:-=+*#%@";

    /// Pixels with alpha below this render as blank
    pub const ALPHA_THRESHOLD: u8 = 128;

    pub const DECODE_ERROR: &str = "[Image decode error]";
}

/// External helper executables
pub mod helpers {
    use std::time::Duration;

    pub const SIXEL: &str = "img2sixel";
    pub const CHAFA: &str = "chafa";

    /// A helper still running after this long is killed and its tier skipped
    pub const TIMEOUT: Duration = Duration::from_secs(10);
    pub const EXIT_POLL: Duration = Duration::from_millis(5);
}

/// Environment variables consulted at runtime
pub mod env {
    pub const FORCE_PROTOCOL: &str = "GSPREVIEW_FORCE_PROTOCOL";
    pub const URL: &str = "GEOSERVER_URL";
    pub const USER: &str = "GEOSERVER_USER";
    pub const PASSWORD: &str = "GEOSERVER_PASSWORD";
}

/// Event loop sizing
pub mod event_loop {
    use std::time::Duration;

    pub const MAILBOX_CAPACITY: usize = 64;

    /// Spinner tick interval for smooth animation
    pub const SPINNER_TICK: Duration = Duration::from_millis(80);

    /// How long the input thread blocks in one poll before re-checking shutdown
    pub const INPUT_POLL: Duration = Duration::from_millis(100);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_limits() {
        assert!(viewport::MIN_ZOOM < viewport::DEFAULT_ZOOM);
        assert!(viewport::DEFAULT_ZOOM < viewport::MAX_ZOOM);
        assert_eq!(viewport::ZOOM_STEP, 0.5);
        assert_eq!(viewport::PAN_FRACTION, 0.125);
    }

    #[test]
    fn test_grid_limits() {
        assert!(grid::MIN_COLS < grid::ASCII_MAX_COLS);
        assert!(grid::ASCII_MAX_COLS < grid::HELPER_MAX_COLS);
        assert!(grid::MIN_ROWS < grid::ASCII_MAX_ROWS);
        assert!(grid::ASCII_MAX_ROWS < grid::HELPER_MAX_ROWS);
    }

    #[test]
    fn test_ascii_ramp() {
        assert_eq!(ascii::RAMP.first(), Some(&b' '));
        assert_eq!(ascii::RAMP.last(), Some(&b'@'));
        assert_eq!(ascii::RAMP.len(), 10);
    }
}
