// ABOUTME: Terminal-aware sizing for map requests and rendered frames
// ABOUTME: Converts the component's cell size into WMS pixel sizes and renderer grids

use crate::constants::{grid, request};

/// Character-cell grid a renderer draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub cols: u16,
    pub rows: u16,
}

impl GridSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// `WxH` as the helper tools expect it.
    pub fn as_size_arg(&self) -> String {
        format!("{}x{}", self.cols, self.rows)
    }
}

/// Pixel size to request from the WMS for a component of `cols`×`rows` cells.
///
/// Cells are roughly 8×16 pixels, so the request keeps the map's aspect close
/// to what the terminal will show.
pub fn request_pixels(cols: u16, rows: u16) -> (u32, u32) {
    let width = u32::from(cols.saturating_sub(request::CHROME_COLS)) * request::CELL_WIDTH_PX;
    let height = u32::from(rows.saturating_sub(request::CHROME_ROWS)) * request::CELL_HEIGHT_PX;

    (
        width.clamp(request::MIN_WIDTH_PX, request::MAX_WIDTH_PX),
        height.clamp(request::MIN_HEIGHT_PX, request::MAX_HEIGHT_PX),
    )
}

/// Grid handed to the external helpers.
pub fn helper_grid(cols: u16, rows: u16) -> GridSize {
    GridSize::new(
        cols.saturating_sub(grid::CHROME_COLS)
            .clamp(grid::MIN_COLS, grid::HELPER_MAX_COLS),
        rows.saturating_sub(grid::CHROME_ROWS)
            .clamp(grid::MIN_ROWS, grid::HELPER_MAX_ROWS),
    )
}

/// Grid for the software renderer, kept smaller than the helper grid.
pub fn ascii_grid(cols: u16, rows: u16) -> GridSize {
    GridSize::new(
        cols.saturating_sub(grid::CHROME_COLS)
            .clamp(grid::MIN_COLS, grid::ASCII_MAX_COLS),
        rows.saturating_sub(grid::CHROME_ROWS)
            .clamp(grid::MIN_ROWS, grid::ASCII_MAX_ROWS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_pixels_typical_terminal() {
        assert_eq!(request_pixels(120, 40), (800, 480));
    }

    #[test]
    fn test_request_pixels_clamped() {
        assert_eq!(request_pixels(0, 0), (256, 192));
        assert_eq!(request_pixels(10, 5), (256, 192));
        assert_eq!(request_pixels(400, 200), (1024, 768));
    }

    #[test]
    fn test_helper_grid() {
        assert_eq!(helper_grid(100, 40), GridSize::new(96, 32));
        assert_eq!(helper_grid(20, 10), GridSize::new(40, 15));
        assert_eq!(helper_grid(300, 100), GridSize::new(120, 50));
    }

    #[test]
    fn test_ascii_grid_is_capped_lower() {
        assert_eq!(ascii_grid(300, 100), GridSize::new(100, 40));
        assert_eq!(ascii_grid(80, 24), GridSize::new(76, 16));
    }

    #[test]
    fn test_size_arg() {
        assert_eq!(GridSize::new(76, 16).as_size_arg(), "76x16");
    }
}
