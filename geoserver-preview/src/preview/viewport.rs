// ABOUTME: Geographic viewport with zoom, pan, and world-edge clamping
// ABOUTME: Pure math over center, zoom level, and the derived bounding box

use crate::constants::viewport::{
    DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, PAN_FRACTION, WORLD_HEIGHT, WORLD_WIDTH, ZOOM_STEP,
};
use geoserver_sdk::BoundingBox;

/// Current view of the map. The bounding box is always derived from the
/// center and zoom; it is never assigned on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center_lon: f64,
    center_lat: f64,
    zoom: f64,
    bbox: BoundingBox,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_ZOOM)
    }
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64) -> Self {
        let mut viewport = Self {
            center_lon,
            center_lat,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            bbox: BoundingBox::WORLD,
        };
        viewport.recompute_bbox();
        viewport
    }

    /// Viewport centered on `bounds` at the given zoom.
    pub fn from_bounds(bounds: BoundingBox, zoom: f64) -> Self {
        let (lon, lat) = bounds.center();
        Self::new(lon, lat, zoom)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_lon, self.center_lat)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Returns false when already at the maximum zoom.
    pub fn zoom_in(&mut self) -> bool {
        if self.zoom >= MAX_ZOOM {
            return false;
        }
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
        self.recompute_bbox();
        true
    }

    /// Returns false when already at the minimum zoom.
    pub fn zoom_out(&mut self) -> bool {
        if self.zoom <= MIN_ZOOM {
            return false;
        }
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
        self.recompute_bbox();
        true
    }

    pub fn pan_up(&mut self) {
        self.center_lat += self.bbox.height() * PAN_FRACTION;
        self.recompute_bbox();
    }

    pub fn pan_down(&mut self) {
        self.center_lat -= self.bbox.height() * PAN_FRACTION;
        self.recompute_bbox();
    }

    pub fn pan_left(&mut self) {
        self.center_lon -= self.bbox.width() * PAN_FRACTION;
        self.recompute_bbox();
    }

    pub fn pan_right(&mut self) {
        self.center_lon += self.bbox.width() * PAN_FRACTION;
        self.recompute_bbox();
    }

    /// Re-center on the midpoint of a layer's native extent.
    pub fn set_bounds(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        self.center_lon = (min_x + max_x) / 2.0;
        self.center_lat = (min_y + max_y) / 2.0;
        self.recompute_bbox();
    }

    fn recompute_bbox(&mut self) {
        // Clamping shifts the window only; the center stays where it was set.
        self.bbox = bbox_for(self.center_lon, self.center_lat, self.zoom);
    }
}

/// Extent of the window at `zoom` around the center, shifted back inside the
/// world. Longitude is clamped before latitude; each edge check shifts the
/// whole window so its size is preserved.
pub fn bbox_for(center_lon: f64, center_lat: f64, zoom: f64) -> BoundingBox {
    let scale = 1.0 / 2f64.powf(zoom);
    let width = WORLD_WIDTH * scale;
    let height = WORLD_HEIGHT * scale;

    let half_w = WORLD_WIDTH / 2.0;
    let half_h = WORLD_HEIGHT / 2.0;

    let mut min_x = center_lon - width / 2.0;
    let mut max_x = center_lon + width / 2.0;
    let mut min_y = center_lat - height / 2.0;
    let mut max_y = center_lat + height / 2.0;

    if min_x < -half_w {
        min_x = -half_w;
        max_x = min_x + width;
    }
    if max_x > half_w {
        max_x = half_w;
        min_x = max_x - width;
    }
    if min_y < -half_h {
        min_y = -half_h;
        max_y = min_y + height;
    }
    if max_y > half_h {
        max_y = half_h;
        min_y = max_y - height;
    }

    BoundingBox::new(min_x, min_y, max_x, max_y)
}
