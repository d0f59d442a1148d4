// ABOUTME: WMS GetMap request model and URL construction
// ABOUTME: Encodes the layer, style, pixel size, and bounding box into a GetMap query

use crate::constants::wms;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded::byte_serialize;

/// Geographic bounding box in EPSG:4326 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub const WORLD: BoundingBox = BoundingBox {
        min_x: -180.0,
        min_y: -90.0,
        max_x: 180.0,
        max_y: 90.0,
    };

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Immutable snapshot of everything one GetMap call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMapRequest {
    pub workspace: String,
    pub layer: String,
    /// `None` asks the server for the layer's default style
    pub style: Option<String>,
    pub width: u32,
    pub height: u32,
    pub bbox: BoundingBox,
}

impl GetMapRequest {
    pub fn qualified_layer(&self) -> String {
        format!("{}:{}", self.workspace, self.layer)
    }

    /// Build the full GetMap URL against `base_url` (trailing slash tolerated).
    pub fn to_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let style = self.style.as_deref().unwrap_or("");

        format!(
            "{}/wms?SERVICE={}&VERSION={}&REQUEST={}&LAYERS={}&STYLES={}&FORMAT={}&TRANSPARENT=true&SRS={}&WIDTH={}&HEIGHT={}&BBOX={}",
            base,
            wms::SERVICE,
            wms::VERSION,
            wms::REQUEST,
            escape(&self.qualified_layer()),
            escape(style),
            escape(wms::FORMAT),
            wms::SRS,
            self.width,
            self.height,
            self.bbox,
        )
    }
}

fn escape(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roads_request(style: Option<&str>) -> GetMapRequest {
        GetMapRequest {
            workspace: "demo".to_string(),
            layer: "roads".to_string(),
            style: style.map(str::to_string),
            width: 800,
            height: 600,
            bbox: BoundingBox::new(-45.0, -22.5, 45.0, 22.5),
        }
    }

    #[test]
    fn test_get_map_url_wire_format() {
        let url = roads_request(None).to_url("http://localhost:8080/geoserver/");
        insta::assert_snapshot!(url, @"http://localhost:8080/geoserver/wms?SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap&LAYERS=demo%3Aroads&STYLES=&FORMAT=image%2Fpng&TRANSPARENT=true&SRS=EPSG:4326&WIDTH=800&HEIGHT=600&BBOX=-45.000000,-22.500000,45.000000,22.500000");
    }

    #[test]
    fn test_style_is_escaped() {
        let url = roads_request(Some("line thick")).to_url("http://gs");
        assert!(url.contains("&STYLES=line+thick&"));
    }

    #[test]
    fn test_bbox_helpers() {
        let bbox = BoundingBox::WORLD;
        assert_eq!(bbox.width(), 360.0);
        assert_eq!(bbox.height(), 180.0);
        assert_eq!(bbox.center(), (0.0, 0.0));
        assert_eq!(bbox.as_array(), [-180.0, -90.0, 180.0, 90.0]);
    }
}
