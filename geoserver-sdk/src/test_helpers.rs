// ABOUTME: Test helper utilities for mocking GeoServer REST and WMS responses
// ABOUTME: Provides mockito server setup and JSON fixtures for unit tests

#[cfg(test)]
use mockito::{Server, ServerGuard};
#[cfg(test)]
use serde_json::json;

#[cfg(test)]
pub async fn mock_geoserver() -> ServerGuard {
    Server::new_async().await
}

/// Smallest valid PNG: 1x1 transparent pixel.
#[cfg(test)]
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
    0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0x7A, 0x5E, 0xAB, 0x3F, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[cfg(test)]
pub fn mock_service_exception() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.1.1">
  <ServiceException code="LayerNotDefined">Could not find layer demo:nope</ServiceException>
</ServiceExceptionReport>"#
}

#[cfg(test)]
pub fn mock_layer_response(
    resource_href: &str,
    default_style: &str,
    alternates: &[&str],
) -> serde_json::Value {
    let styles: Vec<serde_json::Value> = alternates
        .iter()
        .map(|name| json!({ "name": name, "href": format!("http://gs/rest/styles/{}.json", name) }))
        .collect();

    json!({
        "layer": {
            "name": "roads",
            "type": "VECTOR",
            "defaultStyle": {
                "name": default_style,
                "href": format!("http://gs/rest/styles/{}.json", default_style)
            },
            "styles": {
                "@class": "linked-hash-set",
                "style": styles
            },
            "resource": {
                "@class": "featureType",
                "name": "demo:roads",
                "href": resource_href
            },
            "queryable": true
        }
    })
}

#[cfg(test)]
pub fn mock_feature_type_response(bounds: [f64; 4]) -> serde_json::Value {
    json!({
        "featureType": {
            "name": "roads",
            "nativeName": "roads",
            "srs": "EPSG:4326",
            "latLonBoundingBox": {
                "minx": bounds[0],
                "maxx": bounds[2],
                "miny": bounds[1],
                "maxy": bounds[3],
                "crs": "EPSG:4326"
            },
            "enabled": true
        }
    })
}

#[cfg(test)]
pub fn mock_coverage_response(bounds: [f64; 4]) -> serde_json::Value {
    json!({
        "coverage": {
            "name": "dem",
            "latLonBoundingBox": {
                "minx": bounds[0],
                "maxx": bounds[2],
                "miny": bounds[1],
                "maxy": bounds[3],
                "crs": "EPSG:4326"
            }
        }
    })
}
