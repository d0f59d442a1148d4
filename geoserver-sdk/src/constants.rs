// ABOUTME: Centralized constants for the GeoServer SDK
// ABOUTME: Contains timeouts, WMS request parameters, and REST paths

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for HTTP requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Fixed WMS GetMap parameters
pub mod wms {
    pub const SERVICE: &str = "WMS";
    pub const VERSION: &str = "1.1.1";
    pub const REQUEST: &str = "GetMap";
    pub const FORMAT: &str = "image/png";
    pub const SRS: &str = "EPSG:4326";
}

/// REST API paths relative to the server base URL
pub mod rest {
    pub const PREFIX: &str = "/rest";
    pub const LAYERS: &str = "/rest/layers";
}

pub const USER_AGENT: &str = "gspreview/0.1.0";

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_constants() {
        assert_eq!(timeouts::HTTP_REQUEST_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_wms_constants() {
        assert_eq!(wms::VERSION, "1.1.1");
        assert_eq!(wms::SRS, "EPSG:4326");
        assert!(rest::LAYERS.starts_with(rest::PREFIX));
    }
}
