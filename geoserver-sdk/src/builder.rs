// ABOUTME: Builder pattern implementation for GeoServerClient configuration
// ABOUTME: Provides type-safe configuration with compile-time required fields

use crate::GeoServerClient;
use crate::error::GeoServerError;
use secrecy::SecretString;
use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = Result<GeoServerClient, GeoServerError>))]
pub struct GeoServerClientConfig {
    /// Server root, e.g. `http://localhost:8080/geoserver`
    #[builder(setter(into))]
    pub base_url: String,

    #[builder(setter(into))]
    pub username: String,

    pub password: SecretString,

    #[builder(default = crate::constants::timeouts::HTTP_REQUEST_TIMEOUT)]
    pub timeout: Duration,

    #[builder(default = None)]
    pub proxy: Option<reqwest::Proxy>,
}

impl From<GeoServerClientConfig> for Result<GeoServerClient, GeoServerError> {
    fn from(config: GeoServerClientConfig) -> Self {
        GeoServerClient::from_config(config)
    }
}

impl GeoServerClient {
    pub fn builder() -> GeoServerClientConfigBuilder<((), (), (), (), ())> {
        GeoServerClientConfig::builder()
    }

    pub fn create_proxy(url: &str) -> Result<reqwest::Proxy, GeoServerError> {
        let parsed_url = Url::parse(url)
            .map_err(|e| GeoServerError::Configuration(format!("Invalid proxy URL: {}", e)))?;

        reqwest::Proxy::all(parsed_url.as_str()).map_err(|e| {
            GeoServerError::Configuration(format!("Invalid proxy configuration: {}", e))
        })
    }
}

/// Parse and normalise a server root: http(s) only, no trailing slash.
pub(crate) fn normalize_base_url(raw: &str) -> Result<String, GeoServerError> {
    let parsed = Url::parse(raw.trim())?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(GeoServerError::Configuration(format!(
                "Unsupported URL scheme '{}': expected http or https",
                other
            )));
        }
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn password() -> SecretString {
        SecretString::new("geoserver".to_string().into_boxed_str())
    }

    #[test]
    fn test_builder_with_minimal_config() {
        let client_result = GeoServerClient::builder()
            .base_url("http://localhost:8080/geoserver")
            .username("admin")
            .password(password())
            .build();

        assert!(client_result.is_ok());
    }

    #[test]
    fn test_builder_with_all_options() {
        let client_result = GeoServerClient::builder()
            .base_url("https://maps.example.com/geoserver/")
            .username("admin")
            .password(password())
            .timeout(Duration::from_secs(5))
            .proxy(Some(GeoServerClient::create_proxy("http://proxy:8080").unwrap()))
            .build();

        let client = client_result.unwrap();
        assert_eq!(client.base_url(), "https://maps.example.com/geoserver");
    }

    #[test]
    fn test_builder_rejects_bad_base_url() {
        let result = GeoServerClient::builder()
            .base_url("not a url")
            .username("admin")
            .password(password())
            .build();

        assert!(matches!(result, Err(GeoServerError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let result = GeoServerClient::builder()
            .base_url("ftp://maps.example.com")
            .username("admin")
            .password(password())
            .build();

        match result {
            Err(GeoServerError::Configuration(msg)) => assert!(msg.contains("ftp")),
            _ => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_config_uses_secrecy_for_password() {
        let config = GeoServerClientConfig {
            base_url: "http://localhost".to_string(),
            username: "admin".to_string(),
            password: password(),
            timeout: Duration::from_secs(30),
            proxy: None,
        };

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("geoserver\""));
        assert!(debug_str.contains("admin"));
    }

    #[test]
    fn test_builder_validates_proxy_url() {
        let result = GeoServerClient::create_proxy("not-a-url");

        match result {
            Err(GeoServerError::Configuration(msg)) => {
                assert!(msg.contains("Invalid proxy URL"));
            }
            _ => panic!("Expected configuration error"),
        }
    }
}
