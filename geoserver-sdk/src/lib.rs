// ABOUTME: GeoServer SDK providing an authenticated client for WMS and REST calls
// ABOUTME: Fetches rendered GetMap images and the layer metadata a preview starts from

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

pub mod builder;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod wms;

#[cfg(test)]
mod test_helpers;

pub use builder::GeoServerClientConfig;
pub use error::GeoServerError;
pub use metadata::LayerMetadata;
pub use wms::{BoundingBox, GetMapRequest};

pub type Result<T> = std::result::Result<T, GeoServerError>;

#[derive(Clone)]
pub struct GeoServerClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeoServerClient {
    pub fn from_config(config: GeoServerClientConfig) -> Result<Self> {
        let base_url = builder::normalize_base_url(&config.base_url)?;

        let credentials = format!(
            "{}:{}",
            config.username,
            config.password.expose_secret()
        );
        let mut auth_value =
            HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
                .map_err(|e| GeoServerError::Configuration(format!("Invalid credentials: {}", e)))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);

        if let Some(proxy) = config.proxy {
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| GeoServerError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GetMap call and return the PNG body.
    ///
    /// Non-2xx responses carry the response text in the error. GeoServer reports
    /// many WMS failures as an XML service exception with status 200, so a body
    /// that is not `image/*` is an error too.
    pub async fn get_map(&self, request: &GetMapRequest) -> Result<Vec<u8>> {
        let url = request.to_url(&self.base_url);
        log::debug!("GetMap {} bbox={} style={:?}", request.qualified_layer(), request.bbox, request.style);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoServerError::from_status(
                status.as_u16(),
                body.trim().to_string(),
                &format!("Layer {}", request.qualified_layer()),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        if !content_type.starts_with("image/") {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoServerError::InvalidResponse(format!(
                "expected an image but got {}: {}",
                content_type,
                body.trim()
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Look up the lat/lon extent and style names for `workspace:layer`.
    ///
    /// A missing or unreadable resource document only drops the bounds; the
    /// style list from the layer document is still returned.
    pub async fn layer_metadata(&self, workspace: &str, layer: &str) -> Result<LayerMetadata> {
        let qualified = format!("{}:{}", workspace, layer);
        let layer_url = format!(
            "{}{}/{}.json",
            self.base_url,
            constants::rest::LAYERS,
            qualified
        );

        let envelope: metadata::LayerEnvelope = self
            .get_json(&layer_url, &format!("Layer {}", qualified))
            .await?;
        let styles = envelope.style_names();

        let bounds = match envelope.resource_href() {
            Some(href) => {
                let resource_url = self.resolve_href(href);
                match self
                    .get_json::<metadata::ResourceEnvelope>(&resource_url, "Layer resource")
                    .await
                {
                    Ok(resource) => resource.bounds(),
                    Err(e) => {
                        log::warn!("Could not read extent for {}: {}", qualified, e);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(LayerMetadata { bounds, styles })
    }

    fn resolve_href(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoServerError::from_status(
                status.as_u16(),
                body.trim().to_string(),
                what,
            ));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
