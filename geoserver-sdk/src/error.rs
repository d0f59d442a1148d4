// ABOUTME: Custom error types for GeoServer SDK with user-friendly messages
// ABOUTME: Maps HTTP, transport, and payload failures into specific variants

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoServerError {
    #[error("Authentication failed{}. Check your GeoServer username and password", server_detail(.body))]
    Auth { body: String },

    #[error("{what} not found{}", server_detail(.body))]
    NotFound { what: String, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: Request took too long to complete")]
    Timeout,

    #[error("WMS error ({status}): {body}")]
    Service { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GeoServerError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            GeoServerError::Auth { .. } => {
                Some("Set GEOSERVER_USER and GEOSERVER_PASSWORD or pass --user")
            }
            GeoServerError::NotFound { .. } => {
                Some("Please check the workspace and layer names (e.g., topp:states)")
            }
            GeoServerError::Network(_) => Some("Check that the GeoServer URL is reachable"),
            GeoServerError::Timeout => Some("Press r to retry or zoom in to request less data"),
            GeoServerError::Configuration(_) => {
                Some("The base URL should look like http://localhost:8080/geoserver")
            }
            _ => None,
        }
    }

    /// Whether a manual refresh is likely to succeed. Nothing retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeoServerError::Network(_) | GeoServerError::Timeout => true,
            GeoServerError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Classify a non-success status together with the body text the server sent.
    pub fn from_status(status: u16, body: String, what: &str) -> Self {
        match status {
            401 | 403 => GeoServerError::Auth { body },
            404 => GeoServerError::NotFound {
                what: what.to_string(),
                body,
            },
            _ => GeoServerError::Service { status, body },
        }
    }
}

/// Server text appended to a message, or nothing when the server sent none.
fn server_detail(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({})", body)
    }
}

impl From<reqwest::Error> for GeoServerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeoServerError::Timeout
        } else if err.is_status() {
            if let Some(status) = err.status() {
                match status.as_u16() {
                    401 | 403 => GeoServerError::Auth {
                        body: String::new(),
                    },
                    code => GeoServerError::Service {
                        status: code,
                        body: err.to_string(),
                    },
                }
            } else {
                GeoServerError::Network(err.to_string())
            }
        } else if err.is_decode() {
            GeoServerError::InvalidResponse(err.to_string())
        } else {
            GeoServerError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GeoServerError {
    fn from(err: serde_json::Error) -> Self {
        GeoServerError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for GeoServerError {
    fn from(err: url::ParseError) -> Self {
        GeoServerError::Configuration(format!("Invalid URL: {}", err))
    }
}
