//! Base URL resolution for the job board API.

/// Variable holding an explicit API base URL.
///
/// Read at compile time for wasm builds and at runtime for native builds.
pub const API_URL_VAR: &str = "JOBBOARD_API_URL";

/// Port the API listens on when it shares a host with the page.
pub const DEFAULT_API_PORT: u16 = 8000;

/// Prefix of every versioned endpoint.
const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Use an explicit base URL such as `https://jobs.example.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Explicit configuration if present, otherwise the page's host on the
    /// default API port.
    pub fn from_env() -> Self {
        match configured_url() {
            Some(url) => {
                tracing::debug!("Using configured API base URL: {}", url);
                Self::new(url)
            }
            None => Self::new(default_base_url()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path under `/api/v1`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// `{protocol}//{hostname}:{port}`, accepting protocols with or without
/// the trailing colon that `window.location.protocol` carries.
pub fn origin_with_port(protocol: &str, hostname: &str, port: u16) -> String {
    let scheme = protocol.trim_end_matches(':');
    let scheme = if scheme.is_empty() { "http" } else { scheme };
    format!("{scheme}://{hostname}:{port}")
}

fn configured_url() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    let value = option_env!("JOBBOARD_API_URL").map(str::to_string);

    #[cfg(not(target_arch = "wasm32"))]
    let value = std::env::var(API_URL_VAR).ok();

    value.filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn default_base_url() -> String {
    let location = web_sys::window().map(|w| w.location());
    let protocol = location
        .as_ref()
        .and_then(|l| l.protocol().ok())
        .unwrap_or_else(|| "http:".to_string());
    let hostname = location
        .as_ref()
        .and_then(|l| l.hostname().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    origin_with_port(&protocol, &hostname, DEFAULT_API_PORT)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_base_url() -> String {
    origin_with_port("http", "localhost", DEFAULT_API_PORT)
}
