use crate::compression::ResponseDecoding;
use crate::model::BodyEncoding;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::time::Duration;


pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Session level settings. Everything here outlives a single request.
///
/// Can be read from JSON, every key is optional:
///
/// ```json
/// {
///     "timeout": 10,
///     "proxy": "127.0.0.1:8888",
///     "gzip_request": true,
///     "body_encoding": "json",
///     "response_decoding": "accept-encoding",
///     "strict": false,
///     "query_from_fields": true,
///     "headers": { "User-Agent": "httpc" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(deserialize_with = "seconds")]
    pub timeout: Duration,
    #[serde(deserialize_with = "proxy")]
    pub proxy: Option<String>,
    pub gzip_request: bool,
    pub body_encoding: BodyEncoding,
    pub response_decoding: ResponseDecoding,
    pub strict: bool,
    pub query_from_fields: bool,
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
            gzip_request: false,
            body_encoding: BodyEncoding::default(),
            response_decoding: ResponseDecoding::default(),
            strict: false,
            query_from_fields: false,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// `127.0.0.1:8888` becomes `http://127.0.0.1:8888`, anything that already
/// names a scheme is kept as is.
pub fn normalize_proxy(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    Ok(Duration::from_secs(u64::deserialize(deserializer)?))
}

fn proxy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let proxy: Option<String> = Option::deserialize(deserializer)?;
    Ok(proxy
        .filter(|proxy| !proxy.is_empty())
        .map(|proxy| normalize_proxy(&proxy)))
}
