use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Method {
    Get,
    Post,
    Delete,
    Put,
    Patch,
    Options,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match *self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        };
        f.write_str(method)
    }
}

/// How accumulated fields are turned into a request body.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// `key=value&key=value`, nothing escaped
    Form,
    /// a single JSON object
    Json,
}

impl Default for BodyEncoding {
    fn default() -> Self {
        BodyEncoding::Form
    }
}

/// A single form field value.
///
/// Form encoding uses the `Display` text of the value and JSON encoding
/// writes it as the matching JSON scalar.
#[derive(PartialEq, Debug, Clone)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(value) => f.write_str(value),
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::Float(value) => write_float(f, *value),
            FieldValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

/// Shortest round-trip digits. Outside a decimal exponent of `-4..6` the value
/// is written as `1.5e+06`, with a signed exponent of at least two digits.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "+Inf" } else { "-Inf" });
    }
    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if value != 0.0 && !(-4..6).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }
    write!(f, "{}", value)
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(value) => serializer.serialize_str(value),
            FieldValue::Int(value) => serializer.serialize_i64(*value),
            FieldValue::Float(value) => serializer.serialize_f64(*value),
            FieldValue::Bool(value) => serializer.serialize_bool(*value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A fully resolved request, ready to hand to an [`HttpClient`](crate::http_client::HttpClient).
///
/// Headers are already merged from the session and any gzip handling of
/// the body has already happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
