use crate::model::{BodyEncoding, FieldValue};
use crate::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};


/// Form fields in insertion order. Setting an existing key replaces its
/// value in place.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `a=1&b=x`. Keys and values go out verbatim, no percent-encoding.
    pub fn to_form(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// An empty set of fields always encodes to an empty body, even as JSON.
    pub fn encode(&self, encoding: BodyEncoding) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Ok(vec![]);
        }
        match encoding {
            BodyEncoding::Form => Ok(self.to_form().into_bytes()),
            BodyEncoding::Json => self.to_json(),
        }
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The transient body state of a session. It is consumed by the next request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Payload {
    pub fields: Fields,
    pub raw: Option<Vec<u8>>,
}

impl Payload {
    pub fn set_raw<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.raw = Some(serde_json::to_vec(value)?);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.raw.as_ref().map_or(true, Vec::is_empty)
    }

    /// A non-empty raw body wins over the fields.
    pub fn into_body(self, encoding: BodyEncoding) -> Result<Vec<u8>> {
        match self.raw {
            Some(raw) if !raw.is_empty() => Ok(raw),
            _ => self.fields.encode(encoding),
        }
    }

    /// Fields go onto the query string in form encoding. The raw body is
    /// dropped.
    pub fn into_query(self, target: &str) -> String {
        append_query(target, &self.fields.to_form())
    }
}

pub fn append_query(target: &str, query: &str) -> String {
    if query.is_empty() {
        return target.to_string();
    }
    let separator = if !target.contains('?') {
        "?"
    } else if target.ends_with('?') || target.ends_with('&') {
        ""
    } else {
        "&"
    };
    format!("{}{}{}", target, separator, query)
}
