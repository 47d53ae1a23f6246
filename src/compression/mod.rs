use crate::model::Response;
use crate::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Deserialize;
use std::io::{Read, Write};


/// Which response header decides whether the body gets gunzipped.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseDecoding {
    /// `Content-Encoding: gzip`
    ContentEncoding,
    /// `Accept-Encoding: gzip` on the response. Older servers of this client
    /// signalled compressed bodies this way.
    AcceptEncoding,
    Disabled,
}

impl Default for ResponseDecoding {
    fn default() -> Self {
        ResponseDecoding::ContentEncoding
    }
}

impl ResponseDecoding {
    pub fn wants_gunzip(&self, response: &Response) -> bool {
        let header = match self {
            ResponseDecoding::ContentEncoding => "Content-Encoding",
            ResponseDecoding::AcceptEncoding => "Accept-Encoding",
            ResponseDecoding::Disabled => return false,
        };
        response
            .header(header)
            .map_or(false, |value| value.contains("gzip"))
    }
}

pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(Error::Compress)?;
    encoder.finish().map_err(Error::Compress)
}

pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(Error::Decompress)?;
    Ok(decoded)
}

/// Applies `policy` to the response body. When `strict` is off a body that
/// fails to gunzip comes back untouched.
pub fn decode_body(policy: ResponseDecoding, strict: bool, response: Response) -> Result<Vec<u8>> {
    if !policy.wants_gunzip(&response) {
        return Ok(response.body);
    }
    match gunzip(&response.body) {
        Ok(decoded) => Ok(decoded),
        Err(err) if !strict => {
            log::warn!("returning raw response body: {}", err);
            Ok(response.body)
        }
        Err(err) => Err(err),
    }
}
