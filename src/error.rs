use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid header `{name}`")]
    InvalidHeader { name: String },
    #[error("invalid proxy `{proxy}`: {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not gzip request body: {0}")]
    Compress(#[source] io::Error),
    #[error("could not gunzip response body: {0}")]
    Decompress(#[source] io::Error),
}
