//! # httpc
//!
//! httpc is a small, session-style HTTP client built on top of reqwest. You fill
//! a [`Session`] with form fields, headers, a cookie and a proxy, fire a
//! single `GET` or `POST`, and get the response body back as text.
//!
//! ## Usage
//!
//! ```no_run
//! use httpc::{BodyEncoding, Session};
//!
//! # fn main() -> httpc::Result<()> {
//! let mut session = Session::new();
//! session.set_body_encoding(BodyEncoding::Json);
//! session.set_header("X-Auth-Token", "SuperSecretToken");
//! session.add_form_field("id", 42);
//!
//! let body = session.post("http://httpbin.org/post")?;
//! println!("{}", body);
//! println!("cookies: {}", session.received_cookies());
//! # Ok(())
//! # }
//! ```
//!
//! ### Bodies
//!
//! Fields added with [`Session::add_form_field`] are sent as
//! `key=value&key=value` (nothing is escaped) or as one JSON object, depending
//! on the [`BodyEncoding`]. A value given to [`Session::set_raw_body`] is
//! serialized to JSON immediately and wins over the fields.
//!
//! Fields and raw body belong to the *next* request only. Once a request has
//! been prepared they are gone, so a second `post` without new fields sends no
//! body at all.
//!
//! A `GET` never has a body. With [`Session::set_query_from_fields`] its
//! fields are appended to the query string instead:
//!
//! ```text,no_run
//! GET http://example.com/search?lang=en&q=rust&page=2
//! ```
//!
//! ### Compression
//!
//! [`Session::set_gzip_request_encoding`] gzips non-empty request bodies and
//! adds `Content-Encoding: gzip`. Responses are gunzipped according to the
//! session's [`ResponseDecoding`] policy. A body that fails to gunzip is
//! returned as is unless the session is strict.
//!
//! ### Cookies
//!
//! Every `Set-Cookie` in every response is appended to
//! [`Session::received_cookies`] as `name=value`, separated by `; `. The
//! string is never reset during the life of the session. Outgoing cookies are
//! set with [`Session::set_cookie`].
//!
//! ### Configuration
//!
//! [`ClientConfig`] holds timeout (30 seconds by default), proxy and the
//! encoding options and can be loaded from JSON with
//! [`ClientConfig::from_json`]. A proxy given as `host:port` is treated as
//! `http://host:port`. Without a proxy, system proxy settings are ignored.

pub mod compression;
pub mod config;
mod error;
pub mod http_client;
pub mod model;
pub mod payload;
pub mod session;

pub use crate::compression::ResponseDecoding;
pub use crate::config::ClientConfig;
pub use crate::error::{Error, Result};
pub use crate::model::{BodyEncoding, FieldValue, Method, Request, Response};
pub use crate::session::Session;
