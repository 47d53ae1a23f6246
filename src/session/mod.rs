use crate::compression::{self, ResponseDecoding};
use crate::config::normalize_proxy;
use crate::http_client::reqwest::ReqwestHttpClient;
use crate::http_client::HttpClient;
use crate::model::{BodyEncoding, FieldValue, Method, Request};
use crate::payload::Payload;
use crate::{ClientConfig, Result};
use serde::Serialize;
use std::time::Duration;


/// A stateful HTTP client.
///
/// Headers, proxy, timeout and received cookies live for the whole session.
/// Form fields and the raw body are consumed by the next request, whether it
/// succeeds or not.
pub struct Session<C: HttpClient = ReqwestHttpClient> {
    client: C,
    config: ClientConfig,
    headers: Vec<(String, String)>,
    payload: Payload,
    received_cookies: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_client(config, ReqwestHttpClient)
    }
}

impl<C: HttpClient> Session<C> {
    pub fn with_client(mut config: ClientConfig, client: C) -> Self {
        let headers = std::mem::take(&mut config.headers).into_iter().collect();
        Session {
            client,
            config,
            headers,
            payload: Payload::default(),
            received_cookies: String::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    pub fn set_body_encoding(&mut self, encoding: BodyEncoding) {
        self.config.body_encoding = encoding;
    }

    /// Serializes `value` to JSON right away and sends it verbatim on the next
    /// request instead of the form fields.
    pub fn set_raw_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.payload.set_raw(value)
    }

    pub fn add_form_field(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.payload.fields.insert(key, value);
    }

    pub fn set_proxy(&mut self, proxy: &str) {
        self.config.proxy = Some(normalize_proxy(proxy));
    }

    pub fn proxy(&self) -> Option<&str> {
        self.config.proxy.as_deref()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    /// Header names are matched case-sensitively, the last value set wins.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.headers.push((key, value)),
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.set_header("Cookie", cookie);
    }

    pub fn set_referer(&mut self, referer: impl Into<String>) {
        self.set_header("Referer", referer);
    }

    pub fn set_gzip_request_encoding(&mut self, enabled: bool) {
        self.config.gzip_request = enabled;
    }

    pub fn set_query_from_fields(&mut self, enabled: bool) {
        self.config.query_from_fields = enabled;
    }

    pub fn set_response_decoding(&mut self, decoding: ResponseDecoding) {
        self.config.response_decoding = decoding;
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.config.strict = strict;
    }

    /// Every `name=value` pair seen in a `Set-Cookie` header so far, joined
    /// with `"; "`.
    pub fn received_cookies(&self) -> &str {
        &self.received_cookies
    }

    pub fn get(&mut self, url: &str) -> Result<String> {
        self.send(Method::Get, url)
    }

    pub fn post(&mut self, url: &str) -> Result<String> {
        self.send(Method::Post, url)
    }

    pub fn send(&mut self, method: Method, url: &str) -> Result<String> {
        let request = self.prepare(method, url)?;
        self.execute(&request)
    }

    /// Turns the pending payload into a request descriptor. The payload is
    /// consumed even when this fails.
    ///
    /// A GET never carries a body; its fields end up on the query string
    /// when `query_from_fields` is set and are dropped otherwise.
    pub fn prepare(&mut self, method: Method, url: &str) -> Result<Request> {
        let payload = std::mem::take(&mut self.payload);
        let (target, body) = match method {
            Method::Get if self.config.query_from_fields => (payload.into_query(url), vec![]),
            Method::Get => (url.to_string(), vec![]),
            _ => (url.to_string(), payload.into_body(self.config.body_encoding)?),
        };

        let mut headers = vec![];
        let body = if body.is_empty() {
            None
        } else if self.config.gzip_request {
            headers.push(("Content-Encoding".to_string(), "gzip".to_string()));
            Some(compression::gzip(&body)?)
        } else {
            Some(body)
        };
        headers.extend(self.headers.iter().cloned());

        Ok(Request {
            method,
            target,
            headers,
            body,
        })
    }

    /// Sends `request` with this session's transport settings, records any
    /// cookies it gets back and returns the decoded body as text.
    ///
    /// Any payload still pending on the session is discarded, the same as
    /// after `get` or `post`.
    pub fn execute(&mut self, request: &Request) -> Result<String> {
        let pending = std::mem::take(&mut self.payload);
        if !pending.is_empty() {
            log::debug!(
                "discarding pending payload ({} fields) for {} {}",
                pending.fields.len(),
                request.method,
                request.target
            );
        }

        let response = self.client.execute(&self.config, request)?;

        for (name, value) in &response.cookies {
            if !self.received_cookies.is_empty() {
                self.received_cookies.push_str("; ");
            }
            self.received_cookies.push_str(name);
            self.received_cookies.push('=');
            self.received_cookies.push_str(value);
        }
        if !response.cookies.is_empty() {
            log::debug!("received cookies: {}", self.received_cookies);
        }

        let body = compression::decode_body(
            self.config.response_decoding,
            self.config.strict,
            response,
        )?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
