use crate::http_client::HttpClient;
use crate::{ClientConfig, Error, Method, Request, Response, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Builds a fresh reqwest client for every request so that timeout and proxy
/// changes on the session take effect immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestHttpClient;

impl ReqwestHttpClient {
    fn client(config: &ClientConfig) -> Result<Client> {
        let builder = Client::builder().timeout(config.timeout);
        let builder = match &config.proxy {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|source| Error::Proxy {
                    proxy: proxy.clone(),
                    source,
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        builder.build().map_err(Error::Client)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, config: &ClientConfig, request: &Request) -> Result<Response> {
        let Request {
            method,
            target,
            headers,
            body,
        } = request;
        let url = reqwest::Url::parse(target).map_err(|source| Error::InvalidUrl {
            url: target.clone(),
            source,
        })?;

        let client = Self::client(config)?;
        let mut request_builder = client.request(method.into(), url);
        request_builder = set_headers(headers, request_builder)?;
        if let Some(body) = body {
            request_builder = request_builder.body(body.clone());
        }

        log::debug!(
            "{} {} ({} byte body, content-encoding {})",
            method,
            target,
            body.as_ref().map_or(0, Vec::len),
            request.header("Content-Encoding").unwrap_or("identity")
        );
        let response = request_builder
            .send()
            .map_err(|source| Error::Transport {
                method: method.to_string(),
                url: target.clone(),
                source,
            })?;

        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let cookies = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        let body = response.bytes().map_err(|source| Error::Body {
            url: target.clone(),
            source,
        })?;
        log::debug!("{} {} -> {} ({} bytes)", method, target, status_code, body.len());

        Ok(Response {
            status_code,
            headers,
            cookies,
            body: body.to_vec(),
        })
    }
}

/// Later entries replace earlier ones and reqwest's defaults.
fn set_headers(
    headers: &[(String, String)],
    request_builder: RequestBuilder,
) -> Result<RequestBuilder> {
    let mut header_map = HeaderMap::new();
    for (key, value) in headers {
        let invalid = || Error::InvalidHeader { name: key.clone() };
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        log::trace!("{}: {:?}", name, value);
        header_map.insert(name, value);
    }
    Ok(request_builder.headers(header_map))
}

impl From<&Method> for reqwest::Method {
    fn from(method: &Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}
