use crate::{ClientConfig, Request, Response, Result};


pub mod reqwest;

/// Sends one fully prepared request. The config supplies the transport
/// settings (timeout and proxy) for that call only.
pub trait HttpClient {
    fn execute(&self, config: &ClientConfig, request: &Request) -> Result<Response>;
}
