use reqwest::blocking::Client;
use tracing::debug;

use crate::{config::ArxivConfig, error::Result};

/// Outcome of one GET, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: &str, body: &str) -> Self {
        TransportResponse {
            ok: (200..300).contains(&status),
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }
}

/// Performs blocking GET requests for the retriever.
///
/// Only connectivity problems are errors; non-success statuses come back as
/// a [`TransportResponse`] so the caller can inspect the body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ArxivConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(HttpTransport { client })
    }

    pub fn from_client(client: Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        debug!(%url, "GET");
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        Ok(TransportResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            &body,
        ))
    }
}
