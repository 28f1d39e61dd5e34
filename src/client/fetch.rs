//! The transport seam between [`crate::FmiClient`] and the network.

use crate::client::error::TransportError;
use crate::client::query::FmiQuery;
use log::{info, warn};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Retrieves raw FMI responses. Implemented over HTTP by [`HttpFetcher`]; tests
/// and offline tooling can serve canned payloads instead.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// A JSON body (`timeseries` service).
    async fn get_json(&self, query: &FmiQuery) -> Result<Value, TransportError>;

    /// A raw body (`wfs` service).
    async fn get_bytes(&self, query: &FmiQuery) -> Result<Vec<u8>, TransportError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build().map_err(TransportError::ClientBuild)?,
        })
    }

    /// Sends the request and turns non-success statuses into errors. The URL is
    /// stripped from every reqwest error since it contains the API key.
    async fn send(&self, query: &FmiQuery) -> Result<Response, TransportError> {
        let endpoint = query.label();
        info!("Requesting {}", endpoint);

        let response = self
            .client
            .get(query.url().clone())
            .send()
            .await
            .map_err(|e| TransportError::NetworkRequest(endpoint.clone(), e.without_url()))?;

        match response.error_for_status() {
            Ok(resp) => Ok(resp),
            Err(e) => {
                warn!("HTTP error for {}: {:?}", endpoint, e.status());
                Err(match e.status() {
                    Some(status) => TransportError::HttpStatus {
                        endpoint,
                        status,
                        source: e.without_url(),
                    },
                    None => TransportError::NetworkRequest(endpoint, e.without_url()),
                })
            }
        }
    }
}

impl Fetch for HttpFetcher {
    async fn get_json(&self, query: &FmiQuery) -> Result<Value, TransportError> {
        self.send(query)
            .await?
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(query.label(), e.without_url()))
    }

    async fn get_bytes(&self, query: &FmiQuery) -> Result<Vec<u8>, TransportError> {
        let bytes = self
            .send(query)
            .await?
            .bytes()
            .await
            .map_err(|e| TransportError::Decode(query.label(), e.without_url()))?;
        Ok(bytes.to_vec())
    }
}
