//! HTTP access used by the adapter.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Result;

/// Issues a GET request and decodes the body as JSON.
pub trait Transport: Send + Sync {
    fn get_json<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Value>>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// A client with a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get_json<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Value>> {
        Box::pin(fetch_json(&self.client, url))
    }
}

async fn fetch_json(client: &Client, url: &Url) -> Result<Value> {
    debug!(%url, "GET");
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    Ok(response.json::<Value>().await?)
}
