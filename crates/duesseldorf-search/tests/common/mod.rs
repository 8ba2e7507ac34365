//! Shared test fixtures: an in-memory transport with scripted responses.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use duesseldorf_search::{
    LocaleSource, SearchAdapter, SearchConfig, Transport,
    error::{Result, SearchError},
};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{Value, json};
use url::Url;

struct Route {
    needle: String,
    delay: Duration,
    response: Option<Value>,
}

/// Answers requests whose URL contains a route's needle, first match wins.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, needle: &str, response: Value) -> Self {
        self.delayed_route(needle, Duration::ZERO, response)
    }

    pub fn delayed_route(mut self, needle: &str, delay: Duration, response: Value) -> Self {
        self.routes.push(Route {
            needle: needle.to_owned(),
            delay,
            response: Some(response),
        });
        self
    }

    pub fn failing_route(mut self, needle: &str) -> Self {
        self.routes.push(Route {
            needle: needle.to_owned(),
            delay: Duration::ZERO,
            response: None,
        });
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Transport for MockTransport {
    fn get_json<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.respond(url))
    }
}

impl MockTransport {
    async fn respond(&self, url: &Url) -> Result<Value> {
        self.requests.lock().push(url.to_string());
        let route = self
            .routes
            .iter()
            .find(|route| url.as_str().contains(&route.needle))
            .ok_or_else(|| SearchError::UnexpectedResponse(format!("no route for {url}")))?;

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        route
            .response
            .clone()
            .ok_or_else(|| SearchError::UnexpectedResponse(format!("scripted failure for {url}")))
    }
}

/// Needle matching the primary request for `query` (ASCII queries only).
pub fn search_needle(query: &str) -> String {
    format!("%2C{query}")
}

pub fn adapter(transport: Arc<MockTransport>) -> SearchAdapter {
    adapter_with_locale(transport, Arc::new("de"))
}

pub fn adapter_with_locale(
    transport: Arc<MockTransport>,
    locale: Arc<dyn LocaleSource>,
) -> SearchAdapter {
    let _ = duesseldorf_search::init_logging(tracing::Level::WARN);
    SearchAdapter::with_transport(locale, SearchConfig::default(), transport)
        .expect("Default configuration should be valid")
}

/// A candidate located in Düsseldorf's Altstadt.
pub fn candidate(text: &str) -> Value {
    json!({
        "geom": "POINT(344000 5677000)",
        "text": text,
        "cat": "Adresse",
        "2": "Altstadt",
        "searchId": format!("id-{text}"),
        "score": "1"
    })
}

pub fn response(candidates: Vec<Value>) -> Value {
    json!({ "data": candidates })
}

pub fn feature_collection(properties: Value) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{ "type": "Feature", "properties": properties, "geometry": null }]
    })
}
