//! The search adapter: query the endpoint, enrich, and build display results.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::locale::{Locale, LocaleSource};
use crate::{
    PLUGIN_NAME,
    candidate::{Candidate, CandidateField},
    config::SearchConfig,
    error::{Result, SearchError},
    feature::DisplayResult,
    geometry::Reprojector,
    transport::{ReqwestTransport, Transport},
};

/// Suggestions are only looked up from this many characters on.
pub const MIN_SUGGEST_LEN: usize = 4;

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<Candidate>,
}

/// Translates free-text queries into display-ready results.
///
/// At most one primary request is outstanding per adapter: every call to
/// [`search`](Self::search) or [`suggest`](Self::suggest) cancels the previous
/// one, which then resolves to [`SearchError::Cancelled`].
pub struct SearchAdapter {
    config: SearchConfig,
    base_url: Url,
    reprojector: Reprojector,
    host: Arc<dyn LocaleSource>,
    transport: Arc<dyn Transport>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl fmt::Debug for SearchAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchAdapter")
            .field("base_url", &self.base_url.as_str())
            .field("reprojector", &self.reprojector)
            .field("in_flight", &self.in_flight.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl SearchAdapter {
    /// Create an adapter talking to the configured endpoint over HTTP.
    pub fn new(host: Arc<dyn LocaleSource>, config: SearchConfig) -> Result<Self> {
        Self::with_transport(host, config, Arc::new(ReqwestTransport::default()))
    }

    pub fn with_transport(
        host: Arc<dyn LocaleSource>,
        config: SearchConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let base_url = config.base_url()?;
        let reprojector = Reprojector::from_config(&config)?;
        info!(url = %base_url, source_epsg = reprojector.source_epsg(), "Search adapter created");

        Ok(Self {
            config,
            base_url,
            reprojector,
            host,
            transport,
            in_flight: Mutex::new(None),
        })
    }

    pub const fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn locale(&self) -> Locale {
        Locale::from_host(&self.host.locale())
    }

    /// The endpoint URL for `query`: `p=<locale>,<params>,<query>`.
    pub fn query_url(&self, query: &str) -> Url {
        let p = format!("{},{},{query}", self.locale(), self.config.params);
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.query_pairs_mut().append_pair("p", &p);
        url
    }

    /// Search for `query` and build one display result per usable candidate,
    /// in response order.
    ///
    /// Only the empty string is rejected. Whitespace is passed through to the
    /// endpoint unchanged.
    #[instrument(name = "Search", level = "info", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<DisplayResult>> {
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let url = self.query_url(query);
        let token = self.begin_request();

        let candidates = self.fetch_candidates(&url, &token).await?;

        // join_all keeps input order regardless of completion order
        let enriched = join_all(candidates.into_iter().map(|c| self.enrich(c))).await;

        if token.is_cancelled() {
            debug!("Search superseded while enriching candidates");
            return Err(SearchError::Cancelled);
        }

        let results: Vec<DisplayResult> = enriched
            .into_iter()
            .filter_map(|candidate| {
                let label = candidate.text().map(|text| text.into_owned());
                match DisplayResult::from_candidate(candidate, &self.config, &self.reprojector) {
                    Ok(result) => Some(result),
                    Err(e) => {
                        warn!(candidate = ?label, error = %e, "Dropping candidate with unusable geometry");
                        None
                    }
                }
            })
            .collect();

        info!(results = results.len(), "Search completed");
        Ok(results)
    }

    /// Plain text labels of matching candidates. Candidates without a
    /// non-empty `text` are skipped.
    ///
    /// Queries shorter than [`MIN_SUGGEST_LEN`] characters return nothing
    /// without touching the network.
    #[instrument(name = "Suggest", level = "debug", skip(self))]
    pub async fn suggest(&self, query: &str) -> Result<Vec<String>> {
        if query.chars().count() < MIN_SUGGEST_LEN {
            return Ok(Vec::new());
        }
        let url = self.query_url(query);
        let token = self.begin_request();

        let candidates = self.fetch_candidates(&url, &token).await?;
        Ok(candidates
            .iter()
            .filter_map(|candidate| candidate.get_non_empty(CandidateField::Text))
            .map(|text| text.into_owned())
            .collect())
    }

    /// Cancel the outstanding request, if any.
    pub fn abort(&self) {
        if let Some(token) = self.in_flight.lock().take() {
            debug!("Aborting outstanding search request");
            token.cancel();
        }
    }

    /// Abort and release the adapter.
    pub fn destroy(self) {
        self.abort();
        info!("Search adapter destroyed");
    }

    /// Install a fresh token, cancelling the one it replaces.
    fn begin_request(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    async fn fetch_candidates(&self, url: &Url, token: &CancellationToken) -> Result<Vec<Candidate>> {
        debug!(%url, "Querying search endpoint");
        let body = tokio::select! {
            biased;
            () = token.cancelled() => return Err(SearchError::Cancelled),
            body = self.transport.get_json(url) => body?,
        };

        let response: SearchResponse = serde_json::from_value(body)?;
        let total = response.data.len();
        let candidates: Vec<Candidate> = response
            .data
            .into_iter()
            .filter(Candidate::has_geometry)
            .collect();
        debug!(total, usable = candidates.len(), "Decoded candidates");
        Ok(candidates)
    }

    /// Merge the first feature's properties from the candidate's own lookup
    /// URL. Failures leave the candidate untouched.
    async fn enrich(&self, mut candidate: Candidate) -> Candidate {
        let parsed = candidate.feature_url().map(Url::parse);
        let url = match parsed {
            None => return candidate,
            Some(Ok(url)) => url,
            Some(Err(e)) => {
                warn!(candidate = ?candidate.text(), error = %e, "Invalid feature URL on candidate");
                return candidate;
            }
        };

        match self.fetch_feature_properties(&url).await {
            Ok(Some(properties)) => {
                debug!(%url, fields = properties.len(), "Merging feature properties");
                candidate.merge_properties(properties);
            }
            Ok(None) => debug!(%url, "Feature lookup returned no properties"),
            Err(e) => {
                warn!(%url, candidate = ?candidate.text(), error = %e, "Failed to fetch feature properties for candidate");
            }
        }
        candidate
    }

    async fn fetch_feature_properties(&self, url: &Url) -> Result<Option<Map<String, Value>>> {
        let body = self.transport.get_json(url).await?;
        Ok(first_feature_properties(body))
    }
}

fn first_feature_properties(mut body: Value) -> Option<Map<String, Value>> {
    match body
        .get_mut("features")?
        .get_mut(0)?
        .get_mut("properties")?
        .take()
    {
        Value::Object(properties) => Some(properties),
        _ => None,
    }
}
