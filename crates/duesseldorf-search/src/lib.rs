//! Düsseldorf Search - geocoding search adapter for a map viewer
//!
//! Queries the municipal search endpoint of Düsseldorf, optionally enriches
//! every hit from the feature service it points to, reprojects the returned
//! WKT geometry into web mercator and formats list titles and info balloons
//! from a configurable field mapping.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use duesseldorf_search::{SearchAdapter, SearchConfig};
//!
//! # async fn run() -> duesseldorf_search::error::Result<()> {
//! let adapter = SearchAdapter::new(Arc::new("de"), SearchConfig::default())?;
//!
//! for result in adapter.search("Rathaus").await? {
//!     println!("{}: {}", result.title, result.feature.balloon().balloon_subtitle);
//! }
//!
//! // cheap lookups while typing
//! let labels = adapter.suggest("Königs").await?;
//! # let _ = labels;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Deployments override the defaults with a partial JSON document; the
//! `balloon` section is merged key by key:
//!
//! ```rust
//! use duesseldorf_search::{CandidateField, SearchConfig};
//!
//! let config = SearchConfig::from_json_str(r#"{"balloon": {"street": "adresse"}}"#)?;
//! assert_eq!(config.balloon.street, Some(CandidateField::Address));
//! assert_eq!(config.balloon.zip, Some(CandidateField::PostalCode));
//! # Ok::<(), duesseldorf_search::error::SearchError>(())
//! ```
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod balloon;
mod candidate;
mod config;
pub mod error;
mod feature;
mod geometry;
mod search;
mod transport;

pub use balloon::{Address, AddressBalloon, BALLOON_KIND, BALLOON_NAME};
pub use candidate::{Candidate, CandidateField};
pub use config::{
    BalloonConfig, BalloonConfigBuilder, BalloonOverrides, PluginConfig, SearchConfig,
    SearchConfigBuilder, SubtitleFields,
};
pub use feature::{DisplayResult, Feature};
pub use geometry::{Reprojector, TARGET_EPSG, web_mercator_to_lon_lat};
pub use search::{Locale, LocaleSource, MIN_SUGGEST_LEN, SearchAdapter};
pub use transport::{ReqwestTransport, Transport};

/// Name under which the adapter registers with the host.
pub const PLUGIN_NAME: &str = "@vcmap/duesseldorf-search";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the search adapter.
///
/// Honours `RUST_LOG` when set and otherwise logs at `level`. HTTP client
/// internals are clamped to `warn`. Only the first call has an effect.
///
/// # Examples
///
/// ```rust
/// use duesseldorf_search::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), duesseldorf_search::error::SearchError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::SearchError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| error::SearchError::ConfigError(e.to_string()))?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        assert!(init_logging(tracing::Level::WARN).is_ok());
        assert!(init_logging(tracing::Level::DEBUG).is_ok());
    }

    #[test]
    fn test_plugin_metadata() {
        assert_eq!(PLUGIN_VERSION, "0.1.0");
        assert!(PLUGIN_NAME.ends_with("duesseldorf-search"));
    }
}
