//! Adapter configuration.
//!
//! [`SearchConfig`] is the fully populated configuration the adapter is built
//! from. Deployments usually only ship the keys they change, as a
//! [`PluginConfig`] document; [`SearchConfig::merged`] lays those over the
//! defaults. Top-level keys replace the default wholesale, the `balloon`
//! section is merged key by key.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::{
    candidate::CandidateField,
    error::{Result, SearchError},
};

pub const DEFAULT_URL: &str = "https://maps.duesseldorf.de/viewer/php/search/search.php?p=";
pub const DEFAULT_EPSG: &str = "EPSG:25832";
pub const DEFAULT_PROJ4: &str =
    "+proj=utm +zone=32 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs";
pub const DEFAULT_PARAMS: &str = "acdipst,25";

/// Fields composing the balloon subtitle.
///
/// Accepts either a single field name or an ordered list in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubtitleFields {
    Single(CandidateField),
    Joined(Vec<CandidateField>),
}

impl Default for SubtitleFields {
    fn default() -> Self {
        Self::Joined(vec![CandidateField::Secondary])
    }
}

/// Field mapping for the info balloon of a selected result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalloonConfig {
    pub balloon_title: CandidateField,
    pub balloon_subtitle: SubtitleFields,
    pub address_name: Option<CandidateField>,
    pub street: Option<CandidateField>,
    pub number: Option<CandidateField>,
    pub city: Option<CandidateField>,
    pub zip: Option<CandidateField>,
    pub country: Option<CandidateField>,
}

impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            balloon_title: CandidateField::Text,
            balloon_subtitle: SubtitleFields::default(),
            address_name: Some(CandidateField::Address),
            street: None,
            number: None,
            city: Some(CandidateField::District),
            zip: Some(CandidateField::PostalCode),
            country: None,
        }
    }
}

/// Fully populated adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Search endpoint. Any query string is replaced by the `p` parameter.
    pub url: String,
    /// Source CRS identifier, `EPSG:<code>`
    pub epsg: String,
    /// proj4 definition of the source CRS
    pub proj4: String,
    /// Fixed parameters placed between locale and query text
    pub params: String,
    /// Fields joined with `" - "` to form the result list title
    pub results_title: Vec<CandidateField>,
    pub balloon: BalloonConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            epsg: DEFAULT_EPSG.to_owned(),
            proj4: DEFAULT_PROJ4.to_owned(),
            params: DEFAULT_PARAMS.to_owned(),
            results_title: vec![CandidateField::Text, CandidateField::Secondary],
            balloon: BalloonConfig::default(),
        }
    }
}

/// Partial configuration as shipped by a deployment.
///
/// Only keys that differ from the defaults need to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_title: Option<Vec<CandidateField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balloon: Option<BalloonOverrides>,
}

/// Key-by-key overrides of [`BalloonConfig`].
///
/// The optional address keys distinguish "absent" (keep the default) from an
/// explicit `null` (clear the default).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BalloonOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balloon_title: Option<CandidateField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balloon_subtitle: Option<SubtitleFields>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub address_name: Option<Option<CandidateField>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub street: Option<Option<CandidateField>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<Option<CandidateField>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<Option<CandidateField>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub zip: Option<Option<CandidateField>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<Option<CandidateField>>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PluginConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl BalloonOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, balloon: &mut BalloonConfig) {
        if let Some(title) = self.balloon_title {
            balloon.balloon_title = title;
        }
        if let Some(subtitle) = self.balloon_subtitle {
            balloon.balloon_subtitle = subtitle;
        }
        let slots = [
            (self.address_name, &mut balloon.address_name),
            (self.street, &mut balloon.street),
            (self.number, &mut balloon.number),
            (self.city, &mut balloon.city),
            (self.zip, &mut balloon.zip),
            (self.country, &mut balloon.country),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    fn diff(current: &BalloonConfig, defaults: &BalloonConfig) -> Self {
        Self {
            balloon_title: changed(current.balloon_title, defaults.balloon_title),
            balloon_subtitle: changed(
                current.balloon_subtitle.clone(),
                defaults.balloon_subtitle.clone(),
            ),
            address_name: changed(current.address_name, defaults.address_name),
            street: changed(current.street, defaults.street),
            number: changed(current.number, defaults.number),
            city: changed(current.city, defaults.city),
            zip: changed(current.zip, defaults.zip),
            country: changed(current.country, defaults.country),
        }
    }
}

fn changed<T: PartialEq>(current: T, default: T) -> Option<T> {
    (current != default).then_some(current)
}

impl SearchConfig {
    /// Defaults with `overrides` laid over them.
    pub fn merged(overrides: PluginConfig) -> Self {
        Self::default().with_overrides(overrides)
    }

    /// Parse a [`PluginConfig`] document and merge it with the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        PluginConfig::from_json_str(json).map(Self::merged)
    }

    pub fn with_overrides(mut self, overrides: PluginConfig) -> Self {
        let PluginConfig {
            url,
            epsg,
            proj4,
            params,
            results_title,
            balloon,
        } = overrides;

        if let Some(url) = url {
            self.url = url;
        }
        if let Some(epsg) = epsg {
            self.epsg = epsg;
        }
        if let Some(proj4) = proj4 {
            self.proj4 = proj4;
        }
        if let Some(params) = params {
            self.params = params;
        }
        if let Some(results_title) = results_title {
            self.results_title = results_title;
        }
        if let Some(balloon) = balloon {
            balloon.apply(&mut self.balloon);
        }
        self
    }

    /// The overrides needed to reproduce this configuration from the defaults.
    ///
    /// A default configuration yields an empty document, serialized as `{}`.
    pub fn to_overrides(&self) -> PluginConfig {
        let defaults = Self::default();
        let balloon = BalloonOverrides::diff(&self.balloon, &defaults.balloon);
        PluginConfig {
            url: changed(self.url.clone(), defaults.url),
            epsg: changed(self.epsg.clone(), defaults.epsg),
            proj4: changed(self.proj4.clone(), defaults.proj4),
            params: changed(self.params.clone(), defaults.params),
            results_title: changed(self.results_title.clone(), defaults.results_title),
            balloon: (!balloon.is_empty()).then_some(balloon),
        }
    }

    /// The endpoint URL with a single trailing `/` removed.
    pub fn base_url(&self) -> Result<Url> {
        let url = self.url.trim();
        let url = url.strip_suffix('/').unwrap_or(url);
        if url.is_empty() {
            return Err(SearchError::ConfigError(
                "Search endpoint URL must not be empty".to_owned(),
            ));
        }
        Ok(Url::parse(url)?)
    }

    /// Numeric part of the `EPSG:<code>` identifier.
    pub fn epsg_code(&self) -> Result<u32> {
        let code = self
            .epsg
            .trim()
            .strip_prefix("EPSG:")
            .ok_or_else(|| {
                SearchError::ConfigError(format!(
                    "EPSG identifier must look like 'EPSG:<code>', got '{}'",
                    self.epsg
                ))
            })?;
        code.parse().map_err(|_| {
            SearchError::ConfigError(format!("Invalid EPSG code '{}'", self.epsg))
        })
    }
}

/// Builder for adapter configurations, starting from the deployment defaults
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder seeded with the deployment defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search endpoint
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Set the source CRS: its EPSG identifier and proj4 definition
    pub fn source_crs(mut self, epsg: impl Into<String>, proj4: impl Into<String>) -> Self {
        self.config.epsg = epsg.into();
        self.config.proj4 = proj4.into();
        self
    }

    /// Set the fixed query parameters
    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.config.params = params.into();
        self
    }

    /// Set the fields forming the result list title
    pub fn results_title(mut self, fields: impl IntoIterator<Item = CandidateField>) -> Self {
        self.config.results_title = fields.into_iter().collect();
        self
    }

    /// Configure the balloon field mapping
    pub fn balloon(self) -> BalloonConfigBuilder {
        BalloonConfigBuilder { parent: self }
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }
}

/// Builder for the balloon section of a [`SearchConfig`]
pub struct BalloonConfigBuilder {
    parent: SearchConfigBuilder,
}

impl BalloonConfigBuilder {
    /// Set the field shown as the balloon title
    pub fn title(mut self, field: CandidateField) -> Self {
        self.parent.config.balloon.balloon_title = field;
        self
    }

    /// Set the field or joined fields shown as the balloon subtitle
    pub fn subtitle(mut self, fields: SubtitleFields) -> Self {
        self.parent.config.balloon.balloon_subtitle = fields;
        self
    }

    /// Set the field for the address name, `None` to leave it out
    pub fn address_name(mut self, field: Option<CandidateField>) -> Self {
        self.parent.config.balloon.address_name = field;
        self
    }

    /// Set the field for the street, `None` to leave it out
    pub fn street(mut self, field: Option<CandidateField>) -> Self {
        self.parent.config.balloon.street = field;
        self
    }

    /// Set the field for the house number, `None` to leave it out
    pub fn number(mut self, field: Option<CandidateField>) -> Self {
        self.parent.config.balloon.number = field;
        self
    }

    /// Set the field for the city, `None` to leave it out
    pub fn city(mut self, field: Option<CandidateField>) -> Self {
        self.parent.config.balloon.city = field;
        self
    }

    /// Set the field for the postal code, `None` to leave it out
    pub fn zip(mut self, field: Option<CandidateField>) -> Self {
        self.parent.config.balloon.zip = field;
        self
    }

    /// Set the field for the country, `None` to leave it out
    pub fn country(mut self, field: Option<CandidateField>) -> Self {
        self.parent.config.balloon.country = field;
        self
    }

    /// Return to the main configuration builder
    pub fn done(self) -> SearchConfigBuilder {
        self.parent
    }
}
