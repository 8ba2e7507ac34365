//! Raw search records and the typed selectors used to read them.
//!
//! A [`Candidate`] keeps every field the endpoint (and a later enrichment
//! lookup) delivered, because the whole record becomes the attribute bag of
//! the map feature. Configuration never addresses a field by free-form string;
//! it goes through [`CandidateField`], so an unknown field name is rejected when
//! the configuration is parsed rather than silently resolving to nothing.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The well-known fields of a search endpoint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateField {
    /// WKT geometry in the source CRS
    #[serde(rename = "geom")]
    Geometry,
    /// Plain text label
    #[serde(rename = "text")]
    Text,
    /// Category, e.g. "Adresse" or "Verwaltung"
    #[serde(rename = "cat")]
    Category,
    #[serde(rename = "searchId")]
    SearchId,
    #[serde(rename = "score")]
    Score,
    /// Finer-grained kind within the category
    #[serde(rename = "art")]
    Kind,
    /// City district
    #[serde(rename = "stadtteil")]
    District,
    /// Formatted street address
    #[serde(rename = "adresse")]
    Address,
    /// Postal code
    #[serde(rename = "plz")]
    PostalCode,
    /// Secondary label column, delivered under the key `"2"`
    #[serde(rename = "2")]
    Secondary,
    /// URL of a feature service returning extra properties for this record
    #[serde(rename = "wfs_url")]
    FeatureUrl,
}

impl CandidateField {
    pub const ALL: [Self; 11] = [
        Self::Geometry,
        Self::Text,
        Self::Category,
        Self::SearchId,
        Self::Score,
        Self::Kind,
        Self::District,
        Self::Address,
        Self::PostalCode,
        Self::Secondary,
        Self::FeatureUrl,
    ];

    /// The key under which this field appears in the JSON record.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Geometry => "geom",
            Self::Text => "text",
            Self::Category => "cat",
            Self::SearchId => "searchId",
            Self::Score => "score",
            Self::Kind => "art",
            Self::District => "stadtteil",
            Self::Address => "adresse",
            Self::PostalCode => "plz",
            Self::Secondary => "2",
            Self::FeatureUrl => "wfs_url",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One raw result record from the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    fields: Map<String, Value>,
}

impl Candidate {
    /// Read a field as display text.
    ///
    /// `null` counts as absent. Numbers and booleans are rendered with their
    /// JSON representation, since feature services frequently deliver postal
    /// codes or ids as numbers.
    pub fn get(&self, field: CandidateField) -> Option<Cow<'_, str>> {
        match self.fields.get(field.key())? {
            Value::Null => None,
            Value::String(value) => Some(Cow::Borrowed(value.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Like [`Candidate::get`] but treats the empty string as absent.
    pub fn get_non_empty(&self, field: CandidateField) -> Option<Cow<'_, str>> {
        self.get(field).filter(|value| !value.is_empty())
    }

    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.get(CandidateField::Text)
    }

    pub fn category(&self) -> Option<Cow<'_, str>> {
        self.get(CandidateField::Category)
    }

    /// The WKT geometry, if the record carries a non-blank geometry string.
    pub fn geometry_wkt(&self) -> Option<&str> {
        non_blank_str(self.fields.get(CandidateField::Geometry.key()))
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry_wkt().is_some()
    }

    /// The secondary lookup URL, if present and non-blank.
    pub fn feature_url(&self) -> Option<&str> {
        non_blank_str(self.fields.get(CandidateField::FeatureUrl.key()))
    }

    pub fn set(&mut self, field: CandidateField, value: impl Into<String>) {
        self.fields
            .insert(field.key().to_owned(), Value::String(value.into()));
    }

    /// Merge properties from an enrichment lookup into this record.
    ///
    /// Incoming values overwrite existing fields of the same name.
    pub fn merge_properties(&mut self, properties: Map<String, Value>) {
        self.fields.extend(properties);
    }

    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Candidate {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<'a> FromIterator<(CandidateField, &'a str)> for Candidate {
    fn from_iter<I: IntoIterator<Item = (CandidateField, &'a str)>>(iter: I) -> Self {
        let mut candidate = Self::default();
        for (field, value) in iter {
            candidate.set(field, value);
        }
        candidate
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
