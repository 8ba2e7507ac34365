//! Display-ready search results.

use geo::Geometry;
use serde::{Serialize, Serializer};
use wkt::ToWkt;

use crate::{
    balloon::{Address, AddressBalloon, join_non_empty},
    candidate::Candidate,
    config::SearchConfig,
    error::{Result, SearchError},
    geometry::Reprojector,
};

/// A map feature: projected geometry, the full candidate as attribute bag, and
/// the balloon shown on selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(serialize_with = "serialize_wkt")]
    geometry: Geometry<f64>,
    properties: Candidate,
    #[serde(rename = "featureInfoView")]
    balloon: AddressBalloon,
}

impl Feature {
    /// Geometry in web mercator (EPSG:3857).
    pub const fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub const fn properties(&self) -> &Candidate {
        &self.properties
    }

    pub const fn balloon(&self) -> &AddressBalloon {
        &self.balloon
    }

    pub fn address(&self) -> Address {
        self.balloon.address(&self.properties)
    }
}

/// One entry of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayResult {
    pub title: String,
    pub feature: Feature,
}

impl DisplayResult {
    pub fn from_candidate(
        candidate: Candidate,
        config: &SearchConfig,
        reprojector: &Reprojector,
    ) -> Result<Self> {
        let wkt = candidate
            .geometry_wkt()
            .ok_or_else(|| SearchError::InvalidGeometry("candidate has no geometry".to_owned()))?;
        let geometry = reprojector.read_wkt(wkt)?;

        let balloon = AddressBalloon::from_candidate(&candidate, &config.balloon);
        let title = join_non_empty(&candidate, &config.results_title);

        Ok(Self {
            title,
            feature: Feature {
                geometry,
                properties: candidate,
                balloon,
            },
        })
    }
}

fn serialize_wkt<S: Serializer>(
    geometry: &Geometry<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&geometry.wkt_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::candidate::CandidateField;

    fn build(value: serde_json::Value) -> Result<DisplayResult> {
        let config = SearchConfig::default();
        let reprojector = Reprojector::from_config(&config).unwrap();
        DisplayResult::from_candidate(serde_json::from_value(value).unwrap(), &config, &reprojector)
    }

    #[test]
    fn test_display_result_from_candidate() {
        let result = build(json!({
            "geom": "POINT(344000 5677000)",
            "text": "Rathaus",
            "cat": "Verwaltung",
            "2": "Altstadt",
            "plz": "40213",
            "searchId": "a-1"
        }))
        .unwrap();

        assert_eq!(result.title, "Rathaus - Altstadt");
        assert!(matches!(result.feature.geometry(), Geometry::Point(_)));

        let balloon = result.feature.balloon();
        assert_eq!(balloon.balloon_title, "Rathaus");
        assert_eq!(balloon.balloon_subtitle, "Altstadt");
        assert_eq!(balloon.zip, Some(CandidateField::PostalCode));

        // the whole candidate travels along as attributes
        let properties = result.feature.properties();
        assert_eq!(properties.get(CandidateField::SearchId).as_deref(), Some("a-1"));
        assert!(properties.has_geometry());
        assert_eq!(result.feature.address().zip.as_deref(), Some("40213"));
    }

    #[test]
    fn test_missing_geometry_is_an_error() {
        let result = build(json!({"text": "Nirgendwo"}));
        assert!(matches!(result, Err(SearchError::InvalidGeometry(_))));
    }

    #[test]
    fn test_serializes_geometry_as_wkt() {
        let result = build(json!({"geom": "POINT(500000 0)", "text": "Äquator"})).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["title"], "Äquator");
        let geometry = json["feature"]["geometry"].as_str().unwrap();
        assert!(geometry.starts_with("POINT"), "geometry = {geometry}");
        assert_eq!(json["feature"]["properties"]["text"], "Äquator");
        assert_eq!(
            json["feature"]["featureInfoView"]["type"],
            "AddressBalloonFeatureInfoView"
        );
    }
}
