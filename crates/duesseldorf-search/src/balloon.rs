//! Info balloon descriptors and the title formatting shared with result lists.

use itertools::Itertools;
use serde::Serialize;

use crate::{
    candidate::{Candidate, CandidateField},
    config::{BalloonConfig, SubtitleFields},
};

/// Feature info view type understood by the map viewer.
pub const BALLOON_KIND: &str = "AddressBalloonFeatureInfoView";
pub const BALLOON_NAME: &str = "DuesseldorfSearchBalloon";

const SEPARATOR: &str = " - ";

/// Balloon shown when a search result feature is selected.
///
/// Address entries hold the *field* the viewer should read from the feature
/// attributes, not the value itself. Mappings that are unconfigured or empty
/// on the candidate are left out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalloon {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub balloon_title: String,
    pub balloon_subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_name: Option<CandidateField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<CandidateField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<CandidateField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<CandidateField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<CandidateField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CandidateField>,
}

/// Address values resolved from a feature's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_name: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

impl AddressBalloon {
    pub fn from_candidate(candidate: &Candidate, config: &BalloonConfig) -> Self {
        let present = |field: Option<CandidateField>| {
            field.filter(|&field| candidate.get_non_empty(field).is_some())
        };

        Self {
            kind: BALLOON_KIND,
            name: BALLOON_NAME,
            balloon_title: balloon_title(candidate, config),
            balloon_subtitle: balloon_subtitle(candidate, config),
            address_name: present(config.address_name),
            street: present(config.street),
            number: present(config.number),
            city: present(config.city),
            zip: present(config.zip),
            country: present(config.country),
        }
    }

    /// Look up the attached address fields on `attributes`.
    pub fn address(&self, attributes: &Candidate) -> Address {
        let value = |field: Option<CandidateField>| {
            field
                .and_then(|field| attributes.get_non_empty(field))
                .map(|value| value.into_owned())
        };

        Address {
            address_name: value(self.address_name),
            street: value(self.street),
            number: value(self.number),
            city: value(self.city),
            zip: value(self.zip),
            country: value(self.country),
        }
    }
}

/// The mapped title field, or the plain text label when that field is absent.
pub fn balloon_title(candidate: &Candidate, config: &BalloonConfig) -> String {
    candidate
        .get(config.balloon_title)
        .or_else(|| candidate.text())
        .map(|title| title.into_owned())
        .unwrap_or_default()
}

/// The configured subtitle fields, falling back to the category.
pub fn balloon_subtitle(candidate: &Candidate, config: &BalloonConfig) -> String {
    let subtitle = match &config.balloon_subtitle {
        SubtitleFields::Joined(fields) => join_non_empty(candidate, fields),
        SubtitleFields::Single(field) => candidate
            .get_non_empty(*field)
            .map(|value| value.into_owned())
            .unwrap_or_default(),
    };
    if subtitle.is_empty() {
        candidate
            .category()
            .map(|category| category.into_owned())
            .unwrap_or_default()
    } else {
        subtitle
    }
}

/// Join the non-empty values of `fields`, in order, with `" - "`.
pub fn join_non_empty(candidate: &Candidate, fields: &[CandidateField]) -> String {
    fields
        .iter()
        .filter_map(|&field| candidate.get_non_empty(field))
        .join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn candidate(value: serde_json::Value) -> Candidate {
        serde_json::from_value(value).unwrap()
    }

    fn config_with_subtitle(subtitle: SubtitleFields) -> BalloonConfig {
        BalloonConfig {
            balloon_subtitle: subtitle,
            ..BalloonConfig::default()
        }
    }

    #[test]
    fn test_title_uses_mapped_field() {
        let config = BalloonConfig {
            balloon_title: CandidateField::Address,
            ..BalloonConfig::default()
        };
        let c = candidate(json!({"text": "Rathaus", "adresse": "Marktplatz 2"}));
        assert_eq!(balloon_title(&c, &config), "Marktplatz 2");
    }

    #[test]
    fn test_title_falls_back_to_text_when_absent() {
        let config = BalloonConfig {
            balloon_title: CandidateField::Address,
            ..BalloonConfig::default()
        };
        let c = candidate(json!({"text": "Rathaus"}));
        assert_eq!(balloon_title(&c, &config), "Rathaus");

        let c = candidate(json!({"text": "Rathaus", "adresse": null}));
        assert_eq!(balloon_title(&c, &config), "Rathaus");
    }

    #[test]
    fn test_subtitle_joins_present_fields() {
        let config = config_with_subtitle(SubtitleFields::Joined(vec![
            CandidateField::Category,
            CandidateField::Kind,
        ]));
        let c = candidate(json!({"text": "Rathaus", "cat": "Verwaltung"}));
        assert_eq!(balloon_subtitle(&c, &config), "Verwaltung");

        let c = candidate(json!({"text": "Rathaus", "cat": "Verwaltung", "art": "Amt"}));
        assert_eq!(balloon_subtitle(&c, &config), "Verwaltung - Amt");
    }

    #[test]
    fn test_subtitle_falls_back_to_category() {
        let config = BalloonConfig::default();
        let c = candidate(json!({"text": "Rathaus", "cat": "Verwaltung", "2": ""}));
        assert_eq!(balloon_subtitle(&c, &config), "Verwaltung");

        let c = candidate(json!({"text": "Rathaus", "2": ""}));
        assert_eq!(balloon_subtitle(&c, &config), "");
    }

    #[test]
    fn test_single_subtitle_field() {
        let config = config_with_subtitle(SubtitleFields::Single(CandidateField::District));
        let c = candidate(json!({"cat": "Adresse", "stadtteil": "Altstadt"}));
        assert_eq!(balloon_subtitle(&c, &config), "Altstadt");

        let c = candidate(json!({"cat": "Adresse", "stadtteil": ""}));
        assert_eq!(balloon_subtitle(&c, &config), "Adresse");
    }

    #[test]
    fn test_join_non_empty_skips_blank_values() {
        let c = candidate(json!({"text": "Königsallee 1", "2": "Stadtmitte", "cat": ""}));
        let fields = [
            CandidateField::Text,
            CandidateField::Category,
            CandidateField::Secondary,
        ];
        assert_eq!(join_non_empty(&c, &fields), "Königsallee 1 - Stadtmitte");
        assert_eq!(join_non_empty(&c, &[]), "");
    }

    #[test]
    fn test_address_fields_omitted_when_unconfigured_or_empty() {
        let c = candidate(json!({
            "text": "Rathaus",
            "stadtteil": "Altstadt",
            "plz": "",
            "adresse": "Marktplatz 2"
        }));
        let balloon = AddressBalloon::from_candidate(&c, &BalloonConfig::default());

        assert_eq!(balloon.city, Some(CandidateField::District));
        assert_eq!(balloon.address_name, Some(CandidateField::Address));
        assert_eq!(balloon.zip, None, "Empty values must not be attached");
        assert_eq!(balloon.street, None, "Unconfigured mappings must not be attached");

        let json = serde_json::to_value(&balloon).unwrap();
        assert_eq!(
            json,
            json!({
                "type": BALLOON_KIND,
                "name": BALLOON_NAME,
                "balloonTitle": "Rathaus",
                "balloonSubtitle": "",
                "addressName": "adresse",
                "city": "stadtteil"
            })
        );
    }

    #[test]
    fn test_address_resolves_values() {
        let c = candidate(json!({
            "text": "Hauptbahnhof",
            "stadtteil": "Stadtmitte",
            "plz": 40210,
            "adresse": "Konrad-Adenauer-Platz 14"
        }));
        let balloon = AddressBalloon::from_candidate(&c, &BalloonConfig::default());
        let address = balloon.address(&c);

        assert_eq!(address.zip.as_deref(), Some("40210"));
        assert_eq!(address.city.as_deref(), Some("Stadtmitte"));
        assert_eq!(
            address.address_name.as_deref(),
            Some("Konrad-Adenauer-Platz 14")
        );
        assert_eq!(address.street, None);
    }
}
