//! # ELMv3 Document Model
//!
//! Typed form of an ELMv3 credential as delivered to a learner. Field names
//! serialize as camelCase, optional fields are omitted when empty and the
//! JSON-LD keys (`@context`, `type`) keep their literal spelling.
//!
//! Node ids such as `urn:epass:person:1` are document-local and fixed: one
//! credential always has one subject, one achievement and one awarding
//! body. Only the credential id itself is unique.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::VcError;

/// Language-tagged text, e.g. `{"en": "Demo Course"}`.
pub type LangMap = BTreeMap<String, String>;

/// Build a single-entry English [`LangMap`].
pub fn en(text: impl Into<String>) -> LangMap {
    let mut map = LangMap::new();
    map.insert("en".to_string(), text.into());
    map
}

pub const CREDENTIAL_TYPES: [&str; 2] = ["VerifiableCredential", "EuropeanDigitalCredential"];
pub const CREDENTIAL_CONTEXT: [&str; 2] = [
    "https://www.w3.org/2018/credentials/v1",
    "https://data.europa.eu/snb/model/context/edc-ap",
];
pub const CREDENTIAL_SCHEMA_ID: &str = "http://data.europa.eu/snb/model/ap/edc-generic-no-cv";
pub const CREDENTIAL_SCHEMA_TYPE: &str = "ShaclValidator2017";

const LANGUAGE_AUTHORITY: &str = "http://publications.europa.eu/resource/authority/language";
const COUNTRY_AUTHORITY: &str = "http://publications.europa.eu/resource/authority/country";
const MODE_ONLINE_ID: &str = "http://data.europa.eu/snb/learning-assessment/920fbb3cbe";
const MODE_SCHEME_ID: &str = "http://data.europa.eu/snb/learning-assessment/25831c2";
const ID_VERIFICATION_ID: &str = "http://data.europa.eu/snb/supervision-verification/df2880c5cb";
const ID_VERIFICATION_SCHEME_ID: &str =
    "http://data.europa.eu/snb/supervision-verification/25831c2";

/// The delivered document: the credential plus where it goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElmCredential {
    pub credential: ElmBody,
    pub delivery_details: DeliveryDetails,
}

impl ElmCredential {
    /// Render as pretty-printed JSON (two-space indent).
    pub fn to_json_pretty(&self) -> Result<String, VcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The credential's `urn:credential:{uuid}` id.
    pub fn id(&self) -> &str {
        &self.credential.id
    }
}

/// Where the credential is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub delivery_address: String,
}

/// The `credential` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElmBody {
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub credential_schema: SchemaRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub valid_from: String,
    pub issuance_date: String,
    pub issued: String,
    pub issuer: Organisation,
    pub credential_subject: CredentialSubject,
    pub display_parameter: DisplayParameter,
}

/// Reference to the SHACL shape the document conforms to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl SchemaRef {
    pub fn edc_generic_no_cv() -> Self {
        Self {
            id: CREDENTIAL_SCHEMA_ID.to_string(),
            kind: CREDENTIAL_SCHEMA_TYPE.to_string(),
        }
    }
}

/// An organisation node, used for both the issuer and the awarding body.
/// Only the awarding body carries a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub alt_label: LangMap,
    pub legal_name: LangMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Organisation {
    pub fn new(name: &str, location: Option<Location>) -> Self {
        Self {
            id: "urn:epass:org:1".to_string(),
            kind: "Organisation".to_string(),
            alt_label: en(name),
            legal_name: en(name),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: Address,
}

impl Location {
    /// A location identified only by its country.
    pub fn in_country(country_code: &str) -> Self {
        Self {
            id: "urn:epass:location:1".to_string(),
            kind: "Location".to_string(),
            address: Address {
                id: "urn:epass:address:1".to_string(),
                kind: "Address".to_string(),
                country_code: Concept::country(country_code),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub country_code: Concept,
}

/// A controlled-vocabulary concept.
///
/// Authority concepts (language, country) carry a `notation`; EU
/// vocabulary concepts (mode, verification) carry a `prefLabel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub in_scheme: ConceptScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<LangMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptScheme {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ConceptScheme {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "ConceptScheme".to_string(),
        }
    }
}

impl Concept {
    fn authority(authority: &str, code: &str, notation: &str) -> Self {
        Self {
            id: format!("{authority}/{code}"),
            kind: "Concept".to_string(),
            in_scheme: ConceptScheme::new(authority),
            notation: Some(notation.to_string()),
            pref_label: None,
        }
    }

    fn labelled(id: &str, scheme: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "Concept".to_string(),
            in_scheme: ConceptScheme::new(scheme),
            notation: None,
            pref_label: Some(en(label)),
        }
    }

    /// EU language authority concept, e.g. `SPA`.
    pub fn language(code: &str) -> Self {
        Self::authority(LANGUAGE_AUTHORITY, code, "language")
    }

    /// EU country authority concept, e.g. `ESP`.
    pub fn country(code: &str) -> Self {
        Self::authority(COUNTRY_AUTHORITY, code, "country")
    }

    /// Learning mode "Online".
    pub fn online_mode() -> Self {
        Self::labelled(MODE_ONLINE_ID, MODE_SCHEME_ID, "Online")
    }

    /// Supervision level "Unsupervised with ID verification".
    pub fn unsupervised_with_id_verification() -> Self {
        Self::labelled(
            ID_VERIFICATION_ID,
            ID_VERIFICATION_SCHEME_ID,
            "Unsupervised with ID verification",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub given_name: LangMap,
    pub family_name: LangMap,
    pub full_name: LangMap,
    pub has_claim: HasClaim,
}

/// The learning achievement the credential asserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasClaim {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: LangMap,
    pub proven_by: ProvenBy,
    pub awarded_by: AwardedBy,
    pub specified_by: SpecifiedBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBy {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub awarding_body: Organisation,
    pub awarding_date: String,
}

impl AwardedBy {
    pub fn new(awarding_body: Organisation, awarding_date: String) -> Self {
        Self {
            id: "urn:epass:awardingProcess:1".to_string(),
            kind: "AwardingProcess".to_string(),
            awarding_body,
            awarding_date,
        }
    }
}

/// The assessment that proved the achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenBy {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub awarded_by: AwardedBy,
    pub title: LangMap,
    pub grade: Grade,
    pub id_verification: Concept,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub note_literal: LangMap,
}

impl Grade {
    pub fn new(grade: &str) -> Self {
        Self {
            id: "urn:epass:note:1".to_string(),
            kind: "Note".to_string(),
            note_literal: en(grade),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecifiedBy {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: LangMap,
    pub language: Concept,
    pub mode: Concept,
}

/// How viewers should render the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayParameter {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub primary_language: Concept,
    pub title: LangMap,
}
