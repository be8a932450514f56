//! # Credential Builder
//!
//! Assembles an [`ElmCredential`] for one learner and one course from the
//! platform records. The builder is pure apart from the fresh credential id
//! and the issuance time, which default to a new UUID v4 and "now".

use elmcred_core::{
    split_full_name, CertificateRecord, CourseRecord, Timestamp, UserRecord,
};
use uuid::Uuid;

use crate::model::{
    en, AwardedBy, Concept, CredentialSubject, DeliveryDetails, DisplayParameter, ElmBody,
    ElmCredential, Grade, HasClaim, Location, Organisation, ProvenBy, SchemaRef, SpecifiedBy,
    CREDENTIAL_CONTEXT, CREDENTIAL_TYPES,
};
use crate::settings::ElmDefaults;

/// Builds the ELMv3 credential of a learner who earned a certificate.
pub struct CredentialBuilder<'a> {
    course: &'a CourseRecord,
    user: &'a UserRecord,
    certificate: &'a CertificateRecord,
    defaults: &'a ElmDefaults,
    expires_at: Option<Timestamp>,
    issued_at: Option<Timestamp>,
}

impl<'a> CredentialBuilder<'a> {
    pub fn new(
        course: &'a CourseRecord,
        user: &'a UserRecord,
        certificate: &'a CertificateRecord,
        defaults: &'a ElmDefaults,
    ) -> Self {
        Self {
            course,
            user,
            certificate,
            defaults,
            expires_at: None,
            issued_at: None,
        }
    }

    /// Set `validUntil` and `expirationDate`.
    pub fn expires_at(mut self, expires_at: Option<Timestamp>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Pin the issuance time instead of using the current time.
    pub fn issued_at(mut self, issued_at: Timestamp) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn build(&self) -> ElmCredential {
        let org = self.course.org();
        let display_name = self.course.display_name.as_str();
        let full_name = self.user.full_name.as_str();
        let (given_name, family_name) = split_full_name(full_name);
        let primary_language = self.defaults.primary_language(&self.course.elm);
        let country_code = self.defaults.org_country_code(&self.course.elm);
        let issued = self.issued_at.unwrap_or_else(Timestamp::now).to_iso8601();
        let expires = self.expires_at.map(|t| t.to_iso8601());

        let awarded_by = AwardedBy::new(
            Organisation::new(org, Some(Location::in_country(&country_code))),
            self.certificate.created_date.to_iso8601(),
        );

        let has_claim = HasClaim {
            id: "urn:epass:learningAchievement:1".to_string(),
            kind: "LearningAchievement".to_string(),
            title: en(format!(
                "Course certificate for passing {display_name} course"
            )),
            proven_by: ProvenBy {
                id: "urn:epass:learningAssessment:1".to_string(),
                kind: "LearningAssessment".to_string(),
                awarded_by: awarded_by.clone(),
                title: en(display_name),
                grade: Grade::new(&self.certificate.grade),
                id_verification: Concept::unsupervised_with_id_verification(),
            },
            awarded_by,
            specified_by: SpecifiedBy {
                id: "urn:epass:learningAchievementSpec:1".to_string(),
                kind: "LearningAchievementSpecification".to_string(),
                title: en(display_name),
                language: Concept::language(&primary_language),
                mode: Concept::online_mode(),
            },
        };

        let credential = ElmBody {
            id: format!("urn:credential:{}", Uuid::new_v4()),
            credential_type: CREDENTIAL_TYPES.iter().map(|s| s.to_string()).collect(),
            context: CREDENTIAL_CONTEXT.iter().map(|s| s.to_string()).collect(),
            credential_schema: SchemaRef::edc_generic_no_cv(),
            valid_until: expires.clone(),
            expiration_date: expires,
            valid_from: issued.clone(),
            issuance_date: issued.clone(),
            issued,
            issuer: Organisation::new(org, None),
            credential_subject: CredentialSubject {
                id: "urn:epass:person:1".to_string(),
                kind: "Person".to_string(),
                given_name: en(given_name),
                family_name: en(family_name),
                full_name: en(full_name),
                has_claim,
            },
            display_parameter: DisplayParameter {
                id: "urn:epass:displayParameter:1".to_string(),
                kind: "DisplayParameter".to_string(),
                primary_language: Concept::language(&primary_language),
                title: en(display_name),
            },
        };

        ElmCredential {
            credential,
            delivery_details: DeliveryDetails {
                delivery_address: self.user.email.clone(),
            },
        }
    }
}
