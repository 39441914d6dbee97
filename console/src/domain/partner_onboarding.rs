//! Partner onboarding wizard.
//!
//! A new partner fills in the basics of their accommodation, uploads the
//! seven required documents one after another, reviews, and submits. The
//! wizard state lives client-side; the service talks to the backend.
//!
//! ```text
//! BasicInfo -> Documents -> Review -> Submitted
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::api_client::ApiClient;
use super::envelope::ApiEnvelope;
use super::request::MultipartForm;

const DOCUMENTS: &str = "/api/partner/documents";
const SERVICES: &str = "/api/partner/services";
const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Documents a partner must provide before approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Business registration certificate.
    BusinessRegistration,
    /// Lodging business licence.
    AccommodationLicense,
    /// Owner's identity card.
    IdentityCard,
    /// Bank account copy for settlements.
    BankAccount,
    /// Property deed or lease.
    PropertyDeed,
    /// Fire safety inspection certificate.
    FireSafetyCertificate,
    /// Permit to host animals.
    PetFacilityPermit,
}

impl DocumentKind {
    /// Every required document, in upload order.
    pub const ALL: [Self; 7] = [
        Self::BusinessRegistration,
        Self::AccommodationLicense,
        Self::IdentityCard,
        Self::BankAccount,
        Self::PropertyDeed,
        Self::FireSafetyCertificate,
        Self::PetFacilityPermit,
    ];

    /// Form value sent as `documentType`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BusinessRegistration => "business_registration",
            Self::AccommodationLicense => "accommodation_license",
            Self::IdentityCard => "identity_card",
            Self::BankAccount => "bank_account",
            Self::PropertyDeed => "property_deed",
            Self::FireSafetyCertificate => "fire_safety_certificate",
            Self::PetFacilityPermit => "pet_facility_permit",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file chosen for one document slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    /// Slot the file fills.
    pub kind: DocumentKind,
    /// Original file name.
    pub file_name: String,
    /// MIME type, when known.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    fn into_form(self) -> MultipartForm {
        MultipartForm::new()
            .text("documentType", self.kind.as_str())
            .file(
                "file",
                self.file_name,
                self.content_type.as_deref(),
                self.bytes,
            )
    }
}

/// A document accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    /// Slot the file fills.
    #[serde(rename = "documentType")]
    pub kind: DocumentKind,
    /// Where the backend stored the file.
    pub file_url: String,
    /// Acceptance time.
    pub uploaded_at: DateTime<Utc>,
}

/// Accommodation basics entered on the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBasics {
    /// Accommodation name.
    pub accommodation_name: String,
    /// Street address.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Most pets allowed per booking.
    pub max_pets: u8,
    /// Species accepted, e.g. `dog`, `cat`.
    pub pet_types: Vec<String>,
}

impl ServiceBasics {
    fn validate(&self) -> Result<(), OnboardingError> {
        let missing = if self.accommodation_name.trim().is_empty() {
            Some("accommodationName")
        } else if self.address.trim().is_empty() {
            Some("address")
        } else if !self.phone.chars().any(|c| c.is_ascii_digit()) {
            Some("phone")
        } else if self.max_pets == 0 {
            Some("maxPets")
        } else if self.pet_types.iter().all(|kind| kind.trim().is_empty()) {
            Some("petTypes")
        } else {
            None
        };
        match missing {
            Some(field) => Err(OnboardingError::InvalidField { field }),
            None => Ok(()),
        }
    }
}

/// Wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Entering accommodation basics.
    BasicInfo,
    /// Uploading documents.
    Documents,
    /// Reviewing before submission.
    Review,
    /// Submitted for approval.
    Submitted,
}

/// Reasons the wizard refuses a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    /// A basics field is missing or malformed.
    #[error("field `{field}` is missing or invalid")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// The action belongs to another step.
    #[error("expected step {expected:?}, wizard is at {actual:?}")]
    WrongStep {
        /// Step the action needs.
        expected: WizardStep,
        /// Current step.
        actual: WizardStep,
    },
    /// Review requested with documents outstanding.
    #[error("{} required document(s) missing", missing.len())]
    MissingDocuments {
        /// Outstanding slots.
        missing: Vec<DocumentKind>,
    },
    /// File exceeds the upload limit.
    #[error("{kind} is {bytes} bytes; the limit is {limit}")]
    DocumentTooLarge {
        /// Offending slot.
        kind: DocumentKind,
        /// File size.
        bytes: usize,
        /// Upload limit.
        limit: usize,
    },
}

/// Client-side wizard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingWizard {
    step: WizardStep,
    basics: Option<ServiceBasics>,
    documents: BTreeMap<DocumentKind, UploadedDocument>,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingWizard {
    /// A wizard on the first step.
    pub const fn new() -> Self {
        Self {
            step: WizardStep::BasicInfo,
            basics: None,
            documents: BTreeMap::new(),
        }
    }

    /// Current step.
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// Basics entered so far.
    pub const fn basics(&self) -> Option<&ServiceBasics> {
        self.basics.as_ref()
    }

    /// Documents accepted so far.
    pub fn documents(&self) -> impl Iterator<Item = &UploadedDocument> {
        self.documents.values()
    }

    /// Required documents not yet accepted, in upload order.
    pub fn missing_documents(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| !self.documents.contains_key(kind))
            .collect()
    }

    /// Save the basics and move to the documents step.
    ///
    /// Allowed again from later steps (before submission) to edit the basics;
    /// the step does not move backwards in that case.
    pub fn submit_basics(&mut self, basics: ServiceBasics) -> Result<(), OnboardingError> {
        if self.step == WizardStep::Submitted {
            return Err(self.wrong_step(WizardStep::BasicInfo));
        }
        basics.validate()?;
        self.basics = Some(basics);
        if self.step == WizardStep::BasicInfo {
            self.step = WizardStep::Documents;
        }
        Ok(())
    }

    /// Record a document the backend accepted. Re-uploads replace the slot.
    pub fn record_upload(&mut self, document: UploadedDocument) {
        self.documents.insert(document.kind, document);
    }

    /// Move to review once every document is in.
    pub fn advance_to_review(&mut self) -> Result<(), OnboardingError> {
        if self.step != WizardStep::Documents {
            return Err(self.wrong_step(WizardStep::Documents));
        }
        let missing = self.missing_documents();
        if !missing.is_empty() {
            return Err(OnboardingError::MissingDocuments { missing });
        }
        self.step = WizardStep::Review;
        Ok(())
    }

    /// Go back from review to documents.
    pub fn back_to_documents(&mut self) -> Result<(), OnboardingError> {
        if self.step != WizardStep::Review {
            return Err(self.wrong_step(WizardStep::Review));
        }
        self.step = WizardStep::Documents;
        Ok(())
    }

    fn mark_submitted(&mut self) {
        self.step = WizardStep::Submitted;
    }

    const fn wrong_step(&self, expected: WizardStep) -> OnboardingError {
        OnboardingError::WrongStep {
            expected,
            actual: self.step,
        }
    }
}

/// Backend calls for onboarding.
#[derive(Clone)]
pub struct PartnerOnboardingService {
    client: Arc<ApiClient>,
}

impl PartnerOnboardingService {
    /// Service sending through `client`.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Upload one document.
    pub async fn upload_document(&self, upload: DocumentUpload) -> ApiEnvelope<UploadedDocument> {
        if upload.bytes.len() > MAX_DOCUMENT_BYTES {
            let error = OnboardingError::DocumentTooLarge {
                kind: upload.kind,
                bytes: upload.bytes.len(),
                limit: MAX_DOCUMENT_BYTES,
            };
            return ApiEnvelope::validation_failure(error.to_string());
        }
        let kind = upload.kind;
        let envelope = self
            .client
            .upload(DOCUMENTS, upload.into_form())
            .await
            .decode::<UploadedDocument>();
        if !envelope.success {
            warn!(%kind, error = ?envelope.display_message(), "document upload failed");
        }
        envelope
    }

    /// Upload documents one at a time, recording each in `wizard`.
    ///
    /// Stops at the first failure and returns it; documents accepted before
    /// the failure stay recorded. On success returns every accepted document.
    pub async fn upload_documents(
        &self,
        wizard: &mut OnboardingWizard,
        uploads: Vec<DocumentUpload>,
    ) -> ApiEnvelope<Vec<UploadedDocument>> {
        if wizard.step() != WizardStep::Documents {
            let error = wizard.wrong_step(WizardStep::Documents);
            return ApiEnvelope::validation_failure(error.to_string());
        }
        let mut accepted = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let envelope = self.upload_document(upload).await;
            let document = match envelope.data {
                Some(document) if envelope.success => document,
                _ => return envelope.into_failure(),
            };
            wizard.record_upload(document.clone());
            accepted.push(document);
        }
        ApiEnvelope::ok(accepted)
    }

    /// Submit the reviewed service for approval.
    pub async fn submit_service(&self, wizard: &mut OnboardingWizard) -> ApiEnvelope<Value> {
        if wizard.step() != WizardStep::Review {
            let error = wizard.wrong_step(WizardStep::Review);
            return ApiEnvelope::validation_failure(error.to_string());
        }
        let Some(basics) = wizard.basics() else {
            let error = OnboardingError::InvalidField {
                field: "accommodationName",
            };
            return ApiEnvelope::validation_failure(error.to_string());
        };
        let documents: Vec<&UploadedDocument> = wizard.documents().collect();
        let body = serde_json::json!({
            "basics": basics,
            "documents": documents,
        });
        let envelope = self.client.post(SERVICES, body).await;
        if envelope.success {
            info!(accommodation = %basics.accommodation_name, "service submitted for approval");
            wizard.mark_submitted();
        }
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestBody;
    use crate::domain::envelope::VALIDATION_FAILED;
    use crate::test_support::{ClientHarness, ScriptedTransport};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn basics() -> ServiceBasics {
        ServiceBasics {
            accommodation_name: "Pine Lodge".into(),
            address: "12 Forest Rd, Gangneung".into(),
            phone: "010-1234-5678".into(),
            description: "Cabins with fenced yards".into(),
            max_pets: 2,
            pet_types: vec!["dog".into()],
        }
    }

    fn upload(kind: DocumentKind) -> DocumentUpload {
        DocumentUpload {
            kind,
            file_name: format!("{kind}.pdf"),
            content_type: Some("application/pdf".into()),
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    fn accepted(kind: DocumentKind) -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "documentType": kind.as_str(),
                "fileUrl": format!("/files/{kind}.pdf"),
                "uploadedAt": "2026-03-01T09:00:00Z"
            }
        })
    }

    #[rstest]
    #[case::blank_name(|b: &mut ServiceBasics| b.accommodation_name.clear(), "accommodationName")]
    #[case::no_digits(|b: &mut ServiceBasics| b.phone = "call me".into(), "phone")]
    #[case::no_pets(|b: &mut ServiceBasics| b.max_pets = 0, "maxPets")]
    #[case::no_species(|b: &mut ServiceBasics| b.pet_types.clear(), "petTypes")]
    fn basics_are_validated(
        mut basics: ServiceBasics,
        #[case] edit: fn(&mut ServiceBasics),
        #[case] field: &'static str,
    ) {
        edit(&mut basics);
        let mut wizard = OnboardingWizard::new();
        assert_eq!(
            wizard.submit_basics(basics),
            Err(OnboardingError::InvalidField { field })
        );
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
    }

    #[rstest]
    fn review_requires_every_document(basics: ServiceBasics) {
        let mut wizard = OnboardingWizard::new();
        wizard.submit_basics(basics).expect("valid basics");

        let err = wizard.advance_to_review().expect_err("documents outstanding");

        assert_eq!(
            err,
            OnboardingError::MissingDocuments {
                missing: DocumentKind::ALL.to_vec()
            }
        );
        assert_eq!(err.to_string(), "7 required document(s) missing");
    }

    #[rstest]
    #[tokio::test]
    async fn uploads_run_in_order_and_stop_at_first_failure(basics: ServiceBasics) {
        let harness = ClientHarness::new("/partner/onboarding", ScriptedTransport::new());
        harness
            .transport
            .respond_json(200, accepted(DocumentKind::BusinessRegistration))
            .respond_json(
                413,
                json!({"success": false, "error": "Payload Too Large", "message": "file too big"}),
            );
        let service = PartnerOnboardingService::new(harness.client.clone());
        let mut wizard = OnboardingWizard::new();
        wizard.submit_basics(basics).expect("valid basics");

        let envelope = service
            .upload_documents(
                &mut wizard,
                DocumentKind::ALL.into_iter().map(upload).collect(),
            )
            .await;

        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("file too big"));
        assert_eq!(harness.transport.requests().len(), 2);
        assert_eq!(wizard.missing_documents().len(), 6);
        let first = harness.transport.requests().remove(0);
        let RequestBody::Multipart(form) = first.body else {
            panic!("document upload must be multipart");
        };
        assert_eq!(form.field_names(), vec!["documentType", "file"]);
    }

    #[rstest]
    #[tokio::test]
    async fn full_flow_submits_once_reviewed(basics: ServiceBasics) {
        let harness =
            ClientHarness::new("/partner/onboarding", ScriptedTransport::new()).with_token("tok");
        for kind in DocumentKind::ALL {
            harness.transport.respond_json(200, accepted(kind));
        }
        harness
            .transport
            .respond_json(201, json!({"success": true, "data": {"serviceId": "svc-1"}}));
        let service = PartnerOnboardingService::new(harness.client.clone());
        let mut wizard = OnboardingWizard::new();
        wizard.submit_basics(basics).expect("valid basics");

        let early = service.submit_service(&mut wizard).await;
        assert_eq!(early.error.as_deref(), Some(VALIDATION_FAILED));

        let uploaded = service
            .upload_documents(
                &mut wizard,
                DocumentKind::ALL.into_iter().map(upload).collect(),
            )
            .await;
        assert_eq!(uploaded.data.map(|docs| docs.len()), Some(7));
        wizard.advance_to_review().expect("all documents present");

        let submitted = service.submit_service(&mut wizard).await;

        assert!(submitted.success);
        assert_eq!(wizard.step(), WizardStep::Submitted);
        let sent = harness.transport.last_request().expect("request recorded");
        assert_eq!(sent.url.path(), "/api/partner/services");
        assert_eq!(harness.transport.requests().len(), 8);
    }

    #[tokio::test]
    async fn oversized_documents_are_rejected_locally() {
        let harness = ClientHarness::new("/partner/onboarding", ScriptedTransport::new());
        let service = PartnerOnboardingService::new(harness.client.clone());
        let mut big = upload(DocumentKind::PropertyDeed);
        big.bytes = vec![0; MAX_DOCUMENT_BYTES + 1];

        let envelope = service.upload_document(big).await;

        assert_eq!(envelope.error.as_deref(), Some(VALIDATION_FAILED));
        assert!(harness.transport.requests().is_empty());
    }
}
