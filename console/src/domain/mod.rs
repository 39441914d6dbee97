//! Domain model, ports and services.
//!
//! Nothing in here knows about reqwest, actix or the filesystem. Adapters
//! plug in through the traits in [`ports`].

pub mod api_client;
pub mod auth_failure;
pub mod auth_service;
pub mod chat;
pub mod envelope;
pub mod error_code;
pub mod notices;
pub mod partner_onboarding;
pub mod portal;
pub mod ports;
pub mod profile;
pub mod promotions;
pub mod request;
pub mod session;
pub mod session_teardown;

pub use self::api_client::ApiClient;
pub use self::auth_failure::{
    AuthFailureReason, ResponseClass, authentication_failure, classify_response,
    is_authentication_failure,
};
pub use self::auth_service::{AuthService, LoginCredentials, LoginCredentialsError};
pub use self::chat::{
    ChatMessage, ChatParticipant, ChatService, Conversation, ParticipantRole, ReadReceipt,
};
pub use self::envelope::ApiEnvelope;
pub use self::error_code::ApiErrorCode;
pub use self::partner_onboarding::{
    DocumentKind, DocumentUpload, OnboardingError, OnboardingWizard, PartnerOnboardingService,
    ServiceBasics, UploadedDocument, WizardStep,
};
pub use self::portal::Portal;
pub use self::profile::{AdminProfile, ProfileService, ProfileUpdate};
pub use self::promotions::{
    DiscountType, Promotion, PromotionDraft, PromotionDraftError, PromotionService,
};
pub use self::request::{ApiRequest, HttpMethod, MultipartForm, MultipartPart, RequestBody};
pub use self::session::{BearerToken, SessionKey, SessionUser, UserRole};
pub use self::session_teardown::{DEFAULT_REDIRECT_DELAY, SessionTeardown};
