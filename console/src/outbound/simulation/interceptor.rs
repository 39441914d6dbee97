//! Transport decorator answering admin API calls from the [`MockRouter`].
//!
//! The interceptor owns the transport it wraps, so uninstalling always
//! restores the original behaviour. A request is diverted only while the
//! interceptor is installed, simulation is enabled, the URL path contains
//! `/api/`, and the current page is in the admin section.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::router::{MOCK_API_ERROR, MockRouter};
use crate::domain::ports::{
    HttpTransport, Navigator, TransportError, TransportRequest, TransportResponse,
};
use crate::domain::{MultipartForm, Portal, RequestBody};

/// Value of the `_placeholder` marker that stands in for multipart bodies.
pub const MULTIPART_PLACEHOLDER: &str = "multipart";

/// JSON stand-in for a multipart body: the marker plus its field names.
///
/// # Examples
/// ```
/// use pawstay_console::domain::MultipartForm;
/// use pawstay_console::outbound::simulation::multipart_placeholder;
///
/// let form = MultipartForm::new().text("documentType", "bank_account");
/// let marker = multipart_placeholder(&form);
/// assert_eq!(marker["_placeholder"], "multipart");
/// assert_eq!(marker["fields"][0], "documentType");
/// ```
pub fn multipart_placeholder(form: &MultipartForm) -> Value {
    json!({
        "_placeholder": MULTIPART_PLACEHOLDER,
        "fields": form.field_names(),
    })
}

/// Installable interception shim.
pub struct FetchInterceptor {
    original: Arc<dyn HttpTransport>,
    router: MockRouter,
    navigator: Arc<dyn Navigator>,
    simulation_enabled: bool,
    installed: AtomicBool,
}

impl FetchInterceptor {
    /// Wrap `original`. The shim starts uninstalled.
    pub fn new(
        original: Arc<dyn HttpTransport>,
        router: MockRouter,
        navigator: Arc<dyn Navigator>,
        simulation_enabled: bool,
    ) -> Self {
        Self {
            original,
            router,
            navigator,
            simulation_enabled,
            installed: AtomicBool::new(false),
        }
    }

    /// Start diverting. Returns `false` when already installed.
    pub fn install(&self) -> bool {
        let changed = !self.installed.swap(true, Ordering::AcqRel);
        if changed {
            info!(simulation = self.simulation_enabled, "mock API interception installed");
        }
        changed
    }

    /// Stop diverting. Returns `false` when not installed.
    pub fn uninstall(&self) -> bool {
        let changed = self.installed.swap(false, Ordering::AcqRel);
        if changed {
            info!("mock API interception removed");
        }
        changed
    }

    /// Whether the shim is installed.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// The wrapped transport.
    pub fn original(&self) -> &Arc<dyn HttpTransport> {
        &self.original
    }

    /// Whether `request` would be answered by the router.
    pub fn diverts(&self, request: &TransportRequest) -> bool {
        self.is_installed()
            && self.simulation_enabled
            && request.url.path().contains("/api/")
            && Portal::from_path(&self.navigator.current_path()) == Portal::Admin
    }

    async fn simulate(&self, request: TransportRequest) -> TransportResponse {
        let body = match &request.body {
            RequestBody::Empty => None,
            RequestBody::Json(value) => Some(value.clone()),
            RequestBody::Multipart(form) => Some(multipart_placeholder(form)),
        };
        debug!(method = %request.method, url = %request.url, "answering from mock router");
        let envelope = self
            .router
            .respond(request.url.as_str(), request.method, body.as_ref())
            .await;
        let status = if envelope.success { 200 } else { 400 };
        match serde_json::to_vec(&envelope) {
            Ok(bytes) => TransportResponse {
                status,
                body: bytes,
            },
            Err(error) => {
                warn!(error = %error, "mock envelope could not be serialised");
                TransportResponse::json(
                    500,
                    &json!({
                        "success": false,
                        "error": MOCK_API_ERROR,
                        "message": error.to_string(),
                    }),
                )
            }
        }
    }
}

#[async_trait]
impl HttpTransport for FetchInterceptor {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        if self.diverts(&request) {
            return Ok(self.simulate(request).await);
        }
        self.original.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use rstest::{fixture, rstest};
    use url::Url;

    use super::*;
    use crate::domain::HttpMethod;
    use crate::domain::ports::MockHttpTransport;
    use crate::test_support::{FixedClock, ImmediateSleeper, RecordingNavigator};

    fn router() -> MockRouter {
        MockRouter::new(
            Arc::new(FixedClock::default()),
            Arc::new(ImmediateSleeper),
            Duration::ZERO,
        )
    }

    fn request(method: HttpMethod, url: &str, body: RequestBody) -> TransportRequest {
        TransportRequest {
            method,
            url: Url::parse(url).expect("valid url"),
            headers: BTreeMap::new(),
            body,
        }
    }

    fn decode(response: &TransportResponse) -> Value {
        serde_json::from_slice(&response.body).expect("shim answers JSON")
    }

    #[fixture]
    fn never_called() -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        transport
    }

    #[fixture]
    fn passthrough() -> MockHttpTransport {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(TransportResponse::json(200, &json!({"real": true}))));
        transport
    }

    fn interceptor(transport: MockHttpTransport, page: &str, enabled: bool) -> FetchInterceptor {
        FetchInterceptor::new(
            Arc::new(transport),
            router(),
            Arc::new(RecordingNavigator::new(page)),
            enabled,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn admin_api_calls_never_reach_the_network(never_called: MockHttpTransport) {
        let shim = interceptor(never_called, "/admin/promotions", true);
        shim.install();

        let response = shim
            .send(request(
                HttpMethod::Get,
                "https://api.pawstay.kr/api/admin/promotions?page=1&limit=10",
                RequestBody::Empty,
            ))
            .await
            .expect("diverted requests never fail");

        assert_eq!(response.status, 200);
        let body = decode(&response);
        assert_eq!(body["success"], true);
        assert!(body.get("data").is_some());
    }

    #[rstest]
    #[case::partner_page("/partner/chat", true, "https://api.pawstay.kr/api/admin/users")]
    #[case::simulation_off("/admin/users", false, "https://api.pawstay.kr/api/admin/users")]
    #[case::not_api("/admin/users", true, "https://cdn.pawstay.kr/images/logo.png")]
    #[tokio::test]
    async fn other_traffic_passes_through(
        passthrough: MockHttpTransport,
        #[case] page: &str,
        #[case] enabled: bool,
        #[case] url: &str,
    ) {
        let shim = interceptor(passthrough, page, enabled);
        shim.install();

        let response = shim
            .send(request(HttpMethod::Get, url, RequestBody::Empty))
            .await
            .expect("original transport answers");

        assert_eq!(decode(&response), json!({"real": true}));
    }

    #[rstest]
    #[tokio::test]
    async fn uninstall_restores_the_original(passthrough: MockHttpTransport) {
        let shim = interceptor(passthrough, "/admin", true);
        assert!(shim.install());
        assert!(!shim.install(), "second install changes nothing");
        assert!(shim.uninstall());
        assert!(!shim.uninstall(), "second uninstall changes nothing");

        let response = shim
            .send(request(
                HttpMethod::Get,
                "https://api.pawstay.kr/api/admin/stats",
                RequestBody::Empty,
            ))
            .await
            .expect("original transport answers");

        assert_eq!(decode(&response), json!({"real": true}));
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_reported_with_status_400(never_called: MockHttpTransport) {
        let shim = interceptor(never_called, "/admin/chat", true);
        shim.install();

        let response = shim
            .send(request(
                HttpMethod::Post,
                "https://api.pawstay.kr/api/chats/conversations/conv-1/messages",
                RequestBody::Json(json!(["not", "an", "object"])),
            ))
            .await
            .expect("diverted requests never fail");

        assert_eq!(response.status, 400);
        assert_eq!(decode(&response)["error"], MOCK_API_ERROR);
    }

    #[rstest]
    #[tokio::test]
    async fn multipart_bodies_are_routed_as_placeholders(never_called: MockHttpTransport) {
        let shim = interceptor(never_called, "/admin/profile", true);
        shim.install();
        let form = MultipartForm::new().file("avatar", "me.png", Some("image/png"), vec![1, 2]);

        let response = shim
            .send(request(
                HttpMethod::Post,
                "https://api.pawstay.kr/api/admin/profile/avatar",
                RequestBody::Multipart(form),
            ))
            .await
            .expect("diverted requests never fail");

        assert_eq!(response.status, 200);
        assert_eq!(
            decode(&response)["data"]["avatarUrl"],
            "/mock/avatars/admin-1.png"
        );
    }

    #[test]
    fn placeholder_lists_field_names_in_order() {
        let form = MultipartForm::new()
            .text("documentType", "identity_card")
            .file("file", "id.png", None, Vec::new());

        assert_eq!(
            multipart_placeholder(&form),
            json!({"_placeholder": "multipart", "fields": ["documentType", "file"]})
        );
    }
}
