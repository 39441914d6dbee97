//! Authenticated request wrapper.
//!
//! Every page-level call goes through [`ApiClient`]. It attaches the stored
//! bearer token, parses the response envelope and classifies the outcome.
//! Nothing here returns `Err`: transport failures, unparseable bodies,
//! cancellations and authentication failures all come back as
//! `success: false` envelopes so callers branch on one field.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::auth_failure::{ResponseClass, classify_response};
use super::envelope::ApiEnvelope;
use super::ports::{
    ErrorNotice, ErrorPresenter, HttpTransport, SessionStore, TransportRequest, TransportResponse,
};
use super::request::{ApiRequest, HttpMethod, MultipartForm, RequestBody};
use super::session::{BearerToken, SessionKey};
use super::session_teardown::SessionTeardown;

const AUTHORIZATION: &str = "authorization";
const CONTENT_TYPE: &str = "content-type";
const ACCEPT: &str = "accept";
const APPLICATION_JSON: &str = "application/json";

/// Authenticated request wrapper.
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    teardown: SessionTeardown,
    presenter: Arc<dyn ErrorPresenter>,
}

impl ApiClient {
    /// Build a client that resolves relative paths against `base_url`.
    pub fn new(
        base_url: Url,
        transport: Arc<dyn HttpTransport>,
        teardown: SessionTeardown,
        presenter: Arc<dyn ErrorPresenter>,
    ) -> Self {
        Self {
            base_url,
            transport,
            teardown,
            presenter,
        }
    }

    /// Base URL relative paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Teardown handler invoked on authentication failures.
    pub fn teardown(&self) -> &SessionTeardown {
        &self.teardown
    }

    /// Session store the bearer token is read from.
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        self.teardown.store()
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> ApiEnvelope {
        self.request(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body.
    pub async fn post(&self, path: &str, body: Value) -> ApiEnvelope {
        self.request(ApiRequest::post(path).json(body)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put(&self, path: &str, body: Value) -> ApiEnvelope {
        self.request(ApiRequest::new(HttpMethod::Put, path).json(body))
            .await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> ApiEnvelope {
        self.request(ApiRequest::new(HttpMethod::Patch, path).json(body))
            .await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> ApiEnvelope {
        self.request(ApiRequest::new(HttpMethod::Delete, path)).await
    }

    /// `POST path` with a multipart body. No JSON content type is set so the
    /// transport can add the multipart boundary.
    pub async fn upload(&self, path: &str, form: MultipartForm) -> ApiEnvelope {
        self.request(ApiRequest::post(path).multipart(form)).await
    }

    /// Send a request and return its classified envelope.
    pub async fn request(&self, request: ApiRequest) -> ApiEnvelope {
        let ApiRequest {
            method,
            path,
            body,
            headers,
            cancellation,
            anonymous,
        } = request;

        let url = match self.resolve(&path) {
            Ok(url) => url,
            Err(error) => {
                warn!(%method, path = %path, error = %error, "request path could not be resolved");
                return ApiEnvelope::network_error();
            }
        };
        let headers = self.prepare_headers(headers, &body, anonymous);
        let outgoing = TransportRequest {
            method,
            url,
            headers,
            body,
        };

        let sending = self.transport.send(outgoing);
        let outcome = match cancellation {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(%method, path = %path, "request cancelled");
                    return ApiEnvelope::cancelled();
                }
                outcome = sending => outcome,
            },
            None => sending.await,
        };

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                warn!(%method, path = %path, error = %error, "request failed before a response arrived");
                return ApiEnvelope::network_error();
            }
        };
        self.finish(method, &path, response, anonymous)
    }

    /// Classify a response obtained outside [`ApiClient::request`].
    ///
    /// Applies the same side effects as a wrapped request: authentication
    /// failures end the session and application failures are presented.
    /// Returns the envelope the caller should continue with.
    pub fn check_response(&self, status: u16, envelope: ApiEnvelope) -> ApiEnvelope {
        self.dispatch(status, envelope, false)
    }

    fn finish(
        &self,
        method: HttpMethod,
        path: &str,
        response: TransportResponse,
        anonymous: bool,
    ) -> ApiEnvelope {
        match ApiEnvelope::from_wire(&response.body, response.status) {
            Ok(envelope) => self.dispatch(response.status, envelope, anonymous),
            Err(error) => {
                warn!(
                    %method,
                    path,
                    status = response.status,
                    error = %error,
                    "response body is not a JSON envelope"
                );
                ApiEnvelope::network_error()
            }
        }
    }

    fn dispatch(&self, status: u16, envelope: ApiEnvelope, anonymous: bool) -> ApiEnvelope {
        match classify_response(status, &envelope) {
            ResponseClass::Success => envelope,
            ResponseClass::AuthenticationFailure(reason) if !anonymous => {
                warn!(status, reason = ?reason, "authentication failure; ending session");
                self.teardown.handle_authentication_failure();
                ApiEnvelope::session_expired()
            }
            ResponseClass::AuthenticationFailure(_) | ResponseClass::ApplicationFailure => {
                let notice = ErrorNotice::from_envelope(status, &envelope);
                debug!(status, message = %notice.message, "request failed");
                self.presenter.present(&notice);
                envelope
            }
        }
    }

    fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        match Url::parse(path) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base_url.join(path),
            Err(error) => Err(error),
        }
    }

    fn prepare_headers(
        &self,
        supplied: BTreeMap<String, String>,
        body: &RequestBody,
        anonymous: bool,
    ) -> BTreeMap<String, String> {
        let mut headers: BTreeMap<String, String> = supplied
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        headers
            .entry(ACCEPT.to_owned())
            .or_insert_with(|| APPLICATION_JSON.to_owned());
        if !body.is_multipart() {
            headers
                .entry(CONTENT_TYPE.to_owned())
                .or_insert_with(|| APPLICATION_JSON.to_owned());
        }

        if anonymous || headers.contains_key(AUTHORIZATION) {
            return headers;
        }
        match self.bearer_token() {
            Some(token) => {
                debug!(token = %token.fingerprint(), "attaching bearer token");
                headers.insert(AUTHORIZATION.to_owned(), token.header_value().to_string());
            }
            None => debug!("no bearer token stored; sending without authorization"),
        }
        headers
    }

    fn bearer_token(&self) -> Option<BearerToken> {
        match self.session_store().get(SessionKey::AccessToken) {
            Ok(raw) => raw.and_then(BearerToken::new),
            Err(error) => {
                warn!(error = %error, "could not read bearer token from session storage");
                None
            }
        }
    }
}
