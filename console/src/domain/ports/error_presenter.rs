//! Driven port for showing application errors to the user.

use crate::domain::envelope::ApiEnvelope;
use crate::domain::notices::{default_status_message, status_title};

/// What the user should be told about a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    /// HTTP status of the failed response.
    pub status: u16,
    /// Short title derived from the status.
    pub title: &'static str,
    /// Message from the envelope, or the status default.
    pub message: String,
}

impl ErrorNotice {
    /// Build a notice for a failed envelope.
    ///
    /// # Examples
    /// ```
    /// use pawstay_console::domain::ApiEnvelope;
    /// use pawstay_console::domain::ports::ErrorNotice;
    ///
    /// let envelope: ApiEnvelope = ApiEnvelope::failure("Conflict", "code already used");
    /// let notice = ErrorNotice::from_envelope(409, &envelope);
    /// assert_eq!(notice.title, "Conflict");
    /// assert_eq!(notice.message, "code already used");
    /// ```
    pub fn from_envelope<T>(status: u16, envelope: &ApiEnvelope<T>) -> Self {
        let message = envelope
            .display_message()
            .filter(|text| !text.trim().is_empty())
            .map_or_else(|| default_status_message(status).to_owned(), str::to_owned);
        Self {
            status,
            title: status_title(status),
            message,
        }
    }
}

/// Port for the error toast/dialog collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorPresenter: Send + Sync {
    /// Show `notice`.
    fn present(&self, notice: &ErrorNotice);
}

/// Presenter that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentErrorPresenter;

impl ErrorPresenter for SilentErrorPresenter {
    fn present(&self, _notice: &ErrorNotice) {}
}
