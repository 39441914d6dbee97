//! Error presenter that writes notices to the log.

use tracing::warn;

use crate::domain::ports::{ErrorNotice, ErrorPresenter};

/// [`ErrorPresenter`] emitting each notice as a `warn` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorPresenter;

impl ErrorPresenter for TracingErrorPresenter {
    fn present(&self, notice: &ErrorNotice) {
        warn!(
            status = notice.status,
            title = notice.title,
            message = %notice.message,
            "request failed"
        );
    }
}
