//! Ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod error_presenter;
mod http_transport;
mod navigator;
mod session_store;
mod sleeper;

#[cfg(test)]
pub use error_presenter::MockErrorPresenter;
pub use error_presenter::{ErrorNotice, ErrorPresenter, SilentErrorPresenter};
#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{InMemorySessionStore, SessionStore, SessionStoreError};
pub use sleeper::Sleeper;
