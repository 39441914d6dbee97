//! Behaviour tests for the installable mock API interception.

use std::cell::RefCell;

use pagination::PageRequest;
use pawstay_console::domain::envelope::NETWORK_ERROR;
use pawstay_console::domain::{ApiEnvelope, LoginCredentials, Portal, Promotion, UserRole};
use pawstay_console::{ClientSettings, ConsoleRuntime};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct SimulationWorld {
    runtime: Runtime,
    console: RefCell<Option<ConsoleRuntime>>,
    promotions: RefCell<Option<ApiEnvelope<Vec<Promotion>>>>,
}

impl SimulationWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        Self {
            runtime,
            console: RefCell::new(None),
            promotions: RefCell::new(None),
        }
    }

    fn with_console<R>(&self, f: impl FnOnce(&ConsoleRuntime) -> R) -> R {
        let console = self.console.borrow();
        f(console.as_ref().expect("console should be running"))
    }

    fn promotions(&self) -> ApiEnvelope<Vec<Promotion>> {
        self.promotions
            .borrow()
            .clone()
            .expect("promotions should have been requested")
    }
}

#[fixture]
fn world() -> SimulationWorld {
    SimulationWorld::new()
}

#[given("the console runs with the mock API on page {page}")]
fn the_console_runs_with_the_mock_api_on_page(world: &SimulationWorld, page: String) {
    // Port 9 (discard) is closed on test hosts, so real requests fail fast.
    let settings = ClientSettings {
        base_url: Some("http://127.0.0.1:9/".to_owned()),
        use_mock_api: true,
        session_file: None,
        current_path: Some(page),
        mock_latency_ms: Some(0),
        redirect_delay_ms: Some(0),
        request_timeout_secs: Some(2),
    };
    let console = ConsoleRuntime::from_settings(&settings).expect("runtime builds");
    *world.console.borrow_mut() = Some(console);
}

#[given("the interceptor is removed")]
fn the_interceptor_is_removed(world: &SimulationWorld) {
    world.with_console(|console| assert!(console.interceptor().uninstall()));
}

#[when("promotions page {page} with limit {limit} is requested")]
fn promotions_page_with_limit_is_requested(world: &SimulationWorld, page: u64, limit: u64) {
    let service = world.with_console(ConsoleRuntime::promotions);
    let request = PageRequest::new(page, limit).expect("valid page request");
    let envelope = world.runtime.block_on(service.list(request));
    *world.promotions.borrow_mut() = Some(envelope);
}

#[when("the admin signs in as {email}")]
fn the_admin_signs_in_as(world: &SimulationWorld, email: String) {
    let auth = world.with_console(ConsoleRuntime::auth);
    let credentials = LoginCredentials::try_from_parts(&email, "pw").expect("valid credentials");
    let envelope = world.runtime.block_on(auth.login(&credentials, Portal::Admin));
    assert!(envelope.success, "{envelope:?}");
}

#[then("the response succeeds with {count} items")]
fn the_response_succeeds_with_items(world: &SimulationWorld, count: usize) {
    let envelope = world.promotions();
    assert!(envelope.success, "{envelope:?}");
    assert_eq!(envelope.data.map(|items| items.len()), Some(count));
}

#[then("the pagination reports {pages} pages")]
fn the_pagination_reports_pages(world: &SimulationWorld, pages: u64) {
    let pagination = world.promotions().pagination.expect("pagination block");
    assert_eq!(pagination.total_pages, pages);
}

#[then("the response reports a network error")]
fn the_response_reports_a_network_error(world: &SimulationWorld) {
    let envelope = world.promotions();
    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some(NETWORK_ERROR));
}

#[then("the stored user has the admin role")]
fn the_stored_user_has_the_admin_role(world: &SimulationWorld) {
    world.with_console(|console| {
        let user = console.auth().current_user().expect("user stored");
        assert_eq!(user.role, UserRole::Admin);
        assert!(console.auth().is_signed_in());
    });
}

#[scenario(path = "tests/features/mock_api_simulation.feature")]
fn mock_api_simulation(world: SimulationWorld) {
    drop(world);
}
