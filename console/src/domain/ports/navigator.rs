//! Driven port for page location and navigation.

/// Knows which page is showing and can move to another one.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Path of the current page, e.g. `/admin/promotions`.
    fn current_path(&self) -> String;

    /// Replace the current page with `destination`.
    fn navigate(&self, destination: &str);
}
