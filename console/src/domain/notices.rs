//! User-facing notice texts.
//!
//! The console and portal show Korean first with an English gloss, so every
//! fixed notice carries both.

/// Shown after an authentication failure, before the login redirect.
pub const SESSION_EXPIRED_MESSAGE: &str =
    "세션이 만료되었습니다. 다시 로그인해주세요. (Your session has expired. Please log in again.)";

/// Shown when the server could not be reached or answered with garbage.
pub const CANNOT_CONNECT_MESSAGE: &str = "서버에 연결할 수 없습니다. 네트워크 상태를 확인해주세요. \
     (Cannot connect to the server. Please check your network connection.)";

/// Shown when a request was cancelled before it completed.
pub const REQUEST_CANCELLED_MESSAGE: &str = "요청이 취소되었습니다. (The request was cancelled.)";

/// Default message for an application failure with the given HTTP status.
///
/// # Examples
/// ```
/// use pawstay_console::domain::notices::default_status_message;
///
/// assert!(default_status_message(404).contains("not found"));
/// ```
pub const fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "입력값을 확인해주세요. (Please check the values you entered.)",
        403 => "접근 권한이 없습니다. (You do not have permission to do this.)",
        404 => "요청한 정보를 찾을 수 없습니다. (The requested resource was not found.)",
        409 => "이미 처리되었거나 충돌이 발생했습니다. (The request conflicts with existing data.)",
        422 => "요청을 처리할 수 없습니다. (The request could not be processed.)",
        500 => "서버 오류가 발생했습니다. (A server error occurred.)",
        _ => "오류가 발생했습니다. (Something went wrong.)",
    }
}

/// Short dialog title for an HTTP status.
pub const fn status_title(status: u16) -> &'static str {
    match status {
        400 | 422 => "Validation error",
        403 => "Forbidden",
        404 => "Not found",
        409 => "Conflict",
        500..=599 => "Server error",
        _ => "Error",
    }
}
