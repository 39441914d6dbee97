//! The two tenants served by this client.

use serde::{Deserialize, Serialize};

/// Section of the web app a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    /// Operator console under `/admin`.
    Admin,
    /// Partner portal (everything else).
    Partner,
}

impl Portal {
    /// Resolve the portal from a page path.
    ///
    /// # Examples
    /// ```
    /// use pawstay_console::domain::Portal;
    ///
    /// assert_eq!(Portal::from_path("/admin/promotions"), Portal::Admin);
    /// assert_eq!(Portal::from_path("/partner/services"), Portal::Partner);
    /// ```
    pub fn from_path(path: &str) -> Self {
        if path.starts_with("/admin") {
            Self::Admin
        } else {
            Self::Partner
        }
    }

    /// Page the user is sent to when their session ends.
    pub const fn login_page(self) -> &'static str {
        match self {
            Self::Admin => "/admin/login",
            Self::Partner => "/login",
        }
    }

    /// API endpoint that opens a session for this portal.
    pub const fn login_endpoint(self) -> &'static str {
        match self {
            Self::Admin => "/api/admin/login",
            Self::Partner => "/api/auth/login",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/admin", Portal::Admin, "/admin/login")]
    #[case("/admin/chats/42", Portal::Admin, "/admin/login")]
    #[case("/", Portal::Partner, "/login")]
    #[case("/partner/create-service", Portal::Partner, "/login")]
    fn login_destination_follows_path_prefix(
        #[case] path: &str,
        #[case] portal: Portal,
        #[case] login: &str,
    ) {
        assert_eq!(Portal::from_path(path), portal);
        assert_eq!(portal.login_page(), login);
    }
}
