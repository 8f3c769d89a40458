//! Access Tokens
//!
//! Holds user and page access tokens. Tokens are acquired outside of
//! pagepurge (e.g. from the Graph API Explorer) and passed in on the
//! command line or through `PAGEPURGE_ACCESS_TOKEN`.

use crate::error::{GraphError, Result};
use std::fmt;

/// Environment variable consulted when no token is passed explicitly
pub const TOKEN_ENV_VAR: &str = "PAGEPURGE_ACCESS_TOKEN";

/// Permissions the token needs for listing and deleting page content
pub const REQUIRED_PERMISSIONS: &[&str] = &[
    "pages_manage_posts",
    "pages_read_engagement",
    "pages_show_list",
];

/// An opaque Graph API access token
///
/// `Debug` and `Display` never print the secret, so tokens can be carried
/// through structs that end up in log lines.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Parse a token, rejecting blank input
    pub fn parse(token: &str) -> Result<Self> {
        let token = Self::new(token);
        if token.is_empty() {
            return Err(GraphError::validation("Access token is required"));
        }
        Ok(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short, non-reversible hint for display ("EAAB…(182 chars)")
    pub fn hint(&self) -> String {
        let chars = self.0.chars().count();
        if chars <= 8 {
            return "****".to_string();
        }
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}…({} chars)", prefix, chars)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"<redacted>").finish()
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
