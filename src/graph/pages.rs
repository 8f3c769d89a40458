//! Owned Pages
//!
//! Functions for listing the pages a user manages and picking the token a
//! campaign should run with.

use super::auth::AccessToken;
use super::gateway::Gateway;
use crate::error::{GraphError, Result};
use crate::resource::api_error_message;
use serde_json::Value;

/// A page the token's user manages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPage {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    /// Page-scoped token handed out by `me/accounts`
    pub access_token: Option<AccessToken>,
}

impl OwnedPage {
    /// Token to delete this page's content with: the page token when the
    /// listing supplied one, otherwise the user token
    pub fn campaign_token(&self, user_token: &AccessToken) -> AccessToken {
        self.access_token
            .clone()
            .unwrap_or_else(|| user_token.clone())
    }
}

impl From<&Value> for OwnedPage {
    fn from(value: &Value) -> Self {
        Self {
            id: value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            name: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            category: value
                .get("category")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            access_token: value
                .get("access_token")
                .and_then(|v| v.as_str())
                .map(AccessToken::new)
                .filter(|t| !t.is_empty()),
        }
    }
}

/// Parse an owned-pages listing body
pub fn parse_pages(body: &Value) -> Result<Vec<OwnedPage>> {
    if let Some(message) = api_error_message(body) {
        return Err(GraphError::Rejected(message));
    }

    let pages = body
        .get("data")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter(|p| p.get("id").and_then(|v| v.as_str()).is_some())
                .map(OwnedPage::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(pages)
}

/// List the pages the user manages
pub async fn list_pages<G: Gateway + ?Sized>(
    gateway: &G,
    user_token: &AccessToken,
) -> Result<Vec<OwnedPage>> {
    let body = gateway.list_owned_pages(user_token).await?;
    let pages = parse_pages(&body)?;
    tracing::info!("Found {} managed pages", pages.len());
    Ok(pages)
}

/// Find a page by id
pub fn resolve_page<'a>(pages: &'a [OwnedPage], page_id: &str) -> Result<&'a OwnedPage> {
    pages
        .iter()
        .find(|p| p.id == page_id)
        .ok_or_else(|| GraphError::validation(format!("Page {} is not managed by this token", page_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn accounts() -> Value {
        json!({
            "data": [
                {"id": "111", "name": "Bakery", "category": "Food", "access_token": "PAGE111"},
                {"id": "222", "name": "Band"},
                {"name": "no id"}
            ]
        })
    }

    #[test]
    fn test_parse_pages() {
        let pages = parse_pages(&accounts()).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].name, "Bakery");
        assert_eq!(pages[0].category.as_deref(), Some("Food"));
        assert_eq!(pages[1].access_token, None);
    }

    #[test]
    fn test_parse_pages_error_body() {
        let body = json!({"error": {"message": "Invalid OAuth access token."}});
        assert!(matches!(parse_pages(&body), Err(GraphError::Rejected(_))));
    }

    #[test]
    fn test_campaign_token_prefers_page_token() {
        let pages = parse_pages(&accounts()).unwrap();
        let user = AccessToken::new("USER");

        let bakery = resolve_page(&pages, "111").unwrap();
        assert_eq!(bakery.campaign_token(&user).as_str(), "PAGE111");

        let band = resolve_page(&pages, "222").unwrap();
        assert_eq!(band.campaign_token(&user).as_str(), "USER");

        assert!(resolve_page(&pages, "333").unwrap_err().is_validation());
    }
}
