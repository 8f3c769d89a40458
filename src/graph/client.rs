//! Graph Client
//!
//! Main client for the Graph API, combining the HTTP wrapper with endpoint
//! construction for pages, listings and item deletion.

use super::auth::AccessToken;
use super::gateway::{require_id, require_token, Gateway, DEFAULT_LIST_LIMIT};
use super::http::GraphHttpClient;
use crate::error::{GraphError, Result};
use crate::resource::{PageCursor, ResourceKind};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Public Graph API host
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

/// Graph API version the endpoints were written against
pub const DEFAULT_API_VERSION: &str = "v18.0";

/// Main Graph API client
#[derive(Clone, Debug)]
pub struct GraphClient {
    pub http: GraphHttpClient,
    base_url: Url,
    api_version: String,
}

impl GraphClient {
    /// Create a new client for `base_url` (scheme and host, optionally a path prefix)
    pub fn new(base_url: &str, api_version: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GraphError::validation(format!("Invalid API base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GraphError::validation(format!(
                "Invalid API base URL '{}'",
                base_url
            )));
        }

        Ok(Self {
            http: GraphHttpClient::new(timeout)?,
            base_url,
            api_version: api_version.trim_matches('/').to_string(),
        })
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build a versioned endpoint URL from path segments
    ///
    /// Segments are percent-encoded individually, so ids containing `/` or
    /// `?` cannot escape their segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| GraphError::validation("API base URL cannot carry a path"))?;
            path.pop_if_empty();
            if !self.api_version.is_empty() {
                path.push(&self.api_version);
            }
            path.extend(segments);
        }
        Ok(url)
    }

    /// `/{version}/{page_id}/{edge}`
    pub fn listing_url(&self, kind: ResourceKind, page_id: &str) -> Result<Url> {
        self.endpoint(&[page_id, kind.edge()])
    }

    /// `/{version}/{item_id}`
    pub fn item_url(&self, item_id: &str) -> Result<Url> {
        self.endpoint(&[item_id])
    }

    /// `/{version}/me/accounts`
    pub fn accounts_url(&self) -> Result<Url> {
        self.endpoint(&["me", "accounts"])
    }
}

#[async_trait]
impl Gateway for GraphClient {
    async fn list_page(
        &self,
        kind: ResourceKind,
        page_id: &str,
        token: &AccessToken,
        limit: Option<u32>,
        after: Option<&PageCursor>,
    ) -> Result<Value> {
        require_id(page_id, "Page ID")?;
        require_token(token)?;

        let url = self.listing_url(kind, page_id)?;
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).to_string();

        let mut query: Vec<(&str, &str)> = kind.listing_params().to_vec();
        query.push(("limit", &limit));
        query.push(("access_token", token.as_str()));
        if let Some(cursor) = after {
            query.push(("after", cursor.as_str()));
        }

        tracing::debug!("Listing {} for page {} (after: {:?})", kind.edge(), page_id, after);
        self.http.get(&url, &query).await
    }

    async fn delete_item(
        &self,
        kind: ResourceKind,
        item_id: &str,
        token: &AccessToken,
    ) -> Result<Value> {
        require_id(item_id, "Item ID")?;
        require_token(token)?;

        let url = self.item_url(item_id)?;
        tracing::debug!("Deleting {} {}", kind, item_id);
        self.http.delete(&url, &[("access_token", token.as_str())]).await
    }

    async fn list_owned_pages(&self, token: &AccessToken) -> Result<Value> {
        require_token(token)?;

        let url = self.accounts_url()?;
        self.http.get(&url, &[("access_token", token.as_str())]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GraphClient {
        GraphClient::new(base, DEFAULT_API_VERSION, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client(DEFAULT_BASE_URL);
        assert_eq!(
            client.listing_url(ResourceKind::Photo, "1234").unwrap().as_str(),
            "https://graph.facebook.com/v18.0/1234/photos"
        );
        assert_eq!(
            client.item_url("1234_5678").unwrap().as_str(),
            "https://graph.facebook.com/v18.0/1234_5678"
        );
        assert_eq!(
            client.accounts_url().unwrap().as_str(),
            "https://graph.facebook.com/v18.0/me/accounts"
        );
    }

    #[test]
    fn test_item_ids_stay_in_one_segment() {
        let client = client("http://localhost:8080/proxy/");
        let url = client.item_url("a/b?c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v18.0/a%2Fb%3Fc");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = GraphClient::new("not a url", DEFAULT_API_VERSION, Duration::from_secs(1)).unwrap_err();
        assert!(err.is_validation());
        let err = GraphClient::new("mailto:me@example.com", DEFAULT_API_VERSION, Duration::from_secs(1))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_before_sending() {
        let client = client("http://127.0.0.1:9");
        let token = AccessToken::new("");

        let err = client
            .list_page(ResourceKind::Post, "1234", &token, None, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = client.delete_item(ResourceKind::Post, "1", &token).await.unwrap_err();
        assert!(err.is_validation());

        let err = client.list_owned_pages(&token).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_missing_page_id_is_rejected() {
        let client = client("http://127.0.0.1:9");
        let err = client
            .list_page(ResourceKind::Video, " ", &AccessToken::new("t"), None, None)
            .await
            .unwrap_err();
        assert_eq!(err, GraphError::validation("Page ID is required"));
    }
}
