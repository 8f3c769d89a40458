//! Gateway seam
//!
//! The deletion engine talks to the Graph API only through [`Gateway`], so a
//! campaign can be driven by [`GraphClient`](super::client::GraphClient) or by
//! a scripted stand-in in tests.

use super::auth::AccessToken;
use crate::error::{GraphError, Result};
use crate::resource::{PageCursor, ResourceKind};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Pass-through transport to the Graph API
///
/// Implementations perform exactly one outbound call per method, with no
/// retries, caching or pacing. Bodies are returned as received.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// List one page of `kind` items belonging to `page_id`
    async fn list_page(
        &self,
        kind: ResourceKind,
        page_id: &str,
        token: &AccessToken,
        limit: Option<u32>,
        after: Option<&PageCursor>,
    ) -> Result<Value>;

    /// Delete a single item
    async fn delete_item(
        &self,
        kind: ResourceKind,
        item_id: &str,
        token: &AccessToken,
    ) -> Result<Value>;

    /// List the pages the token's user manages (`me/accounts`)
    async fn list_owned_pages(&self, token: &AccessToken) -> Result<Value>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn list_page(
        &self,
        kind: ResourceKind,
        page_id: &str,
        token: &AccessToken,
        limit: Option<u32>,
        after: Option<&PageCursor>,
    ) -> Result<Value> {
        (**self).list_page(kind, page_id, token, limit, after).await
    }

    async fn delete_item(
        &self,
        kind: ResourceKind,
        item_id: &str,
        token: &AccessToken,
    ) -> Result<Value> {
        (**self).delete_item(kind, item_id, token).await
    }

    async fn list_owned_pages(&self, token: &AccessToken) -> Result<Value> {
        (**self).list_owned_pages(token).await
    }
}

/// Reject a blank access token before any request is made
pub fn require_token(token: &AccessToken) -> Result<()> {
    if token.is_empty() {
        return Err(GraphError::validation("Access token is required"));
    }
    Ok(())
}

/// Reject a blank identifier before any request is made
pub fn require_id(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GraphError::validation(format!("{} is required", what)));
    }
    Ok(())
}
