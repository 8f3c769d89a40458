//! Response interpretation
//!
//! The gateway relays raw JSON bodies. This module turns them into listing
//! pages and per-item deletion outcomes.

use crate::error::{GraphError, Result};
use serde_json::Value;
use std::fmt;

/// Opaque identifier of a deletable item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceItem {
    pub id: String,
}

impl ResourceItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Opaque pagination cursor returned by a listing call
#[derive(Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    /// Empty cursors mean "no further pages" and are treated as absent
    pub fn new(cursor: impl Into<String>) -> Option<Self> {
        let cursor = cursor.into();
        if cursor.is_empty() {
            None
        } else {
            Some(Self(cursor))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cursors are long base64 blobs; keep log lines short
        let shown: String = self.0.chars().take(12).collect();
        if shown.len() < self.0.len() {
            write!(f, "PageCursor({}…)", shown)
        } else {
            write!(f, "PageCursor({})", shown)
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    pub items: Vec<ResourceItem>,
    /// Entries in the raw `data` array, usable or not
    pub listed: usize,
    pub next_cursor: Option<PageCursor>,
}

impl ListingPage {
    /// True when the listing itself returned nothing
    pub fn is_empty(&self) -> bool {
        self.listed == 0
    }

    /// Entries dropped for lacking an id
    pub fn skipped(&self) -> usize {
        self.listed.saturating_sub(self.items.len())
    }
}

/// Parse a listing body (`{data: [...], paging: {cursors: {after}}}`)
///
/// A body carrying an `error` member is a rejection. A body without `data`
/// is an empty page. Entries without an id are dropped from `items` but
/// still count in `listed`.
pub fn parse_listing(body: &Value) -> Result<ListingPage> {
    if let Some(message) = api_error_message(body) {
        return Err(GraphError::Rejected(message));
    }

    let data = body
        .get("data")
        .and_then(|v| v.as_array())
        .map(|arr| arr.as_slice())
        .unwrap_or_default();

    let items = data
        .iter()
        .filter_map(|entry| match entry.get("id").and_then(id_as_string) {
            Some(id) => Some(ResourceItem::new(id)),
            None => {
                tracing::warn!("Skipping listing entry without id");
                None
            },
        })
        .collect();

    let next_cursor = body
        .get("paging")
        .and_then(|v| v.get("cursors"))
        .and_then(|v| v.get("after"))
        .and_then(|v| v.as_str())
        .and_then(PageCursor::new);

    Ok(ListingPage {
        items,
        listed: data.len(),
        next_cursor,
    })
}

fn id_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract the message of an API error body, if the body is one
///
/// Graph errors look like `{"error": {"message": "...", "code": 190}}`;
/// a bare `{"error": "..."}` string is accepted as well.
pub fn api_error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => Some(
            map.get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown API error")
                .to_string(),
        ),
        other => Some(other.to_string()),
    }
}

/// Result of a single delete call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Success,
    /// The API answered without `success: true`
    Rejected(String),
    /// The call itself failed
    TransportError(String),
}

impl DeletionOutcome {
    /// Classify a gateway delete result
    pub fn classify(result: std::result::Result<Value, GraphError>) -> Self {
        match result {
            Ok(body) => Self::from_body(&body),
            Err(GraphError::Rejected(reason)) => Self::Rejected(reason),
            Err(err) => Self::TransportError(err.to_string()),
        }
    }

    /// Classify a delete response body. Only `{"success": true}` counts.
    pub fn from_body(body: &Value) -> Self {
        if body.get("success").and_then(|v| v.as_bool()) == Some(true) {
            return Self::Success;
        }
        let reason = api_error_message(body)
            .unwrap_or_else(|| "API did not report success".to_string());
        Self::Rejected(reason)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Rejected(reason) | Self::TransportError(reason) => Some(reason),
        }
    }
}
