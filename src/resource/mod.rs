//! Resource abstraction layer
//!
//! Describes the deletable content kinds and interprets the raw JSON the
//! gateway relays for them.
//!
//! # Architecture
//!
//! - [`kind`] - Post/photo/video kinds and their listing edges
//! - [`response`] - Listing pages, cursors and deletion outcome classification
//!
//! # Example
//!
//! ```ignore
//! use pagepurge::resource::{parse_listing, ResourceKind};
//!
//! async fn first_ids(gateway: &impl Gateway, token: &AccessToken) -> anyhow::Result<Vec<String>> {
//!     let body = gateway.list_page(ResourceKind::Post, "1234", token, None, None).await?;
//!     Ok(parse_listing(&body)?.items.into_iter().map(|item| item.id).collect())
//! }
//! ```

pub mod kind;
pub mod response;

pub use kind::ResourceKind;
pub use response::{
    api_error_message, parse_listing, DeletionOutcome, ListingPage, PageCursor, ResourceItem,
};
