//! Graph API interaction module
//!
//! This module is the transport gateway: it turns list/delete requests into
//! single outbound calls to the Graph API and relays the JSON it gets back.
//!
//! # Module Structure
//!
//! - [`auth`] - Access token handling and redaction
//! - [`gateway`] - The [`Gateway`] trait the deletion engine depends on
//! - [`client`] - Graph client and endpoint construction
//! - [`http`] - HTTP utilities and error formatting
//! - [`pages`] - Listing managed pages and resolving page tokens
//!
//! # Example
//!
//! ```ignore
//! use pagepurge::graph::{AccessToken, Gateway, GraphClient};
//! use pagepurge::resource::ResourceKind;
//!
//! async fn example() -> pagepurge::error::Result<()> {
//!     let client = GraphClient::new("https://graph.facebook.com", "v18.0", Duration::from_secs(30))?;
//!     let token = AccessToken::parse("EAAB...")?;
//!     let body = client.list_page(ResourceKind::Post, "1234", &token, None, None).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod gateway;
pub mod http;
pub mod pages;

pub use auth::AccessToken;
pub use client::GraphClient;
pub use gateway::Gateway;
pub use http::format_graph_error;
