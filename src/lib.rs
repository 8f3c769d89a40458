//! pagepurge
//!
//! Bulk-deletes the posts, photos or videos of a Facebook page through the
//! Graph API. The [`campaign`] engine walks the paginated listing and
//! deletes item by item at a fixed pace; [`graph`] is the transport it
//! drives.

pub mod activity;
pub mod campaign;
pub mod config;
pub mod error;
pub mod graph;
pub mod resource;

/// Version injected at compile time via PAGEPURGE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("PAGEPURGE_VERSION") {
    Some(v) => v,
    None => "dev",
};
