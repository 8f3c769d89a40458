//! Resource Kinds
//!
//! The three kinds of page content pagepurge can delete, and the Graph
//! endpoints each one maps to.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of page content targeted by a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Post,
    Photo,
    Video,
}

impl ResourceKind {
    /// Page edge used for listing (`/{page_id}/{edge}`)
    pub fn edge(&self) -> &'static str {
        match self {
            Self::Post => "posts",
            Self::Photo => "photos",
            Self::Video => "videos",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Photo => "photo",
            Self::Video => "video",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Post => "Posts",
            Self::Photo => "Photos",
            Self::Video => "Videos",
        }
    }

    /// Extra query parameters the listing edge needs
    ///
    /// The photos edge only returns photos the page uploaded itself when
    /// asked with `type=uploaded`; without it tagged photos are listed too,
    /// and those cannot be deleted by the page.
    pub fn listing_params(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Photo => &[("type", "uploaded")],
            Self::Post | Self::Video => &[],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "post" | "posts" => Ok(Self::Post),
            "photo" | "photos" => Ok(Self::Photo),
            "video" | "videos" => Ok(Self::Video),
            other => Err(format!("Unknown resource kind: {}", other)),
        }
    }
}
