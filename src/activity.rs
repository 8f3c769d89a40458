//! Activity Log
//!
//! Append-only, bounded history of what a campaign did: one entry per
//! deleted (or failed) item plus page and lifecycle milestones. Front-ends
//! render it as the scrolling log panel.

use crate::campaign::{CampaignEvent, CampaignStatus};
use crate::resource::{DeletionOutcome, ResourceKind};
use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Default number of entries kept before the oldest are dropped
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Severity of an activity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ActivityLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }
}

/// A single log line
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub level: ActivityLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

impl ActivityEntry {
    pub fn new(level: ActivityLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Local::now(),
        }
    }

    /// `HH:MM:SS ✓ message`
    pub fn display_line(&self) -> String {
        format!(
            "{} {} {}",
            self.at.format("%H:%M:%S"),
            self.level.icon(),
            self.message
        )
    }
}

/// Bounded activity history (oldest first)
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    max_entries: usize,
    target: Option<ResourceKind>,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ActivityLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
            target: None,
        }
    }

    pub fn push(&mut self, level: ActivityLevel, message: impl Into<String>) {
        self.entries.push_back(ActivityEntry::new(level, message));
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ActivityLevel::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ActivityLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ActivityLevel::Error, message);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ActivityEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ActivityEntry> {
        self.entries.back()
    }

    /// Turn an engine event into log entries
    pub fn record_event(&mut self, event: &CampaignEvent) {
        match event {
            CampaignEvent::Started { target, page_id, .. } => {
                self.target = Some(*target);
                self.info(format!(
                    "Started deleting {} from page {}",
                    target.edge(),
                    page_id
                ));
            },
            CampaignEvent::PageLoaded {
                page_number,
                items,
                has_more,
                ..
            } => {
                if *items == 0 {
                    self.info(format!("Page {} is empty, nothing left to delete", page_number));
                } else {
                    let more = if *has_more { ", more pages follow" } else { "" };
                    self.info(format!("Page {}: {} items{}", page_number, items, more));
                }
            },
            CampaignEvent::ItemFinished {
                item_id, outcome, ..
            } => {
                let kind = self.target.map(|t| t.singular()).unwrap_or("item");
                match outcome {
                    DeletionOutcome::Success => {
                        self.push(ActivityLevel::Success, format!("Deleted {} {}", kind, item_id))
                    },
                    DeletionOutcome::Rejected(reason) => self.error(format!(
                        "Could not delete {} {}: {}",
                        kind, item_id, reason
                    )),
                    DeletionOutcome::TransportError(reason) => {
                        self.error(format!("Error: {} - {}", item_id, reason))
                    },
                }
            },
            CampaignEvent::Finished {
                status,
                progress,
                error,
            } => match status {
                CampaignStatus::Stopped => self.warning("Operation stopped by user"),
                CampaignStatus::Failed => self.error(format!(
                    "Campaign aborted: {}",
                    error.as_deref().unwrap_or("unknown error")
                )),
                _ => self.push(
                    ActivityLevel::Success,
                    format!(
                        "Finished! Deleted: {}, failed: {}",
                        progress.succeeded, progress.failed
                    ),
                ),
            },
        }
    }
}
