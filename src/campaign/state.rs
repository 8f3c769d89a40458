//! Campaign state
//!
//! Counters and lifecycle of a single deletion campaign. The engine loop is
//! the only writer; observers only ever see [`Progress`] snapshots.

use crate::resource::{DeletionOutcome, PageCursor, ResourceKind};

/// Lifecycle of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    Idle,
    Running,
    /// Stop requested; the in-flight item is allowed to finish
    Cancelling,
    Completed,
    Stopped,
    Failed,
}

impl CampaignStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Cancelling => "Stopping",
            Self::Completed => "Completed",
            Self::Stopped => "Stopped",
            Self::Failed => "Failed",
        }
    }

    fn can_become(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, Cancelling)
                | (Running, Completed)
                | (Running, Failed)
                | (Cancelling, Stopped)
        )
    }
}

/// Snapshot of the counters, emitted after every item and page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Items seen in listings so far (a running estimate, not a campaign size)
    pub total: u64,
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl Progress {
    /// Share of listed items already processed, 0-100
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        ((self.processed.min(self.total) * 100) / self.total) as u16
    }

    /// True when `processed == succeeded + failed`
    pub fn is_consistent(&self) -> bool {
        self.processed == self.succeeded + self.failed
    }
}

/// Mutable record of one campaign run
#[derive(Debug, Clone)]
pub struct CampaignState {
    pub target: ResourceKind,
    pub cursor: Option<PageCursor>,
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub processed: u64,
    pub cancelled: bool,
    pub pages_fetched: u32,
    status: CampaignStatus,
}

impl CampaignState {
    pub fn new(target: ResourceKind) -> Self {
        Self {
            target,
            cursor: None,
            total: 0,
            succeeded: 0,
            failed: 0,
            processed: 0,
            cancelled: false,
            pages_fetched: 0,
            status: CampaignStatus::Idle,
        }
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn progress(&self) -> Progress {
        Progress {
            total: self.total,
            processed: self.processed,
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }

    /// Move to `next`, refusing transitions the lifecycle does not allow
    ///
    /// Returns whether the transition happened. Terminal states are never left.
    pub fn transition(&mut self, next: CampaignStatus) -> bool {
        if !self.status.can_become(next) {
            tracing::warn!(
                "Ignoring campaign transition {:?} -> {:?}",
                self.status,
                next
            );
            return false;
        }
        self.status = next;
        true
    }

    pub fn start(&mut self) -> bool {
        self.transition(CampaignStatus::Running)
    }

    /// A listing page came back with `count` items
    pub fn page_loaded(&mut self, count: usize) -> Progress {
        self.pages_fetched += 1;
        self.total += count as u64;
        self.progress()
    }

    /// Account for one finished delete call
    pub fn record(&mut self, outcome: &DeletionOutcome) -> Progress {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.processed += 1;
        self.progress()
    }

    /// Note a stop request and move to Cancelling
    pub fn request_cancel(&mut self) {
        self.cancelled = true;
        if self.status == CampaignStatus::Running {
            self.transition(CampaignStatus::Cancelling);
        }
    }

    /// Finish a cancelled campaign
    pub fn stop(&mut self) -> CampaignStatus {
        self.request_cancel();
        self.transition(CampaignStatus::Stopped);
        self.status
    }
}
