//! Progress observation
//!
//! The engine reports what it does through a [`ProgressObserver`] and has no
//! idea how progress is rendered.

use super::state::{CampaignStatus, Progress};
use crate::resource::{DeletionOutcome, ResourceKind};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Something that happened during a campaign, in processing order
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignEvent {
    Started {
        campaign_id: Uuid,
        target: ResourceKind,
        page_id: String,
    },
    PageLoaded {
        page_number: u32,
        items: usize,
        has_more: bool,
        progress: Progress,
    },
    ItemFinished {
        item_id: String,
        outcome: DeletionOutcome,
        progress: Progress,
    },
    Finished {
        status: CampaignStatus,
        progress: Progress,
        error: Option<String>,
    },
}

impl CampaignEvent {
    /// Counter snapshot carried by the event, if any
    pub fn progress(&self) -> Option<Progress> {
        match self {
            Self::Started { .. } => None,
            Self::PageLoaded { progress, .. }
            | Self::ItemFinished { progress, .. }
            | Self::Finished { progress, .. } => Some(*progress),
        }
    }
}

/// Receives campaign events synchronously, in order
pub trait ProgressObserver: Send {
    fn on_event(&mut self, event: &CampaignEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&CampaignEvent) + Send,
{
    fn on_event(&mut self, event: &CampaignEvent) {
        self(event)
    }
}

/// Forwards events to a channel, for front-ends running the campaign on
/// another task
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<CampaignEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<CampaignEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_event(&mut self, event: &CampaignEvent) {
        // A closed receiver means the front-end went away; the campaign
        // itself keeps its own accounting
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!("Progress receiver dropped");
        }
    }
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&mut self, _event: &CampaignEvent) {}
}
