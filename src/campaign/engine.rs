//! Campaign runner
//!
//! Drains a paginated listing, deleting every item in listing order with a
//! fixed pause between deletions, until the listing runs dry, the user
//! stops it, or a page cannot be fetched.

use super::observer::{CampaignEvent, ProgressObserver};
use super::state::{CampaignState, CampaignStatus, Progress};
use crate::error::GraphError;
use crate::graph::gateway::{require_id, require_token, DEFAULT_LIST_LIMIT};
use crate::graph::{AccessToken, Gateway};
use crate::resource::{parse_listing, DeletionOutcome, ListingPage, ResourceKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Pause between two delete calls, keeping well under the Graph rate limit
pub const DEFAULT_DELETE_DELAY: Duration = Duration::from_millis(100);

const MISSING_ID_PLACEHOLDER: &str = "(no id)";
const MISSING_ID_REASON: &str = "listing entry has no id";

/// Tunables for a runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub delay: Duration,
    pub page_limit: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELETE_DELAY,
            page_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// What to delete, where, and with which token
#[derive(Debug, Clone)]
pub struct CampaignRequest {
    pub target: ResourceKind,
    pub page_id: String,
    pub token: AccessToken,
}

impl CampaignRequest {
    pub fn new(target: ResourceKind, page_id: impl Into<String>, token: AccessToken) -> Self {
        Self {
            target,
            page_id: page_id.into(),
            token,
        }
    }

    fn validate(&self) -> Result<(), GraphError> {
        require_id(&self.page_id, "Page ID")?;
        require_token(&self.token)
    }
}

/// Final account of a campaign
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignReport {
    pub campaign_id: Uuid,
    pub target: ResourceKind,
    pub page_id: String,
    pub status: CampaignStatus,
    pub progress: Progress,
    pub pages_fetched: u32,
    pub elapsed: Duration,
}

impl CampaignReport {
    /// One-line outcome for the user
    pub fn summary_line(&self) -> String {
        let edge = self.target.edge();
        let Progress {
            processed,
            succeeded,
            failed,
            ..
        } = self.progress;
        match self.status {
            CampaignStatus::Stopped => format!(
                "Stopped by user after {} {}: {} deleted, {} failed",
                processed, edge, succeeded, failed
            ),
            CampaignStatus::Failed => format!(
                "Aborted after {} {}: {} deleted, {} failed",
                processed, edge, succeeded, failed
            ),
            _ if processed == 0 => format!("Done! No {} left to delete", edge),
            _ => format!("Done! Deleted {} {}, {} failed", succeeded, edge, failed),
        }
    }
}

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("A deletion campaign is already running")]
    AlreadyRunning,

    #[error("Invalid campaign request: {0}")]
    Validation(GraphError),

    #[error("Campaign failed after {} items: {source}", .report.progress.processed)]
    Failed {
        source: GraphError,
        report: CampaignReport,
    },
}

/// Holds the runner's operating flag for the duration of one campaign
struct OperatingGuard<'a>(&'a AtomicBool);

impl<'a> OperatingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for OperatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs deletion campaigns, one at a time, against a [`Gateway`]
#[derive(Debug)]
pub struct CampaignRunner<G> {
    gateway: G,
    settings: EngineSettings,
    operating: AtomicBool,
}

impl<G: Gateway> CampaignRunner<G> {
    pub fn new(gateway: G, settings: EngineSettings) -> Self {
        Self {
            gateway,
            settings,
            operating: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.operating.load(Ordering::Acquire)
    }

    /// Run one campaign to a terminal state
    ///
    /// Cancellation is checked before each page fetch and before each
    /// delete; an in-flight call is never interrupted. Per-item failures
    /// only move counters. A page that cannot be fetched ends the campaign
    /// with [`CampaignError::Failed`].
    pub async fn run<O>(
        &self,
        request: CampaignRequest,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<CampaignReport, CampaignError>
    where
        O: ProgressObserver + ?Sized,
    {
        request.validate().map_err(CampaignError::Validation)?;
        let _guard = OperatingGuard::acquire(&self.operating).ok_or(CampaignError::AlreadyRunning)?;

        let campaign_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "campaign",
            id = %campaign_id,
            target = %request.target,
            page = %request.page_id
        );
        self.drive(campaign_id, &request, cancel, observer)
            .instrument(span)
            .await
    }

    async fn drive<O>(
        &self,
        campaign_id: Uuid,
        request: &CampaignRequest,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<CampaignReport, CampaignError>
    where
        O: ProgressObserver + ?Sized,
    {
        let started = Instant::now();
        let mut state = CampaignState::new(request.target);
        state.start();

        tracing::info!(
            "Starting {} deletion (delay {:?}, page size {})",
            request.target,
            self.settings.delay,
            self.settings.page_limit
        );
        observer.on_event(&CampaignEvent::Started {
            campaign_id,
            target: request.target,
            page_id: request.page_id.clone(),
        });

        loop {
            if cancel.is_cancelled() {
                state.stop();
                break;
            }

            let page = match self.fetch_page(request, &state).await {
                Ok(page) => page,
                Err(err) => {
                    tracing::error!("Listing failed, ending campaign: {}", err);
                    state.transition(CampaignStatus::Failed);
                    observer.on_event(&CampaignEvent::Finished {
                        status: state.status(),
                        progress: state.progress(),
                        error: Some(err.to_string()),
                    });
                    return Err(CampaignError::Failed {
                        source: err,
                        report: self.report(campaign_id, request, &state, started),
                    });
                },
            };

            let progress = state.page_loaded(page.listed);
            tracing::info!(
                "Page {} returned {} {}",
                state.pages_fetched,
                page.listed,
                request.target.edge()
            );
            observer.on_event(&CampaignEvent::PageLoaded {
                page_number: state.pages_fetched,
                items: page.listed,
                has_more: page.next_cursor.is_some(),
                progress,
            });

            if page.is_empty() {
                state.transition(CampaignStatus::Completed);
                break;
            }

            // Entries without an id cannot be deleted; they count as failures
            for _ in 0..page.skipped() {
                let outcome = DeletionOutcome::Rejected(MISSING_ID_REASON.to_string());
                let progress = state.record(&outcome);
                observer.on_event(&CampaignEvent::ItemFinished {
                    item_id: MISSING_ID_PLACEHOLDER.to_string(),
                    outcome,
                    progress,
                });
            }

            for item in &page.items {
                if cancel.is_cancelled() {
                    break;
                }

                let result = self
                    .gateway
                    .delete_item(request.target, &item.id, &request.token)
                    .await;
                let outcome = DeletionOutcome::classify(result);
                match &outcome {
                    DeletionOutcome::Success => {
                        tracing::info!("Deleted {} {}", request.target, item.id)
                    },
                    DeletionOutcome::Rejected(reason) => {
                        tracing::warn!("Delete of {} rejected: {}", item.id, reason)
                    },
                    DeletionOutcome::TransportError(reason) => {
                        tracing::warn!("Delete of {} failed: {}", item.id, reason)
                    },
                }

                let progress = state.record(&outcome);
                observer.on_event(&CampaignEvent::ItemFinished {
                    item_id: item.id.clone(),
                    outcome,
                    progress,
                });

                if !cancel.is_cancelled() {
                    self.pace(cancel).await;
                }
            }

            if cancel.is_cancelled() {
                state.stop();
                break;
            }

            match page.next_cursor {
                Some(cursor) => state.cursor = Some(cursor),
                None => {
                    state.transition(CampaignStatus::Completed);
                    break;
                },
            }
        }

        let report = self.report(campaign_id, request, &state, started);
        tracing::info!("{}", report.summary_line());
        observer.on_event(&CampaignEvent::Finished {
            status: report.status,
            progress: report.progress,
            error: None,
        });
        Ok(report)
    }

    async fn fetch_page(
        &self,
        request: &CampaignRequest,
        state: &CampaignState,
    ) -> Result<ListingPage, GraphError> {
        let body = self
            .gateway
            .list_page(
                request.target,
                &request.page_id,
                &request.token,
                Some(self.settings.page_limit),
                state.cursor.as_ref(),
            )
            .await?;
        parse_listing(&body)
    }

    /// Wait out the inter-delete delay, returning early on cancellation
    async fn pace(&self, cancel: &CancellationToken) {
        if self.settings.delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.settings.delay) => {},
            _ = cancel.cancelled() => {},
        }
    }

    fn report(
        &self,
        campaign_id: Uuid,
        request: &CampaignRequest,
        state: &CampaignState,
        started: Instant,
    ) -> CampaignReport {
        CampaignReport {
            campaign_id,
            target: request.target,
            page_id: request.page_id.clone(),
            status: state.status(),
            progress: state.progress(),
            pages_fetched: state.pages_fetched,
            elapsed: started.elapsed(),
        }
    }
}
