//! Application State
//!
//! State behind the progress screen. The campaign itself runs on its own
//! task; this side only mirrors the events it sends.

use pagepurge::activity::ActivityLog;
use pagepurge::campaign::{CampaignError, CampaignEvent, CampaignReport, CampaignStatus, Progress};
use pagepurge::graph::format_graph_error;
use pagepurge::resource::ResourceKind;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Confirm,  // Waiting for the user to approve the deletion
    Running,  // Campaign in progress
    Finished, // Terminal state reached, summary shown
}

/// Main application state
pub struct App {
    pub mode: Mode,
    pub target: ResourceKind,
    pub page_id: String,
    pub page_name: String,

    // Mirrored campaign state
    pub status: CampaignStatus,
    pub progress: Progress,
    pub log: ActivityLog,
    pub summary: Option<String>,
    pub error_message: Option<String>,

    // Confirmation dialog
    pub confirm_selected_yes: bool,

    // Log panel scroll, in lines up from the newest entry
    pub log_scroll: usize,

    pub cancel: CancellationToken,
    events: UnboundedReceiver<CampaignEvent>,
}

impl App {
    pub fn new(
        target: ResourceKind,
        page_id: &str,
        page_name: &str,
        cancel: CancellationToken,
        events: UnboundedReceiver<CampaignEvent>,
        confirmed: bool,
    ) -> Self {
        let mut app = Self {
            mode: Mode::Confirm,
            target,
            page_id: page_id.to_string(),
            page_name: page_name.to_string(),
            status: CampaignStatus::Idle,
            progress: Progress::default(),
            log: ActivityLog::default(),
            summary: None,
            error_message: None,
            confirm_selected_yes: false,
            log_scroll: 0,
            cancel,
            events,
        };
        if confirmed {
            app.confirm();
        }
        app
    }

    pub fn is_confirmed(&self) -> bool {
        self.mode != Mode::Confirm
    }

    /// Text of the confirmation dialog
    pub fn confirm_message(&self) -> String {
        format!(
            "Delete ALL {} of '{}'? This cannot be undone.",
            self.target.edge(),
            self.page_name
        )
    }

    pub fn toggle_confirm_selection(&mut self) {
        self.confirm_selected_yes = !self.confirm_selected_yes;
    }

    /// Approve the deletion; the caller starts the campaign
    pub fn confirm(&mut self) {
        self.mode = Mode::Running;
        self.status = CampaignStatus::Running;
        self.log.info(format!("Deleting {}...", self.target.edge()));
    }

    /// Ask the campaign to stop after the in-flight item
    pub fn request_stop(&mut self) {
        if self.mode != Mode::Running || self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.status = CampaignStatus::Cancelling;
        self.log.warning("Stopping after the current item...");
    }

    pub fn is_stopping(&self) -> bool {
        self.status == CampaignStatus::Cancelling
    }

    /// Apply every event the campaign has sent so far
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(&event);
        }
    }

    pub fn apply_event(&mut self, event: &CampaignEvent) {
        if let Some(progress) = event.progress() {
            self.progress = progress;
        }
        if let CampaignEvent::Finished { status, .. } = event {
            self.status = *status;
        }
        self.log.record_event(event);
        // New entries keep the view pinned unless the user scrolled away
        if self.log_scroll > 0 && matches!(event, CampaignEvent::ItemFinished { .. }) {
            self.log_scroll += 1;
        }
    }

    /// Record the campaign's final result
    pub fn finish(&mut self, outcome: &Result<CampaignReport, CampaignError>) {
        self.drain_events();
        self.mode = Mode::Finished;
        match outcome {
            Ok(report) => {
                self.status = report.status;
                self.progress = report.progress;
                self.summary = Some(report.summary_line());
            },
            Err(CampaignError::Failed { source, report }) => {
                self.status = CampaignStatus::Failed;
                self.progress = report.progress;
                self.summary = Some(report.summary_line());
                self.error_message = Some(format_graph_error(source));
            },
            Err(CampaignError::Validation(source)) => {
                self.status = CampaignStatus::Failed;
                self.error_message = Some(format_graph_error(source));
            },
            Err(err) => {
                self.status = CampaignStatus::Failed;
                self.error_message = Some(err.to_string());
            },
        }
    }

    pub fn scroll_log_up(&mut self, lines: usize) {
        let max = self.log.len().saturating_sub(1);
        self.log_scroll = (self.log_scroll + lines).min(max);
    }

    pub fn scroll_log_down(&mut self, lines: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(lines);
    }
}
