//! Bulk deletion engine
//!
//! A campaign deletes every item of one [`ResourceKind`](crate::resource::ResourceKind)
//! from one page. It walks the cursor-paginated listing, deletes items one at
//! a time with a fixed pause between calls, and reports each step to a
//! [`ProgressObserver`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Running -> Completed            (empty page, or no next cursor)
//!                 -> Cancelling -> Stopped (stop requested)
//!                 -> Failed               (a page could not be fetched)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let runner = CampaignRunner::new(client, EngineSettings::default());
//! let cancel = CancellationToken::new();
//! let request = CampaignRequest::new(ResourceKind::Post, "1234", token);
//! let report = runner.run(request, &cancel, &mut |event: &CampaignEvent| {
//!     println!("{:?}", event.progress());
//! }).await?;
//! println!("{}", report.summary_line());
//! ```

mod engine;
mod observer;
mod state;

pub use engine::{
    CampaignError, CampaignReport, CampaignRequest, CampaignRunner, EngineSettings,
    DEFAULT_DELETE_DELAY,
};
pub use observer::{CampaignEvent, ChannelObserver, NoopObserver, ProgressObserver};
pub use state::{CampaignState, CampaignStatus, Progress};
