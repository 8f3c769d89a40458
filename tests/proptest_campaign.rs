//! Property-based tests using proptest
//!
//! These tests verify the campaign counters, cancellation bounds and
//! response classification using randomized inputs.

use async_trait::async_trait;
use pagepurge::campaign::{
    CampaignEvent, CampaignRequest, CampaignRunner, CampaignStatus, EngineSettings, Progress,
};
use pagepurge::error::Result;
use pagepurge::graph::{AccessToken, Gateway};
use pagepurge::resource::{parse_listing, DeletionOutcome, PageCursor, ResourceKind};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Gateway serving fixed pages; `true` items delete successfully
struct FakeGraph {
    pages: Vec<Vec<bool>>,
    outcomes: HashMap<String, bool>,
}

impl FakeGraph {
    fn new(pages: Vec<Vec<bool>>) -> Self {
        let mut outcomes = HashMap::new();
        for (p, page) in pages.iter().enumerate() {
            for (i, ok) in page.iter().enumerate() {
                outcomes.insert(format!("{}_{}", p, i), *ok);
            }
        }
        Self { pages, outcomes }
    }
}

#[async_trait]
impl Gateway for FakeGraph {
    async fn list_page(
        &self,
        _kind: ResourceKind,
        _page_id: &str,
        _token: &AccessToken,
        _limit: Option<u32>,
        after: Option<&PageCursor>,
    ) -> Result<Value> {
        let index: usize = after.map(|c| c.as_str().parse().unwrap()).unwrap_or(0);
        let Some(page) = self.pages.get(index) else {
            return Ok(json!({"data": []}));
        };

        let data: Vec<Value> = (0..page.len())
            .map(|i| json!({"id": format!("{}_{}", index, i)}))
            .collect();
        let mut body = json!({ "data": data });
        if index + 1 < self.pages.len() {
            body["paging"] = json!({"cursors": {"after": (index + 1).to_string()}});
        }
        Ok(body)
    }

    async fn delete_item(
        &self,
        _kind: ResourceKind,
        item_id: &str,
        _token: &AccessToken,
    ) -> Result<Value> {
        if self.outcomes.get(item_id).copied().unwrap_or(false) {
            Ok(json!({"success": true}))
        } else {
            Ok(json!({"error": {"message": "nope"}}))
        }
    }

    async fn list_owned_pages(&self, _token: &AccessToken) -> Result<Value> {
        Ok(json!({"data": []}))
    }
}

/// Non-empty pages of random outcomes
fn arb_pages() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 1..8), 0..5)
}

fn runner(pages: Vec<Vec<bool>>) -> CampaignRunner<FakeGraph> {
    CampaignRunner::new(
        FakeGraph::new(pages),
        EngineSettings {
            delay: Duration::ZERO,
            page_limit: 100,
        },
    )
}

fn request() -> CampaignRequest {
    CampaignRequest::new(ResourceKind::Post, "1234", AccessToken::new("t"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every listed item is processed exactly once and counted by outcome
    #[test]
    fn counters_match_outcomes(pages in arb_pages()) {
        let expected_total: usize = pages.iter().map(|p| p.len()).sum();
        let expected_ok: usize = pages.iter().flatten().filter(|ok| **ok).count();

        let report = tokio_test::block_on(
            runner(pages).run(request(), &CancellationToken::new(), &mut |_: &CampaignEvent| {}),
        )
        .unwrap();

        prop_assert_eq!(report.status, CampaignStatus::Completed);
        prop_assert_eq!(report.progress.total as usize, expected_total);
        prop_assert_eq!(report.progress.processed as usize, expected_total);
        prop_assert_eq!(report.progress.succeeded as usize, expected_ok);
        prop_assert_eq!(report.progress.failed as usize, expected_total - expected_ok);
    }

    /// Progress snapshots are consistent and never move backwards
    #[test]
    fn progress_is_monotonic(pages in arb_pages()) {
        let mut snapshots: Vec<Progress> = Vec::new();
        let mut observer = |event: &CampaignEvent| {
            if let Some(progress) = event.progress() {
                snapshots.push(progress);
            }
        };

        tokio_test::block_on(runner(pages).run(request(), &CancellationToken::new(), &mut observer))
            .unwrap();

        for pair in snapshots.windows(2) {
            prop_assert!(pair[0].processed <= pair[1].processed);
            prop_assert!(pair[0].total <= pair[1].total);
        }
        for progress in &snapshots {
            prop_assert!(progress.is_consistent());
            prop_assert!(progress.processed <= progress.total);
            prop_assert!(progress.percent() <= 100);
        }
    }

    /// Stopping after k items deletes exactly min(k, n) items
    #[test]
    fn stop_bounds_processed_items(pages in arb_pages(), stop_after in 1u64..20) {
        let total: u64 = pages.iter().map(|p| p.len() as u64).sum();
        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        let mut observer = move |event: &CampaignEvent| {
            if let CampaignEvent::ItemFinished { progress, .. } = event {
                if progress.processed >= stop_after {
                    stopper.cancel();
                }
            }
        };

        let report = tokio_test::block_on(runner(pages).run(request(), &cancel, &mut observer))
            .unwrap();

        prop_assert_eq!(report.progress.processed, stop_after.min(total));
        if stop_after < total {
            prop_assert_eq!(report.status, CampaignStatus::Stopped);
        }
    }

    /// Only an explicit `success: true` counts as a deletion
    #[test]
    fn only_success_true_is_success(success in prop::option::of(any::<bool>()), message in "[a-z ]{0,20}") {
        let mut body = json!({});
        if let Some(flag) = success {
            body["success"] = json!(flag);
        }
        if !message.is_empty() {
            body["error"] = json!({"message": message});
        }

        let outcome = DeletionOutcome::from_body(&body);
        prop_assert_eq!(outcome.is_success(), success == Some(true));
    }

    /// Listings never yield items with empty ids
    #[test]
    fn listing_ids_are_never_empty(ids in prop::collection::vec(prop_oneof!["", "[0-9]{1,6}_[0-9]{1,6}"], 0..20)) {
        let data: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
        let page = parse_listing(&json!({"data": data})).unwrap();

        prop_assert_eq!(page.items.len(), ids.iter().filter(|id| !id.is_empty()).count());
        prop_assert!(page.items.iter().all(|item| !item.id.is_empty()));
    }
}

#[test]
fn empty_cursor_is_absent() {
    assert!(PageCursor::new("").is_none());
    assert!(PageCursor::new("abc").is_some());
}
