//! Shared test utilities for the `tracker` module.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use super::{PullRequestRef, PullRequestState, TrackerClient, TrackerFuture};

/// One recorded tracker call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrackerCall {
    AddLabels(PullRequestRef, Vec<String>),
    AddAssignees(PullRequestRef, Vec<String>),
    PostComment(PullRequestRef, String),
    SetState(PullRequestRef, PullRequestState),
}

impl TrackerCall {
    fn operation(&self) -> &'static str {
        match self {
            Self::AddLabels(..) => "add_labels",
            Self::AddAssignees(..) => "add_assignees",
            Self::PostComment(..) => "post_comment",
            Self::SetState(..) => "set_state",
        }
    }
}

/// Mock tracker that records every call in order.
///
/// A tracker built with [`failing_on`](Self::failing_on) records the named
/// operation and then returns `Err("mock <operation> failure")` for it.
#[derive(Default)]
pub(crate) struct RecordingTracker {
    calls: Arc<Mutex<Vec<TrackerCall>>>,
    fail_on: Option<&'static str>,
}

impl RecordingTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    /// Calls made so far.
    pub(crate) fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TrackerCall) -> TrackerFuture<'_> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);
        let fail = self.fail_on == Some(operation);
        Box::pin(async move {
            if fail {
                Err(anyhow!("mock {operation} failure"))
            } else {
                Ok(())
            }
        })
    }
}

impl TrackerClient for RecordingTracker {
    fn add_labels<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        labels: &'a [String],
    ) -> TrackerFuture<'a> {
        self.record(TrackerCall::AddLabels(pr.clone(), labels.to_vec()))
    }

    fn add_assignees<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        assignees: &'a [String],
    ) -> TrackerFuture<'a> {
        self.record(TrackerCall::AddAssignees(pr.clone(), assignees.to_vec()))
    }

    fn post_comment<'a>(&'a self, pr: &'a PullRequestRef, body: &'a str) -> TrackerFuture<'a> {
        self.record(TrackerCall::PostComment(pr.clone(), body.to_string()))
    }

    fn set_state<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        state: PullRequestState,
    ) -> TrackerFuture<'a> {
        self.record(TrackerCall::SetState(pr.clone(), state))
    }
}
