//! Tool-call reconciliation across stream fragments
//!
//! Fragments are keyed by call id. No fragment is assumed to carry the full
//! argument text: an update that extends what is already known replaces it,
//! anything else is appended to it. Terminal fragments follow the same rule,
//! as the closing delta of a call arrives with its final status.

use indexmap::IndexMap;

use crate::types::{ToolCallInfo, ToolCallStatus, ToolCallType};

/// Reconciled view of every tool call seen on one stream
#[derive(Debug, Default)]
pub struct ToolCallTracker {
    calls: IndexMap<String, ToolCallInfo>,
    frozen: bool,
}

impl ToolCallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fragment's tool calls
    ///
    /// Returns the reconciled state of each call the fragment touched, in
    /// fragment order. Calls without an id cannot be keyed and pass through
    /// unchanged. Once frozen the tracker ignores further updates.
    pub fn observe(&mut self, fragment: Vec<ToolCallInfo>) -> Vec<ToolCallInfo> {
        if self.frozen {
            if !fragment.is_empty() {
                tracing::debug!(count = fragment.len(), "ignoring tool calls after terminal chunk");
            }
            return fragment;
        }

        fragment
            .into_iter()
            .map(|update| {
                if update.id.is_empty() {
                    return update;
                }

                match self.calls.get_mut(&update.id) {
                    Some(existing) => {
                        merge(existing, update);
                        existing.clone()
                    }
                    None => {
                        tracing::trace!(id = %update.id, "tool call observed");
                        self.calls.insert(update.id.clone(), update.clone());
                        update
                    }
                }
            })
            .collect()
    }

    /// Stop accepting updates; called when the stream reaches its terminal chunk
    pub const fn freeze(&mut self) {
        self.frozen = true;
    }

    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Reconciled call by id
    pub fn get(&self, id: &str) -> Option<&ToolCallInfo> {
        self.calls.get(id)
    }

    /// All reconciled calls in first-seen order
    pub fn calls(&self) -> impl Iterator<Item = &ToolCallInfo> {
        self.calls.values()
    }

    pub fn into_calls(self) -> Vec<ToolCallInfo> {
        self.calls.into_values().collect()
    }
}

fn merge(existing: &mut ToolCallInfo, update: ToolCallInfo) {
    // a terminal status never regresses to pending
    if update.status != ToolCallStatus::Pending || existing.status == ToolCallStatus::Pending {
        existing.status = update.status;
    }

    // later fragments may omit the kind tag, which classifies as client-side
    if update.call_type == ToolCallType::ServerSide {
        existing.call_type = ToolCallType::ServerSide;
    }

    if let Some(message) = update.error_message.filter(|m| !m.is_empty()) {
        existing.error_message = Some(message);
    }

    let Some(next) = update.function else {
        return;
    };

    match existing.function.as_mut() {
        None => existing.function = Some(next),
        Some(current) => {
            if !next.name.is_empty() {
                current.name = next.name;
            }
            if next.arguments.starts_with(current.arguments.as_str()) {
                current.arguments = next.arguments;
            } else {
                current.arguments.push_str(&next.arguments);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionCall;

    fn call(id: &str, status: ToolCallStatus, name: &str, arguments: &str) -> ToolCallInfo {
        ToolCallInfo {
            id: id.to_owned(),
            call_type: ToolCallType::ClientSide,
            status,
            error_message: None,
            function: Some(FunctionCall {
                name: name.to_owned(),
                arguments: arguments.to_owned(),
            }),
        }
    }

    fn arguments(tracker: &ToolCallTracker, id: &str) -> String {
        tracker.get(id).unwrap().function.as_ref().unwrap().arguments.clone()
    }

    #[test]
    fn full_argument_update_replaces_partial_text() {
        let mut tracker = ToolCallTracker::new();

        tracker.observe(vec![call("tc_1", ToolCallStatus::Pending, "f", r#"{"a":"#)]);
        let merged = tracker.observe(vec![call("tc_1", ToolCallStatus::Completed, "f", r#"{"a":1,"b":2}"#)]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, ToolCallStatus::Completed);
        assert_eq!(arguments(&tracker, "tc_1"), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn incremental_argument_fragments_are_appended() {
        let mut tracker = ToolCallTracker::new();

        tracker.observe(vec![call("tc_1", ToolCallStatus::Pending, "f", r#"{"city":"#)]);
        tracker.observe(vec![call("tc_1", ToolCallStatus::Pending, "", r#""Oslo"}"#)]);

        assert_eq!(arguments(&tracker, "tc_1"), r#"{"city":"Oslo"}"#);
        assert_eq!(tracker.get("tc_1").unwrap().function.as_ref().unwrap().name, "f");
    }

    #[test]
    fn terminal_fragment_that_does_not_extend_is_still_appended() {
        let mut tracker = ToolCallTracker::new();

        tracker.observe(vec![call("tc_1", ToolCallStatus::Pending, "f", r#"{"a": "#)]);
        tracker.observe(vec![call("tc_1", ToolCallStatus::Completed, "", r#"{"a":1}"#)]);

        // status alone never switches a fragment to snapshot semantics
        assert_eq!(arguments(&tracker, "tc_1"), r#"{"a": {"a":1}"#);
        assert_eq!(tracker.get("tc_1").unwrap().status, ToolCallStatus::Completed);
    }

    #[test]
    fn calls_are_keyed_by_id_not_concatenated_across_the_stream() {
        let mut tracker = ToolCallTracker::new();

        tracker.observe(vec![
            call("tc_1", ToolCallStatus::Pending, "weather", r#"{"city":"Oslo"}"#),
            call("tc_2", ToolCallStatus::Pending, "time", r#"{"tz":"#),
        ]);
        tracker.observe(vec![call("tc_2", ToolCallStatus::Completed, "time", r#""UTC"}"#)]);

        assert_eq!(arguments(&tracker, "tc_1"), r#"{"city":"Oslo"}"#);
        assert_eq!(arguments(&tracker, "tc_2"), r#"{"tz":"UTC"}"#);
        let ids: Vec<_> = tracker.calls().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["tc_1", "tc_2"]);
    }

    #[test]
    fn terminal_status_does_not_regress() {
        let mut tracker = ToolCallTracker::new();

        tracker.observe(vec![call("tc_1", ToolCallStatus::Failed, "f", "{}")]);
        tracker.observe(vec![call("tc_1", ToolCallStatus::Pending, "f", "")]);

        assert_eq!(tracker.get("tc_1").unwrap().status, ToolCallStatus::Failed);
        assert_eq!(arguments(&tracker, "tc_1"), "{}");
    }

    #[test]
    fn error_and_server_classification_are_kept() {
        let mut tracker = ToolCallTracker::new();
        let mut search = call("ws_1", ToolCallStatus::Pending, "web_search", "");
        search.call_type = ToolCallType::ServerSide;
        tracker.observe(vec![search]);

        let mut failed = call("ws_1", ToolCallStatus::Failed, "", "");
        failed.error_message = Some("search backend down".to_owned());
        tracker.observe(vec![failed]);

        let reconciled = tracker.get("ws_1").unwrap();
        assert!(reconciled.is_server_side());
        assert_eq!(reconciled.error_message.as_deref(), Some("search backend down"));
    }

    #[test]
    fn frozen_tracker_ignores_updates() {
        let mut tracker = ToolCallTracker::new();
        tracker.observe(vec![call("tc_1", ToolCallStatus::Completed, "f", "{}")]);
        tracker.freeze();

        tracker.observe(vec![call("tc_1", ToolCallStatus::Completed, "f", r#"{"late":true}"#)]);

        assert!(tracker.is_frozen());
        assert_eq!(arguments(&tracker, "tc_1"), "{}");
    }

    #[test]
    fn calls_without_id_pass_through_untracked() {
        let mut tracker = ToolCallTracker::new();
        let anonymous = call("", ToolCallStatus::Pending, "f", "{}");

        let out = tracker.observe(vec![anonymous.clone()]);

        assert_eq!(out, [anonymous]);
        assert_eq!(tracker.calls().count(), 0);
    }
}
