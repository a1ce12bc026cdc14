//! Selection feedback: transient, visually applied state for the rendering layer.
//!
//! The tracker emits at most one [`FeedbackAction::SelectFeedback`] per update,
//! carrying the full current selection and everything deselected by that
//! update. Downstream only the latest feedback per source matters, which is
//! what [`FeedbackQueue`] retains.

#[cfg(test)]
#[path = "feedback_test.rs"]
mod feedback_test;

use std::cell::RefCell;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{DiagramRoot, ElementId};

/// Identity of the component that emitted a batch of feedback.
pub type FeedbackSource = Uuid;

/// Aggregated "selection is now X, Y was deselected" feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFeedback {
    /// The full selection after the update, in selection order.
    pub selected_element_ids: Vec<ElementId>,
    /// Ids deselected by the update, including pruned ids that existed in the previous root.
    pub deselected_element_ids: Vec<ElementId>,
}

impl SelectFeedback {
    /// Apply this feedback to a diagram root's selection flags.
    ///
    /// Deselections are applied first so an id present in both lists ends up
    /// selected. Ids the root doesn't contain are skipped.
    pub fn apply(&self, root: &mut DiagramRoot) {
        for id in &self.deselected_element_ids {
            root.set_selected(id, false);
        }
        for id in &self.selected_element_ids {
            root.set_selected(id, true);
        }
    }
}

/// Feedback actions dispatched to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FeedbackAction {
    SelectFeedback(SelectFeedback),
}

/// Sink for feedback actions.
pub trait FeedbackDispatcher {
    /// Dispatch a batch of feedback actions on behalf of `source`.
    fn dispatch_feedback(&self, source: FeedbackSource, actions: Vec<FeedbackAction>);
}

/// Dispatcher that keeps only the most recent batch per source.
///
/// A new batch from a source replaces that source's pending batch. Sources
/// keep the position of their first dispatch until drained.
#[derive(Debug, Default)]
pub struct FeedbackQueue {
    pending: RefCell<IndexMap<FeedbackSource, Vec<FeedbackAction>>>,
}

impl FeedbackQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending batch for `source`, if any.
    #[must_use]
    pub fn pending(&self, source: FeedbackSource) -> Option<Vec<FeedbackAction>> {
        self.pending.borrow().get(&source).cloned()
    }

    /// Drain every pending batch in source order.
    pub fn take_pending(&self) -> Vec<(FeedbackSource, Vec<FeedbackAction>)> {
        self.pending.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl FeedbackDispatcher for FeedbackQueue {
    fn dispatch_feedback(&self, source: FeedbackSource, actions: Vec<FeedbackAction>) {
        tracing::trace!(%source, count = actions.len(), "feedback queued");
        self.pending.borrow_mut().insert(source, actions);
    }
}
