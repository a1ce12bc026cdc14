//! The selection tracker.
//!
//! DESIGN
//! ======
//! One tracker exists per editor session. It owns the selected-id set and
//! the last observed model root; neither is shared mutably with anyone else.
//! Every change flows through [`SelectionTracker::update_selection`], which:
//!
//! 1. resolves select/deselect conflicts (select wins),
//! 2. applies deselections, then selections,
//! 3. prunes ids that no longer resolve in the new root,
//! 4. stores the new root and selection,
//! 5. dispatches one aggregated feedback action if the selection changed,
//! 6. notifies listeners if the root or the selection changed.
//!
//! Feedback is always dispatched before listeners run.
//!
//! ERROR HANDLING
//! ==============
//! No input is invalid. A failing listener aborts the fan-out and its error is
//! returned to the caller; the new state has already been stored by then.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use std::rc::{Rc, Weak};

use indexmap::IndexSet;
use tracing::{debug, trace, warn};

use crate::command::SelectionCommand;
use crate::config::SelectionConfig;
use crate::feedback::{FeedbackAction, FeedbackDispatcher, FeedbackSource, SelectFeedback};
use crate::listener::{ListenerError, SelectionListener};
use crate::model::{ElementId, ModelElement, ModelRoot};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// What an update changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    /// The stored root is a different reference than before.
    pub root_changed: bool,
    /// The selected-id set differs from before (order is ignored).
    pub selection_changed: bool,
    /// Ids reported as deselected by this update.
    pub deselected: Vec<ElementId>,
}

impl SelectionDelta {
    /// True when the update changed nothing observable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.root_changed && !self.selection_changed
    }
}

/// Tracks the selected elements of the current model root.
pub struct SelectionTracker<R> {
    source: FeedbackSource,
    config: SelectionConfig,
    root: Option<Rc<R>>,
    selected: IndexSet<ElementId>,
    listeners: Vec<Weak<dyn SelectionListener<R>>>,
    feedback: Rc<dyn FeedbackDispatcher>,
}

// =============================================================================
// OPERATIONS
// =============================================================================

impl<R: ModelRoot> SelectionTracker<R> {
    /// Create a tracker with default config and a random feedback source.
    #[must_use]
    pub fn new(feedback: Rc<dyn FeedbackDispatcher>) -> Self {
        Self::with_config(feedback, SelectionConfig::default())
    }

    #[must_use]
    pub fn with_config(feedback: Rc<dyn FeedbackDispatcher>, config: SelectionConfig) -> Self {
        Self {
            source: config.source(),
            config,
            root: None,
            selected: IndexSet::new(),
            listeners: Vec::new(),
            feedback,
        }
    }

    // --- Updates ---

    /// Re-validate the current selection against a freshly swapped-in root.
    ///
    /// # Errors
    ///
    /// Propagates the first listener failure.
    pub fn model_root_changed(&mut self, root: Rc<R>) -> Result<SelectionDelta, SelectionError> {
        self.update_selection(Some(root), &[], &[])
    }

    /// Apply a selection change against `root`.
    ///
    /// An id listed in both `select` and `deselect` ends up selected.
    /// Deselecting an id that isn't selected does nothing. Ids that don't
    /// resolve in `root` are dropped from the selection; they are reported as
    /// deselected only if they resolved in the previous root.
    ///
    /// # Errors
    ///
    /// Propagates the first listener failure. State is stored and feedback
    /// dispatched before any listener runs.
    pub fn update_selection(
        &mut self,
        root: Option<Rc<R>>,
        select: &[ElementId],
        deselect: &[ElementId],
    ) -> Result<SelectionDelta, SelectionError> {
        if root.is_none() && select.is_empty() && deselect.is_empty() {
            return Ok(SelectionDelta::default());
        }

        let prev_root = self.root.take();
        let prev_selected = self.selected.clone();

        let to_select: IndexSet<&ElementId> = select.iter().collect();
        let mut deselected: IndexSet<ElementId> = deselect
            .iter()
            .filter(|id| !to_select.contains(id) && self.selected.contains(*id))
            .cloned()
            .collect();

        for id in &deselected {
            self.selected.shift_remove(id);
        }
        for id in to_select {
            self.selected.insert(id.clone());
        }

        let mut pruned = Vec::new();
        self.selected.retain(|id| {
            let resolvable = root.as_deref().is_some_and(|r| r.resolve(id).is_some());
            if !resolvable {
                pruned.push(id.clone());
            }
            resolvable
        });
        for id in pruned {
            if prev_root.as_deref().is_some_and(|r| r.resolve(&id).is_some()) {
                deselected.insert(id);
            } else {
                trace!(%id, "dropped selection of unknown element");
            }
        }

        let selection_changed = prev_selected.len() != self.selected.len()
            || prev_selected.iter().any(|id| !self.selected.contains(id));
        let root_changed = match (&prev_root, &root) {
            (Some(prev), Some(next)) => !Rc::ptr_eq(prev, next),
            (None, None) => false,
            _ => true,
        };
        self.root = root;

        let delta = SelectionDelta { root_changed, selection_changed, deselected: deselected.into_iter().collect() };
        if delta.is_empty() {
            return Ok(delta);
        }
        debug!(
            selected = self.selected.len(),
            deselected = delta.deselected.len(),
            root_changed,
            selection_changed,
            "selection updated"
        );

        if selection_changed && self.config.feedback_enabled {
            let feedback = SelectFeedback {
                selected_element_ids: self.selected.iter().cloned().collect(),
                deselected_element_ids: delta.deselected.clone(),
            };
            self.feedback.dispatch_feedback(self.source, vec![FeedbackAction::SelectFeedback(feedback)]);
        }
        self.notify_listeners()?;
        Ok(delta)
    }

    /// Select every element of the current root.
    ///
    /// # Errors
    ///
    /// Propagates the first listener failure.
    pub fn select_all(&mut self) -> Result<SelectionDelta, SelectionError> {
        let all: Vec<ElementId> = match self.root.as_deref() {
            Some(root) => root.elements().map(|e| e.id().to_string()).collect(),
            None => Vec::new(),
        };
        self.update_selection(self.root.clone(), &all, &[])
    }

    /// Deselect everything currently selected.
    ///
    /// # Errors
    ///
    /// Propagates the first listener failure.
    pub fn deselect_all(&mut self) -> Result<SelectionDelta, SelectionError> {
        let all: Vec<ElementId> = self.selected.iter().cloned().collect();
        self.update_selection(self.root.clone(), &[], &all)
    }

    /// Apply a host command against the current root.
    ///
    /// # Errors
    ///
    /// Propagates the first listener failure.
    pub fn handle(&mut self, command: SelectionCommand) -> Result<SelectionDelta, SelectionError> {
        match command {
            SelectionCommand::Select { selected_element_ids, mut deselected_element_ids, deselect_all } => {
                if deselect_all {
                    deselected_element_ids.extend(self.selected.iter().cloned());
                }
                self.update_selection(self.root.clone(), &selected_element_ids, &deselected_element_ids)
            }
            SelectionCommand::SelectAll { select: true } => self.select_all(),
            SelectionCommand::SelectAll { select: false } => self.deselect_all(),
        }
    }

    // --- Listeners ---

    /// Register a listener. Registering the same listener twice has no effect.
    pub fn register(&mut self, listener: &Rc<dyn SelectionListener<R>>) {
        self.prune_listeners();
        let ptr = Rc::as_ptr(listener);
        if self.listeners.iter().any(|l| std::ptr::addr_eq(l.as_ptr(), ptr)) {
            return;
        }
        self.listeners.push(Rc::downgrade(listener));
    }

    /// Deregister a listener if present.
    pub fn deregister(&mut self, listener: &Rc<dyn SelectionListener<R>>) {
        let ptr = Rc::as_ptr(listener);
        self.listeners.retain(|l| !std::ptr::addr_eq(l.as_ptr(), ptr));
    }

    /// Number of registered listeners that are still alive.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|l| l.strong_count() > 0).count()
    }

    fn prune_listeners(&mut self) {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.strong_count() > 0);
        let dropped = before - self.listeners.len();
        if dropped > 0 {
            trace!(dropped, "pruned dropped selection listeners");
        }
    }

    fn notify_listeners(&mut self) -> Result<(), SelectionError> {
        self.prune_listeners();
        let selected: Vec<ElementId> = self.selected.iter().cloned().collect();
        for (index, weak) in self.listeners.iter().enumerate() {
            let Some(listener) = weak.upgrade() else {
                continue;
            };
            trace!(index, "notifying selection listener");
            if let Err(err) = listener.selection_changed(self.root.as_ref(), &selected) {
                warn!(index, error = %err, "selection listener failed");
                return Err(err.into());
            }
        }
        Ok(())
    }

    // --- Queries ---

    /// Feedback source id of this tracker.
    #[must_use]
    pub fn source(&self) -> FeedbackSource {
        self.source
    }

    /// The last stored root, if any.
    #[must_use]
    pub fn model_root(&self) -> Option<&Rc<R>> {
        self.root.as_ref()
    }

    /// Elements of the current root that the model flags as selected.
    #[must_use]
    pub fn selected_elements(&self) -> Vec<&R::Element> {
        match self.root.as_deref() {
            Some(root) => root.elements().filter(|e| e.is_selected()).collect(),
            None => Vec::new(),
        }
    }

    /// The selected ids, in selection order.
    #[must_use]
    pub fn selected_element_ids(&self) -> &IndexSet<ElementId> {
        &self.selected
    }

    #[must_use]
    pub fn has_selected_elements(&self) -> bool {
        !self.selected.is_empty()
    }

    #[must_use]
    pub fn is_single_selection(&self) -> bool {
        self.selected.len() == 1
    }

    #[must_use]
    pub fn is_multi_selection(&self) -> bool {
        self.selected.len() > 1
    }
}
