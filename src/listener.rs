//! Observers of selection and root changes.

use std::rc::Rc;

use crate::model::ElementId;

/// Error a listener reports back through the update that notified it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListenerError {
    #[error("selection listener failed: {0}")]
    Failed(String),
}

/// Receives the current root and selection whenever either changes.
///
/// The tracker holds listeners weakly: the owner keeps the `Rc` alive and
/// dropping it is equivalent to deregistering.
pub trait SelectionListener<R> {
    /// Called after feedback has been dispatched, in registration order.
    ///
    /// # Errors
    ///
    /// A returned error stops the fan-out; listeners registered later are not
    /// notified for this update.
    fn selection_changed(&self, root: Option<&Rc<R>>, selected: &[ElementId]) -> Result<(), ListenerError>;
}
