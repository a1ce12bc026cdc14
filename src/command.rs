//! Selection commands sent by the host layer.
//!
//! The host forwards user intent (click, rubber-band, select-all shortcut) as
//! JSON commands. [`crate::tracker::SelectionTracker::handle`] applies them
//! against the tracker's current root.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};

use crate::model::ElementId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionCommand {
    /// Select and deselect explicit ids.
    #[serde(rename_all = "camelCase")]
    Select {
        #[serde(default)]
        selected_element_ids: Vec<ElementId>,
        #[serde(default)]
        deselected_element_ids: Vec<ElementId>,
        /// Deselect the whole current selection before selecting.
        #[serde(default)]
        deselect_all: bool,
    },
    /// Select every element of the current root, or clear the selection.
    SelectAll {
        #[serde(default = "default_true")]
        select: bool,
    },
}

fn default_true() -> bool {
    true
}

impl SelectionCommand {
    /// Decode a command from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed or unknown commands.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// A plain select/deselect command.
    #[must_use]
    pub fn select(selected: Vec<ElementId>, deselected: Vec<ElementId>) -> Self {
        Self::Select { selected_element_ids: selected, deselected_element_ids: deselected, deselect_all: false }
    }
}
