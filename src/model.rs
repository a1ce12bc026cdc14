//! Model roots: the element trees the selection is validated against.
//!
//! The tracker never owns or mutates a root. It only needs two capabilities,
//! captured by [`ModelRoot`]: resolving an identifier through the root's index
//! and enumerating every element. Roots are shared as `Rc<R>` and compared by
//! pointer identity, so swapping in a new snapshot is a cheap reference swap.
//!
//! [`DiagramRoot`] is the in-memory implementation used by hosts that receive
//! the model as a JSON snapshot.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

/// Identifier of a diagram element.
pub type ElementId = String;

/// Error returned when building a [`DiagramRoot`] from a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The snapshot is not valid JSON for a diagram root.
    #[error("invalid model snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// The snapshot lists the same element id more than once.
    #[error("duplicate element id in snapshot: {0}")]
    DuplicateElement(ElementId),
}

/// A single element of a model root.
pub trait ModelElement {
    /// The element's identifier.
    fn id(&self) -> &str;

    /// Whether the model currently flags this element as selected.
    fn is_selected(&self) -> bool;
}

/// An element tree with an index over its elements.
pub trait ModelRoot {
    type Element: ModelElement;

    /// Look up an element by id through the root's index.
    fn resolve(&self, id: &str) -> Option<&Self::Element>;

    /// Every element in the root, in index order.
    fn elements(&self) -> impl Iterator<Item = &Self::Element>;
}

/// An element of a [`DiagramRoot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    /// Unique identifier within the root.
    pub id: ElementId,
    /// Element type, e.g. `"node"`, `"edge"`, `"label"`.
    pub kind: String,
    /// Id of the containing element, if nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    /// Selection flag as last applied by selection feedback.
    #[serde(default)]
    pub selected: bool,
    /// Open-ended per-kind properties.
    #[serde(default)]
    pub props: serde_json::Value,
}

impl DiagramElement {
    /// An unselected element with empty props.
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: impl Into<String>) -> Self {
        Self { id: id.into(), kind: kind.into(), parent_id: None, selected: false, props: serde_json::Value::Null }
    }

    /// Builder-style parent assignment.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<ElementId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

impl ModelElement for DiagramElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

#[derive(Deserialize)]
struct Snapshot {
    id: String,
    #[serde(default)]
    elements: Vec<DiagramElement>,
}

/// In-memory model root keyed by element id, preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramRoot {
    id: String,
    elements: IndexMap<ElementId, DiagramElement>,
}

impl DiagramRoot {
    /// Create an empty root.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), elements: IndexMap::new() }
    }

    /// Build a root from a list of elements. Later elements replace earlier
    /// ones with the same id.
    #[must_use]
    pub fn from_elements(id: impl Into<String>, elements: impl IntoIterator<Item = DiagramElement>) -> Self {
        let mut root = Self::new(id);
        for element in elements {
            root.insert(element);
        }
        root
    }

    /// Parse a `{ "id": ..., "elements": [...] }` snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] for malformed input and
    /// [`ModelError::DuplicateElement`] when an id appears twice.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let snapshot: Snapshot = serde_json::from_str(raw)?;
        let mut elements = IndexMap::with_capacity(snapshot.elements.len());
        for element in snapshot.elements {
            match elements.entry(element.id.clone()) {
                Entry::Occupied(entry) => return Err(ModelError::DuplicateElement(entry.key().clone())),
                Entry::Vacant(entry) => {
                    entry.insert(element);
                }
            }
        }
        Ok(Self { id: snapshot.id, elements })
    }

    /// The root's own identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Insert or replace an element.
    pub fn insert(&mut self, element: DiagramElement) {
        self.elements.insert(element.id.clone(), element);
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<DiagramElement> {
        self.elements.shift_remove(id)
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DiagramElement> {
        self.elements.get(id)
    }

    /// Set an element's selection flag. Returns false if the element doesn't exist.
    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.selected = selected;
        true
    }

    /// Number of elements in the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ModelRoot for DiagramRoot {
    type Element = DiagramElement;

    fn resolve(&self, id: &str) -> Option<&DiagramElement> {
        self.elements.get(id)
    }

    fn elements(&self) -> impl Iterator<Item = &DiagramElement> {
        self.elements.values()
    }
}
