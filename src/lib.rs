//! Selection bookkeeping for a browser-hosted diagram editor.
//!
//! The crate owns the set of currently selected diagram elements and keeps it
//! consistent with the model root the editor is showing. When the root is
//! swapped or the selection is edited, the tracker prunes identifiers that no
//! longer resolve, emits one aggregated selection feedback action for the
//! rendering layer, and then notifies registered listeners.
//!
//! Everything runs on the editor's single event loop: roots and listeners are
//! shared through `Rc`, and the tracker is deliberately `!Send`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`tracker`] | [`tracker::SelectionTracker`], the update algorithm and selection queries |
//! | [`model`] | Model root / element traits and the in-memory [`model::DiagramRoot`] |
//! | [`feedback`] | Selection feedback actions, the dispatcher trait, and [`feedback::FeedbackQueue`] |
//! | [`listener`] | The [`listener::SelectionListener`] observer trait |
//! | [`command`] | Host-facing selection commands decoded from JSON |
//! | [`config`] | Environment-driven [`config::SelectionConfig`] |

pub mod command;
pub mod config;
pub mod feedback;
pub mod listener;
pub mod model;
pub mod tracker;

pub use command::SelectionCommand;
pub use config::{ConfigError, SelectionConfig};
pub use feedback::{FeedbackAction, FeedbackDispatcher, FeedbackQueue, FeedbackSource, SelectFeedback};
pub use listener::{ListenerError, SelectionListener};
pub use model::{DiagramElement, DiagramRoot, ElementId, ModelElement, ModelError, ModelRoot};
pub use tracker::{SelectionDelta, SelectionError, SelectionTracker};
