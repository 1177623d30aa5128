//! # Voxel Editor State
//!
//! The coordination point of the voxel mesh editor: one shared, observable
//! state object that every panel, tool and the 3D viewport read from and
//! write to, plus the undo history that tools register their edits with.
//!
//! - [`state`] — [`SharedState`], its fields, subscriptions and collaborator callbacks
//! - [`abstract_editor`] — [`EditAction`], [`FnAction`] and the LIFO [`ActionStack`]
//! - [`config`] — startup defaults from `editor.toml`
//!
//! Everything runs on the editor's event-loop thread. Writes notify
//! subscribers synchronously, and action steps never interleave.

pub mod abstract_editor;
pub mod config;
pub mod error;
pub mod state;

pub use abstract_editor::{
    ActionError, ActionResult, ActionStack, EditAction, Editable, FnAction, UndoStatus,
};
pub use config::{ConfigError, EditorConfig, load_config, load_or_default};
pub use error::{StateError, StateResult};
pub use state::{Field, SharedState, StateRecord, StateValue, Subscription};
