//! Undoable editing for the voxel editor.
//!
//! The types here are independent of the shared state: [`ActionStack`] is
//! generic over any [`Editable`] target, and the store composes one in as its
//! undo history.
//!
//! - [`Editable`] — marker trait for types that can be edited
//! - [`EditAction`] — an edit with an apply step and an optional inverse
//! - [`FnAction`] — closure-pair action, the usual way tools register edits
//! - [`ActionStack`] — LIFO history with checkpoint semantics
//!
//! # Checkpoints
//!
//! An action whose [`EditAction::is_reversible`] returns `false` is still
//! recorded, but undo refuses to pass it. Every further undo reports
//! [`UndoStatus::NothingToUndo`] until something reversible is pushed on top.

mod action;
mod stack;

pub use action::{ActionError, ActionResult, EditAction, Editable, FnAction};
pub use stack::{ActionStack, UndoStatus};
