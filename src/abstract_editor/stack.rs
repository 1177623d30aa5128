//! LIFO action stack.
//!
//! [`ActionStack`] records [`EditAction`] trait objects in commit order and
//! undoes them in reverse. There is no redo buffer: redo is expressed by
//! pushing a new action that repeats the original effect.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;

use super::action::{ActionResult, EditAction, Editable};

/// Outcome of [`ActionStack::undo`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoStatus {
    /// The top action's inverse ran and the action was removed.
    Undone,
    /// The stack is empty, or its top action is a checkpoint.
    NothingToUndo,
}

impl UndoStatus {
    pub fn is_undone(self) -> bool {
        self == Self::Undone
    }
}

/// Manages the undo history of editor actions.
///
/// The stack only grows at the tail ([`push`](Self::push)) and only shrinks
/// at the tail ([`undo`](Self::undo)). The one exception is the optional
/// depth limit: when set, pushing past it drops the oldest entry.
///
/// # Example
///
/// ```ignore
/// let mut stack = ActionStack::new();
/// let mut grid = VoxelGrid::new();
///
/// stack.push(Box::new(place_voxel), &mut grid)?;
/// assert_eq!(stack.undo(&mut grid)?, UndoStatus::Undone);
/// ```
pub struct ActionStack<T: Editable> {
    actions: VecDeque<Box<dyn EditAction<T>>>,
    max_depth: Option<NonZeroUsize>,
}

impl<T: Editable> ActionStack<T> {
    /// Creates an empty stack with unbounded depth.
    pub fn new() -> Self {
        Self {
            actions: VecDeque::new(),
            max_depth: None,
        }
    }

    /// Creates an empty stack that keeps at most `max_depth` actions.
    ///
    /// The most recent push always survives trimming.
    pub fn with_max_depth(max_depth: NonZeroUsize) -> Self {
        Self {
            actions: VecDeque::new(),
            max_depth: Some(max_depth),
        }
    }

    /// Applies the action to the target and, on success, appends it.
    ///
    /// A failing apply step leaves the stack untouched and the error is
    /// returned to the caller.
    pub fn push(&mut self, mut action: Box<dyn EditAction<T>>, target: &mut T) -> ActionResult {
        if let Err(e) = action.apply(target) {
            log::warn!("Action \"{}\" failed to apply: {e}", action.description());
            return Err(e);
        }

        log::debug!(
            "Pushed \"{}\" (depth {})",
            action.description(),
            self.actions.len() + 1
        );
        self.actions.push_back(action);
        self.enforce_depth();
        Ok(())
    }

    /// Undoes the most recent action.
    ///
    /// An empty stack, or a checkpoint on top, yields
    /// [`UndoStatus::NothingToUndo`] and changes nothing. A checkpoint stays in
    /// place, so repeated calls keep reporting the same boundary.
    ///
    /// If the inverse step itself fails, the action is still consumed and the
    /// error is returned.
    pub fn undo(&mut self, target: &mut T) -> ActionResult<UndoStatus> {
        match self.actions.back() {
            None => return Ok(UndoStatus::NothingToUndo),
            Some(top) if !top.is_reversible() => {
                log::debug!("Undo blocked by checkpoint \"{}\"", top.description());
                return Ok(UndoStatus::NothingToUndo);
            }
            Some(_) => {}
        }

        let Some(mut action) = self.actions.pop_back() else {
            return Ok(UndoStatus::NothingToUndo);
        };
        if let Err(e) = action.undo(target) {
            log::warn!("Undo of \"{}\" failed: {e}", action.description());
            return Err(e);
        }
        log::debug!(
            "Undid \"{}\" (depth {})",
            action.description(),
            self.actions.len()
        );
        Ok(UndoStatus::Undone)
    }

    /// Returns `true` if the next [`undo`](Self::undo) would run an inverse.
    pub fn can_undo(&self) -> bool {
        self.actions.back().is_some_and(|a| a.is_reversible())
    }

    /// Returns `true` if the top action is a checkpoint.
    pub fn at_checkpoint(&self) -> bool {
        self.actions.back().is_some_and(|a| !a.is_reversible())
    }

    /// Returns an iterator over action descriptions, most recent first.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().rev().map(|a| a.description())
    }

    /// Returns the number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the depth limit, or `None` when unbounded.
    pub fn max_depth(&self) -> Option<NonZeroUsize> {
        self.max_depth
    }

    /// Changes the depth limit, dropping the oldest actions if the stack is
    /// already deeper than the new limit.
    pub fn set_max_depth(&mut self, max_depth: Option<NonZeroUsize>) {
        self.max_depth = max_depth;
        self.enforce_depth();
    }

    /// Drops all recorded actions without running any inverse.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    fn enforce_depth(&mut self) {
        let Some(max) = self.max_depth else {
            return;
        };
        while self.actions.len() > max.get() {
            if let Some(dropped) = self.actions.pop_front() {
                log::debug!("History full, dropped \"{}\"", dropped.description());
            }
        }
    }
}

impl<T: Editable> Default for ActionStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Editable> fmt::Debug for ActionStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionStack")
            .field("len", &self.actions.len())
            .field("max_depth", &self.max_depth)
            .field("at_checkpoint", &self.at_checkpoint())
            .finish()
    }
}
