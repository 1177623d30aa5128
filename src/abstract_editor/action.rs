//! Editable targets and reversible editor actions.
//!
//! - [`Editable`] — marker trait for types that actions operate on
//! - [`EditAction`] — an edit with an apply step and an optional inverse step
//! - [`FnAction`] — an [`EditAction`] built from a pair of closures
//! - [`ActionError`] / [`ActionResult`] — error handling for actions
//!
//! An action without an inverse is a *checkpoint*: it is recorded like any
//! other action, but undo stops in front of it.

use std::fmt;

use thiserror::Error;

use crate::error::StateError;

/// Marker trait for types that serve as editing targets.
///
/// ```ignore
/// struct VoxelGrid { /* ... */ }
/// impl Editable for VoxelGrid {}
/// ```
pub trait Editable: 'static {}

/// Error type for action execution failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// The apply step reported failure. The action was not recorded.
    #[error("action \"{0}\" was rejected")]
    Rejected(String),
    /// The target object was not found.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// The target is in an invalid state for this action.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A push or undo was issued while another action step was running.
    #[error("another action step is still in flight")]
    Busy,
    /// A shared-state write inside the step was rejected.
    #[error(transparent)]
    State(#[from] StateError),
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type for action operations.
pub type ActionResult<T = ()> = Result<T, ActionError>;

/// A reversible editor action (Command pattern).
///
/// Each implementation stores whatever it needs to redo and undo its own
/// effect: target identifiers, old and new values, voxel snapshots.
///
/// # Object Safety
///
/// This trait is dyn-compatible so that different action types can live in a
/// single [`ActionStack`](super::ActionStack) as `Box<dyn EditAction<T>>`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct ResizeBrush {
///     old: f32,
///     new: f32,
/// }
///
/// impl EditAction<SharedState> for ResizeBrush {
///     fn apply(&mut self, state: &mut SharedState) -> ActionResult {
///         state.set_brush_size(self.new)?;
///         Ok(())
///     }
///
///     fn undo(&mut self, state: &mut SharedState) -> ActionResult {
///         state.set_brush_size(self.old)?;
///         Ok(())
///     }
///
///     fn description(&self) -> &str {
///         "Resize brush"
///     }
/// }
/// ```
pub trait EditAction<T: Editable>: fmt::Debug + Send {
    /// Applies the action to the target.
    ///
    /// An `Err` means the edit did not happen; the stack will not record it.
    fn apply(&mut self, target: &mut T) -> ActionResult;

    /// Reverses the action.
    ///
    /// Must restore the target to the state before [`apply`](Self::apply)
    /// was called. Never called when [`is_reversible`](Self::is_reversible)
    /// returns `false`.
    fn undo(&mut self, target: &mut T) -> ActionResult;

    /// A short, human-readable description for the history panel.
    fn description(&self) -> &str;

    /// Whether this action has an inverse step.
    ///
    /// Irreversible actions act as undo boundaries.
    ///
    /// Default: `true`.
    fn is_reversible(&self) -> bool {
        true
    }
}

type ApplyFn<T> = Box<dyn FnMut(&mut T) -> bool + Send>;
type InverseFn<T> = Box<dyn FnMut(&mut T) + Send>;

/// An action assembled from closures: a required apply step returning
/// success, and an optional inverse step.
///
/// ```ignore
/// state.push_action(
///     FnAction::new("Brush size 3", |s: &mut SharedState| s.set_brush_size(3.0).is_ok())
///         .with_inverse(|s: &mut SharedState| {
///             let _ = s.set_brush_size(1.0);
///         }),
/// )?;
/// ```
pub struct FnAction<T: Editable> {
    description: String,
    apply: ApplyFn<T>,
    inverse: Option<InverseFn<T>>,
}

impl<T: Editable> FnAction<T> {
    /// Creates an action with only an apply step (a checkpoint).
    pub fn new(
        description: impl Into<String>,
        apply: impl FnMut(&mut T) -> bool + Send + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            apply: Box::new(apply),
            inverse: None,
        }
    }

    /// Adds the inverse step, making the action undoable.
    pub fn with_inverse(mut self, inverse: impl FnMut(&mut T) + Send + 'static) -> Self {
        self.inverse = Some(Box::new(inverse));
        self
    }
}

impl<T: Editable> EditAction<T> for FnAction<T> {
    fn apply(&mut self, target: &mut T) -> ActionResult {
        if (self.apply)(target) {
            Ok(())
        } else {
            Err(ActionError::Rejected(self.description.clone()))
        }
    }

    fn undo(&mut self, target: &mut T) -> ActionResult {
        let inverse = self.inverse.as_mut().ok_or_else(|| {
            ActionError::InvalidState(format!("\"{}\" has no inverse", self.description))
        })?;
        inverse(target);
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_reversible(&self) -> bool {
        self.inverse.is_some()
    }
}

impl<T: Editable> fmt::Debug for FnAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction")
            .field("description", &self.description)
            .field("reversible", &self.inverse.is_some())
            .finish()
    }
}
