//! Error types for shared-state mutations.

use thiserror::Error;

/// A value was rejected by the store.
///
/// Every variant is a caller error: the store never clamps or coerces, so a
/// rejected `set` leaves the record untouched and notifies nobody.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("brush size must be a positive finite number, got {0}")]
    InvalidBrushSize(f32),
    #[error("unknown {kind} identifier \"{value}\"")]
    UnknownIdentifier { kind: &'static str, value: String },
    #[error("invalid color \"{0}\" (expected #rrggbb)")]
    InvalidColor(String),
    #[error("rotation must be finite on every axis, got {0}")]
    NonFiniteRotation(glam::Vec3),
    #[error("mouse button index {index} out of range (tracking {tracked} buttons)")]
    MouseButtonOutOfRange { index: usize, tracked: usize },
    #[error("undo depth must be at least 1, got {0}")]
    InvalidUndoDepth(usize),
}

pub type StateResult<T = ()> = Result<T, StateError>;
