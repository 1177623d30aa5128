//! Field keys and tagged field values.
//!
//! [`Field`] names every observable slot of the record and is the key of the
//! observer registry. [`StateValue`] carries a value for exactly one field and
//! is what [`SharedState::set`](super::SharedState::set) and
//! [`SharedState::get`](super::SharedState::get) exchange.

use std::fmt;

use glam::Vec3;

use super::color::Color;
use super::context::{RenderingContextHandle, same_context};
use super::types::{
    BrushShape, CursorShape, MOUSE_BUTTON_COUNT, Mode, ObjectId, ObjectModeState, RenderMode,
    Tool,
};
use crate::error::{StateError, StateResult};

/// An observable field of the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Rotation,
    CurrentTool,
    CurrentMode,
    CurrentRenderMode,
    ObjectModeState,
    BrushSize,
    BrushShape,
    CursorShape,
    PrimaryColor,
    SecondaryColor,
    ClearColor,
    SnapActive,
    GridActive,
    TreeShowInternal,
    Fullscreen,
    SelectedObject,
    MultipleSelections,
    IsMouseDown,
    RenderingContextProxy,
}

impl Field {
    pub const ALL: [Self; 19] = [
        Self::Rotation,
        Self::CurrentTool,
        Self::CurrentMode,
        Self::CurrentRenderMode,
        Self::ObjectModeState,
        Self::BrushSize,
        Self::BrushShape,
        Self::CursorShape,
        Self::PrimaryColor,
        Self::SecondaryColor,
        Self::ClearColor,
        Self::SnapActive,
        Self::GridActive,
        Self::TreeShowInternal,
        Self::Fullscreen,
        Self::SelectedObject,
        Self::MultipleSelections,
        Self::IsMouseDown,
        Self::RenderingContextProxy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::CurrentTool => "current_tool",
            Self::CurrentMode => "current_mode",
            Self::CurrentRenderMode => "current_render_mode",
            Self::ObjectModeState => "object_mode_state",
            Self::BrushSize => "brush_size",
            Self::BrushShape => "brush_shape",
            Self::CursorShape => "cursor_shape",
            Self::PrimaryColor => "primary_color",
            Self::SecondaryColor => "secondary_color",
            Self::ClearColor => "clear_color",
            Self::SnapActive => "snap_active",
            Self::GridActive => "grid_active",
            Self::TreeShowInternal => "tree_show_internal",
            Self::Fullscreen => "fullscreen",
            Self::SelectedObject => "selected_object",
            Self::MultipleSelections => "multiple_selections",
            Self::IsMouseDown => "is_mouse_down",
            Self::RenderingContextProxy => "rendering_context_proxy",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value for one [`Field`].
#[derive(Debug, Clone)]
pub enum StateValue {
    Rotation(Vec3),
    CurrentTool(Tool),
    CurrentMode(Mode),
    CurrentRenderMode(RenderMode),
    ObjectModeState(ObjectModeState),
    BrushSize(f32),
    BrushShape(BrushShape),
    CursorShape(CursorShape),
    PrimaryColor(Color),
    SecondaryColor(Color),
    ClearColor(Color),
    SnapActive(bool),
    GridActive(bool),
    TreeShowInternal(bool),
    Fullscreen(bool),
    SelectedObject(Option<ObjectId>),
    MultipleSelections(bool),
    IsMouseDown([bool; MOUSE_BUTTON_COUNT]),
    RenderingContextProxy(Option<RenderingContextHandle>),
}

impl StateValue {
    /// The field this value belongs to.
    pub fn field(&self) -> Field {
        match self {
            Self::Rotation(_) => Field::Rotation,
            Self::CurrentTool(_) => Field::CurrentTool,
            Self::CurrentMode(_) => Field::CurrentMode,
            Self::CurrentRenderMode(_) => Field::CurrentRenderMode,
            Self::ObjectModeState(_) => Field::ObjectModeState,
            Self::BrushSize(_) => Field::BrushSize,
            Self::BrushShape(_) => Field::BrushShape,
            Self::CursorShape(_) => Field::CursorShape,
            Self::PrimaryColor(_) => Field::PrimaryColor,
            Self::SecondaryColor(_) => Field::SecondaryColor,
            Self::ClearColor(_) => Field::ClearColor,
            Self::SnapActive(_) => Field::SnapActive,
            Self::GridActive(_) => Field::GridActive,
            Self::TreeShowInternal(_) => Field::TreeShowInternal,
            Self::Fullscreen(_) => Field::Fullscreen,
            Self::SelectedObject(_) => Field::SelectedObject,
            Self::MultipleSelections(_) => Field::MultipleSelections,
            Self::IsMouseDown(_) => Field::IsMouseDown,
            Self::RenderingContextProxy(_) => Field::RenderingContextProxy,
        }
    }

    /// Checks the value against its field's domain.
    ///
    /// Identifier, color and flag fields are valid by construction; numeric
    /// fields are checked here.
    pub fn validate(&self) -> StateResult {
        match *self {
            Self::BrushSize(size) if !(size.is_finite() && size > 0.0) => {
                Err(StateError::InvalidBrushSize(size))
            }
            Self::Rotation(rotation) if !rotation.is_finite() => {
                Err(StateError::NonFiniteRotation(rotation))
            }
            _ => Ok(()),
        }
    }

    /// Parses a textual value for `field`, e.g. from a console command or a
    /// settings panel text box.
    ///
    /// Selection, mouse-button and context fields have no textual form and
    /// are rejected as unknown identifiers.
    pub fn parse(field: Field, raw: &str) -> StateResult<Self> {
        let flag = |raw: &str| match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(StateError::UnknownIdentifier {
                kind: "flag",
                value: other.to_owned(),
            }),
        };

        let value = match field {
            Field::CurrentTool => Self::CurrentTool(raw.parse()?),
            Field::CurrentMode => Self::CurrentMode(raw.parse()?),
            Field::CurrentRenderMode => Self::CurrentRenderMode(raw.parse()?),
            Field::ObjectModeState => Self::ObjectModeState(raw.parse()?),
            Field::BrushShape => Self::BrushShape(raw.parse()?),
            Field::CursorShape => Self::CursorShape(raw.parse()?),
            Field::PrimaryColor => Self::PrimaryColor(raw.parse()?),
            Field::SecondaryColor => Self::SecondaryColor(raw.parse()?),
            Field::ClearColor => Self::ClearColor(raw.parse()?),
            Field::SnapActive => Self::SnapActive(flag(raw)?),
            Field::GridActive => Self::GridActive(flag(raw)?),
            Field::TreeShowInternal => Self::TreeShowInternal(flag(raw)?),
            Field::Fullscreen => Self::Fullscreen(flag(raw)?),
            Field::MultipleSelections => Self::MultipleSelections(flag(raw)?),
            Field::BrushSize => {
                let size = raw
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| StateError::UnknownIdentifier {
                        kind: "brush size",
                        value: raw.to_owned(),
                    })?;
                Self::BrushSize(size)
            }
            Field::Rotation
            | Field::SelectedObject
            | Field::IsMouseDown
            | Field::RenderingContextProxy => {
                return Err(StateError::UnknownIdentifier {
                    kind: field.as_str(),
                    value: raw.to_owned(),
                });
            }
        };
        value.validate()?;
        Ok(value)
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rotation(a), Self::Rotation(b)) => a == b,
            (Self::CurrentTool(a), Self::CurrentTool(b)) => a == b,
            (Self::CurrentMode(a), Self::CurrentMode(b)) => a == b,
            (Self::CurrentRenderMode(a), Self::CurrentRenderMode(b)) => a == b,
            (Self::ObjectModeState(a), Self::ObjectModeState(b)) => a == b,
            (Self::BrushSize(a), Self::BrushSize(b)) => a == b,
            (Self::BrushShape(a), Self::BrushShape(b)) => a == b,
            (Self::CursorShape(a), Self::CursorShape(b)) => a == b,
            (Self::PrimaryColor(a), Self::PrimaryColor(b))
            | (Self::SecondaryColor(a), Self::SecondaryColor(b))
            | (Self::ClearColor(a), Self::ClearColor(b)) => a == b,
            (Self::SnapActive(a), Self::SnapActive(b))
            | (Self::GridActive(a), Self::GridActive(b))
            | (Self::TreeShowInternal(a), Self::TreeShowInternal(b))
            | (Self::Fullscreen(a), Self::Fullscreen(b))
            | (Self::MultipleSelections(a), Self::MultipleSelections(b)) => a == b,
            (Self::SelectedObject(a), Self::SelectedObject(b)) => a == b,
            (Self::IsMouseDown(a), Self::IsMouseDown(b)) => a == b,
            // Handles compare by identity.
            (Self::RenderingContextProxy(a), Self::RenderingContextProxy(b)) => {
                same_context(a, b)
            }
            _ => false,
        }
    }
}
