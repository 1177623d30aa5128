//! Closed identifier domains and small value types held by the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Declares a closed set of string identifiers.
///
/// Generates the enum plus `ALL`, `as_str`, `Default`, `Display`, `FromStr`
/// and serde support through the identifier string. Unknown identifiers are
/// rejected with [`StateError::UnknownIdentifier`].
macro_rules! identifier_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal, default $default:ident) {
            $( $(#[$vmeta:meta])* $variant:ident => $ident:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $ident,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StateError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($ident => Ok(Self::$variant),)+
                    other => Err(StateError::UnknownIdentifier {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = StateError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }
    };
}

identifier_enum! {
    /// The active editing tool.
    pub enum Tool ("tool", default Edit) {
        Edit => "edit",
        Select => "select",
        /// Adds voxels under the brush.
        Add => "add",
        /// Removes voxels under the brush.
        Remove => "remove",
        Paint => "paint",
        Fill => "fill",
        /// Samples a voxel color into the primary color.
        Pick => "pick",
        Move => "move",
        Rotate => "rotate",
        Scale => "scale",
    }
}

identifier_enum! {
    /// Top-level interaction mode.
    pub enum Mode ("mode", default Object) {
        Object => "object",
        Edit => "edit",
        Paint => "paint",
    }
}

identifier_enum! {
    /// How the viewport shades meshes. `Default` is the empty identifier.
    pub enum RenderMode ("render mode", default Default) {
        Default => "",
        Solid => "solid",
        Wireframe => "wireframe",
        Normals => "normals",
        Unlit => "unlit",
    }
}

identifier_enum! {
    /// Sub-state of object mode: what dragging a selected object does.
    pub enum ObjectModeState ("object mode state", default Select) {
        Select => "select",
        Translate => "translate",
        Rotate => "rotate",
        Scale => "scale",
    }
}

identifier_enum! {
    pub enum BrushShape ("brush shape", default Square) {
        Square => "square",
        Circle => "circle",
        Diamond => "diamond",
    }
}

identifier_enum! {
    /// Viewport cursor, named after the CSS cursor keywords.
    pub enum CursorShape ("cursor shape", default Initial) {
        Initial => "initial",
        Pointer => "pointer",
        Crosshair => "crosshair",
        Move => "move",
        Grab => "grab",
        Grabbing => "grabbing",
        Cell => "cell",
        NotAllowed => "not-allowed",
        Wait => "wait",
    }
}

/// Number of mouse buttons whose pressed state is tracked.
pub const MOUSE_BUTTON_COUNT: usize = 4;

/// A tracked mouse button, indexed the way pointer events number them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary = 0,
    Auxiliary = 1,
    Secondary = 2,
    Back = 3,
}

impl MouseButton {
    pub const ALL: [Self; MOUSE_BUTTON_COUNT] =
        [Self::Primary, Self::Auxiliary, Self::Secondary, Self::Back];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Non-owning identity of a mesh object in the scene graph.
///
/// The scene graph owns the object; the store only remembers which one is
/// selected and forgets it when told the object was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// What is currently selected.
///
/// A multi-selection set is owned by the scene graph; the store only records
/// that one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    #[default]
    None,
    Single(ObjectId),
    Multiple,
}

impl Selection {
    /// The selected object, present only for a single selection.
    pub fn selected_object(self) -> Option<ObjectId> {
        match self {
            Self::Single(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_multiple(self) -> bool {
        self == Self::Multiple
    }
}
