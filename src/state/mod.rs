//! Shared, observable editor state.
//!
//! [`SharedState`] owns the [`StateRecord`], the observer registry and the undo
//! history. Panels and tools subscribe to [`Field`]s and are called back
//! synchronously on every write; collaborators that must react to the grid or
//! mode (the renderer) install callbacks instead.

mod color;
mod context;
mod field;
mod observers;
mod record;
mod store;
mod types;

pub use color::Color;
pub use context::{RenderingContext, RenderingContextHandle};
pub use field::{Field, StateValue};
pub use observers::{Subscriber, Subscription, SubscriptionId};
pub use record::{
    DEFAULT_BASE_URL, DEFAULT_BRUSH_SIZE, DEFAULT_CLEAR_COLOR, DEFAULT_PRIMARY_COLOR,
    DEFAULT_SECONDARY_COLOR, StateRecord,
};
pub use store::SharedState;
pub use types::{
    BrushShape, CursorShape, MOUSE_BUTTON_COUNT, Mode, MouseButton, ObjectId, ObjectModeState,
    RenderMode, Selection, Tool,
};
