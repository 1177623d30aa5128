//! Rendering-context handles.
//!
//! The 3D viewport is an external collaborator. The store only hands out
//! shared handles to it; it never draws or raycasts itself.

use std::fmt;
use std::sync::Arc;

/// The surface through which the viewport issues draw and query operations.
pub trait RenderingContext: fmt::Debug + Send + Sync {
    /// A short name for logs, e.g. `"viewport"` or `"thumbnails"`.
    fn label(&self) -> &str;

    /// Asks the context to redraw on its next frame.
    fn request_redraw(&self);
}

/// Shared handle to a [`RenderingContext`].
pub type RenderingContextHandle = Arc<dyn RenderingContext>;

/// Identity comparison for optional handles.
pub(crate) fn same_context(
    a: &Option<RenderingContextHandle>,
    b: &Option<RenderingContextHandle>,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
        (None, None) => true,
        _ => false,
    }
}
