//! The editor-wide state record and its startup defaults.

use glam::Vec3;

use super::color::Color;
use super::context::RenderingContextHandle;
use super::field::{Field, StateValue};
use super::types::{
    BrushShape, CursorShape, MOUSE_BUTTON_COUNT, Mode, ObjectId, ObjectModeState, RenderMode,
    Selection, Tool,
};

pub const DEFAULT_PRIMARY_COLOR: Color = Color::rgb(0x3e, 0x86, 0xa0);
pub const DEFAULT_SECONDARY_COLOR: Color = Color::rgb(0xb1, 0x5b, 0x2e);
pub const DEFAULT_CLEAR_COLOR: Color = Color::rgb(0x22, 0x22, 0x22);
pub const DEFAULT_BRUSH_SIZE: f32 = 1.0;
pub const DEFAULT_BASE_URL: &str = "/voxel-mesh-editor";

/// Plain data behind [`SharedState`](super::SharedState).
///
/// Subscribers receive `&StateRecord`; only the store can write to it.
#[derive(Debug, Clone)]
pub struct StateRecord {
    pub(crate) rotation: Vec3,
    pub(crate) current_tool: Tool,
    pub(crate) current_mode: Mode,
    pub(crate) current_render_mode: RenderMode,
    pub(crate) object_mode_state: ObjectModeState,
    pub(crate) brush_size: f32,
    pub(crate) brush_shape: BrushShape,
    pub(crate) cursor_shape: CursorShape,
    pub(crate) primary_color: Color,
    pub(crate) secondary_color: Color,
    pub(crate) clear_color: Color,
    pub(crate) snap_active: bool,
    pub(crate) grid_active: bool,
    pub(crate) tree_show_internal: bool,
    pub(crate) fullscreen: bool,
    pub(crate) selection: Selection,
    pub(crate) is_mouse_down: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) rendering_context_proxy: Option<RenderingContextHandle>,
    pub(crate) base_url: String,
}

impl Default for StateRecord {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            current_tool: Tool::default(),
            current_mode: Mode::default(),
            current_render_mode: RenderMode::default(),
            object_mode_state: ObjectModeState::default(),
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_shape: BrushShape::default(),
            cursor_shape: CursorShape::default(),
            primary_color: DEFAULT_PRIMARY_COLOR,
            secondary_color: DEFAULT_SECONDARY_COLOR,
            clear_color: DEFAULT_CLEAR_COLOR,
            snap_active: true,
            grid_active: true,
            tree_show_internal: false,
            fullscreen: false,
            selection: Selection::None,
            is_mouse_down: [false; MOUSE_BUTTON_COUNT],
            rendering_context_proxy: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl StateRecord {
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn current_tool(&self) -> Tool {
        self.current_tool
    }

    pub fn current_mode(&self) -> Mode {
        self.current_mode
    }

    pub fn current_render_mode(&self) -> RenderMode {
        self.current_render_mode
    }

    pub fn object_mode_state(&self) -> ObjectModeState {
        self.object_mode_state
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn brush_shape(&self) -> BrushShape {
        self.brush_shape
    }

    pub fn cursor_shape(&self) -> CursorShape {
        self.cursor_shape
    }

    pub fn primary_color(&self) -> Color {
        self.primary_color
    }

    pub fn secondary_color(&self) -> Color {
        self.secondary_color
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn snap_active(&self) -> bool {
        self.snap_active
    }

    pub fn grid_active(&self) -> bool {
        self.grid_active
    }

    pub fn tree_show_internal(&self) -> bool {
        self.tree_show_internal
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The selected object; `None` when nothing or several objects are selected.
    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selection.selected_object()
    }

    pub fn multiple_selections(&self) -> bool {
        self.selection.is_multiple()
    }

    pub fn is_mouse_down(&self) -> &[bool; MOUSE_BUTTON_COUNT] {
        &self.is_mouse_down
    }

    /// The override context, if a collaborator installed one.
    pub fn rendering_context_proxy(&self) -> Option<&RenderingContextHandle> {
        self.rendering_context_proxy.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reads any field as a tagged value.
    pub fn get(&self, field: Field) -> StateValue {
        match field {
            Field::Rotation => StateValue::Rotation(self.rotation),
            Field::CurrentTool => StateValue::CurrentTool(self.current_tool),
            Field::CurrentMode => StateValue::CurrentMode(self.current_mode),
            Field::CurrentRenderMode => StateValue::CurrentRenderMode(self.current_render_mode),
            Field::ObjectModeState => StateValue::ObjectModeState(self.object_mode_state),
            Field::BrushSize => StateValue::BrushSize(self.brush_size),
            Field::BrushShape => StateValue::BrushShape(self.brush_shape),
            Field::CursorShape => StateValue::CursorShape(self.cursor_shape),
            Field::PrimaryColor => StateValue::PrimaryColor(self.primary_color),
            Field::SecondaryColor => StateValue::SecondaryColor(self.secondary_color),
            Field::ClearColor => StateValue::ClearColor(self.clear_color),
            Field::SnapActive => StateValue::SnapActive(self.snap_active),
            Field::GridActive => StateValue::GridActive(self.grid_active),
            Field::TreeShowInternal => StateValue::TreeShowInternal(self.tree_show_internal),
            Field::Fullscreen => StateValue::Fullscreen(self.fullscreen),
            Field::SelectedObject => StateValue::SelectedObject(self.selected_object()),
            Field::MultipleSelections => StateValue::MultipleSelections(self.multiple_selections()),
            Field::IsMouseDown => StateValue::IsMouseDown(self.is_mouse_down),
            Field::RenderingContextProxy => {
                StateValue::RenderingContextProxy(self.rendering_context_proxy.clone())
            }
        }
    }

    /// Stores an already validated value and returns every field whose
    /// subscribers must hear about it.
    ///
    /// The written field is always reported, even when the value did not
    /// change. Selection writes also report the sibling selection field when
    /// its derived value changed.
    pub(crate) fn write(&mut self, value: StateValue) -> Vec<Field> {
        let field = value.field();
        match value {
            StateValue::Rotation(v) => self.rotation = v,
            StateValue::CurrentTool(v) => self.current_tool = v,
            StateValue::CurrentMode(v) => self.current_mode = v,
            StateValue::CurrentRenderMode(v) => self.current_render_mode = v,
            StateValue::ObjectModeState(v) => self.object_mode_state = v,
            StateValue::BrushSize(v) => self.brush_size = v,
            StateValue::BrushShape(v) => self.brush_shape = v,
            StateValue::CursorShape(v) => self.cursor_shape = v,
            StateValue::PrimaryColor(v) => self.primary_color = v,
            StateValue::SecondaryColor(v) => self.secondary_color = v,
            StateValue::ClearColor(v) => self.clear_color = v,
            StateValue::SnapActive(v) => self.snap_active = v,
            StateValue::GridActive(v) => self.grid_active = v,
            StateValue::TreeShowInternal(v) => self.tree_show_internal = v,
            StateValue::Fullscreen(v) => self.fullscreen = v,
            StateValue::IsMouseDown(v) => self.is_mouse_down = v,
            StateValue::RenderingContextProxy(v) => self.rendering_context_proxy = v,
            StateValue::SelectedObject(Some(id)) => {
                return self.replace_selection(Selection::Single(id), field);
            }
            StateValue::SelectedObject(None) => {
                // Clearing the single-object slot leaves a multi-selection alone.
                let next = match self.selection {
                    Selection::Single(_) => Selection::None,
                    other => other,
                };
                return self.replace_selection(next, field);
            }
            StateValue::MultipleSelections(true) => {
                return self.replace_selection(Selection::Multiple, field);
            }
            StateValue::MultipleSelections(false) => {
                let next = match self.selection {
                    Selection::Multiple => Selection::None,
                    other => other,
                };
                return self.replace_selection(next, field);
            }
        }
        vec![field]
    }

    /// Replaces the selection, reporting `primary` plus whichever selection
    /// fields changed their derived value.
    pub(crate) fn replace_selection(&mut self, next: Selection, primary: Field) -> Vec<Field> {
        let previous = std::mem::replace(&mut self.selection, next);
        let mut fields = vec![primary];
        for field in [Field::SelectedObject, Field::MultipleSelections] {
            if field != primary && self.get(field) != previous_value(previous, field) {
                fields.push(field);
            }
        }
        fields
    }
}

fn previous_value(selection: Selection, field: Field) -> StateValue {
    match field {
        Field::MultipleSelections => StateValue::MultipleSelections(selection.is_multiple()),
        _ => StateValue::SelectedObject(selection.selected_object()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_startup_values() {
        let record = StateRecord::default();
        assert_eq!(record.current_tool(), Tool::Edit);
        assert_eq!(record.current_mode(), Mode::Object);
        assert_eq!(record.brush_size(), 1.0);
        assert_eq!(record.primary_color().to_string(), "#3e86a0");
        assert_eq!(record.secondary_color().to_string(), "#b15b2e");
        assert_eq!(record.clear_color().to_string(), "#222222");
        assert!(record.snap_active());
        assert!(record.grid_active());
        assert!(!record.tree_show_internal());
        assert!(!record.fullscreen());
        assert_eq!(record.selection(), Selection::None);
        assert_eq!(record.is_mouse_down(), &[false; MOUSE_BUTTON_COUNT]);
        assert!(record.rendering_context_proxy().is_none());
        assert_eq!(record.base_url(), "/voxel-mesh-editor");
    }

    #[test]
    fn get_reflects_every_field() {
        let record = StateRecord::default();
        for field in Field::ALL {
            assert_eq!(record.get(field).field(), field);
        }
    }

    #[test]
    fn write_reports_field_even_when_unchanged() {
        let mut record = StateRecord::default();
        assert_eq!(record.write(StateValue::GridActive(true)), vec![Field::GridActive]);
    }

    #[test]
    fn single_selection_replaces_multiple() {
        let mut record = StateRecord::default();
        record.write(StateValue::MultipleSelections(true));

        let fields = record.write(StateValue::SelectedObject(Some(ObjectId::new(3))));
        assert_eq!(fields, vec![Field::SelectedObject, Field::MultipleSelections]);
        assert_eq!(record.selected_object(), Some(ObjectId::new(3)));
        assert!(!record.multiple_selections());
    }

    #[test]
    fn multiple_selection_clears_single() {
        let mut record = StateRecord::default();
        record.write(StateValue::SelectedObject(Some(ObjectId::new(1))));

        let fields = record.write(StateValue::MultipleSelections(true));
        assert_eq!(fields, vec![Field::MultipleSelections, Field::SelectedObject]);
        assert_eq!(record.selected_object(), None);
        assert!(record.multiple_selections());
    }

    #[test]
    fn clearing_single_slot_keeps_multiple() {
        let mut record = StateRecord::default();
        record.write(StateValue::MultipleSelections(true));

        let fields = record.write(StateValue::SelectedObject(None));
        assert_eq!(fields, vec![Field::SelectedObject]);
        assert!(record.multiple_selections());
    }

    #[test]
    fn clearing_multiple_flag_keeps_single() {
        let mut record = StateRecord::default();
        record.write(StateValue::SelectedObject(Some(ObjectId::new(5))));

        let fields = record.write(StateValue::MultipleSelections(false));
        assert_eq!(fields, vec![Field::MultipleSelections]);
        assert_eq!(record.selected_object(), Some(ObjectId::new(5)));
    }
}
