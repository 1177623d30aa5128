//! The shared, observable editor state.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use super::color::Color;
use super::context::RenderingContextHandle;
use super::field::{Field, StateValue};
use super::observers::{Observers, SharedObservers, Subscription, SubscriptionId};
use super::record::StateRecord;
use super::types::{
    BrushShape, CursorShape, MOUSE_BUTTON_COUNT, Mode, MouseButton, ObjectId, ObjectModeState,
    RenderMode, Selection, Tool,
};
use crate::abstract_editor::{
    ActionError, ActionResult, ActionStack, EditAction, Editable, UndoStatus,
};
use crate::config::EditorConfig;
use crate::error::{StateError, StateResult};

type GridActiveCallback = Box<dyn FnMut(bool) + Send>;
type CurrentModeCallback = Box<dyn FnMut(Mode) + Send>;
type TransformChangeCallback = Box<dyn FnMut(ObjectId) + Send>;

/// Hooks installed by collaborators such as the renderer.
#[derive(Default)]
struct Callbacks {
    set_grid_active: Option<GridActiveCallback>,
    set_current_mode: Option<CurrentModeCallback>,
    object_transform_change: Option<TransformChangeCallback>,
}

/// The single editor-wide state object.
///
/// Construct one at startup and pass it by reference to every panel, tool and
/// the viewport. All writes go through [`set`](Self::set) and its typed
/// wrappers, or through [`push_action`](Self::push_action) /
/// [`undo`](Self::undo); every write synchronously notifies the subscribers
/// of the fields it touched.
///
/// Notification order for one write: the collaborator callback for the field
/// (grid or mode), then field subscribers, then whole-record subscribers.
/// There is no deduplication: writing the current value notifies again.
///
/// # Example
///
/// ```ignore
/// let mut state = SharedState::new();
/// let _grid = state.subscribe(&[Field::GridActive], |record, _| {
///     println!("grid visible: {}", record.grid_active());
/// });
///
/// state.push_action(
///     FnAction::new("Brush size 3", |s: &mut SharedState| s.set_brush_size(3.0).is_ok())
///         .with_inverse(|s: &mut SharedState| {
///             let _ = s.set_brush_size(1.0);
///         }),
/// )?;
/// state.undo()?;
/// ```
pub struct SharedState {
    record: StateRecord,
    observers: SharedObservers,
    callbacks: Callbacks,
    /// Taken out while an action step runs, so nested pushes are refused.
    actions: Option<ActionStack<SharedState>>,
    rendering_context: Option<RenderingContextHandle>,
}

impl Editable for SharedState {}

impl SharedState {
    /// Creates the store with every field at its default and an unbounded
    /// undo history.
    pub fn new() -> Self {
        log::info!("Shared editor state created with defaults");
        Self::from_parts(StateRecord::default(), ActionStack::new())
    }

    /// Creates the store from startup configuration.
    ///
    /// Config values go through the same domain checks as [`set`](Self::set);
    /// the first invalid one is returned as an error. An undo depth of zero
    /// would record nothing and is rejected.
    pub fn from_config(config: &EditorConfig) -> StateResult<Self> {
        let max_depth = config
            .max_undo_depth
            .map(|depth| NonZeroUsize::new(depth).ok_or(StateError::InvalidUndoDepth(depth)))
            .transpose()?;

        let mut record = StateRecord::default();
        for value in config.initial_values() {
            value.validate()?;
            record.write(value);
        }
        record.base_url.clone_from(&config.base_url);

        let actions = match max_depth {
            Some(depth) => ActionStack::with_max_depth(depth),
            None => ActionStack::new(),
        };
        log::info!(
            "Shared editor state created from config (tool {}, mode {}, undo depth {:?})",
            record.current_tool,
            record.current_mode,
            config.max_undo_depth
        );
        Ok(Self::from_parts(record, actions))
    }

    fn from_parts(record: StateRecord, actions: ActionStack<SharedState>) -> Self {
        Self {
            record,
            observers: Arc::new(Mutex::new(Observers::default())),
            callbacks: Callbacks::default(),
            actions: Some(actions),
            rendering_context: None,
        }
    }

    /// Read-only view of every field.
    pub fn record(&self) -> &StateRecord {
        &self.record
    }

    /// Returns the current value of `field`.
    pub fn get(&self, field: Field) -> StateValue {
        self.record.get(field)
    }

    /// Assigns a value and notifies the field's subscribers.
    ///
    /// Out-of-domain values are rejected and leave the state untouched.
    pub fn set(&mut self, value: StateValue) -> StateResult {
        if let Err(e) = value.validate() {
            log::warn!("Rejected write to {}: {e}", value.field());
            return Err(e);
        }

        log::debug!("Set {} = {:?}", value.field(), value);
        let fields = self.record.write(value);
        self.publish(&fields);
        Ok(())
    }

    /// Parses `raw` for `field` and assigns it.
    pub fn set_from_str(&mut self, field: Field, raw: &str) -> StateResult {
        let value = StateValue::parse(field, raw)
            .inspect_err(|e| log::warn!("Rejected write to {field}: {e}"))?;
        self.set(value)
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> StateResult {
        self.set(StateValue::Rotation(rotation))
    }

    pub fn set_current_tool(&mut self, tool: Tool) -> StateResult {
        self.set(StateValue::CurrentTool(tool))
    }

    /// Also runs the installed `set_current_mode` callback.
    pub fn set_current_mode(&mut self, mode: Mode) -> StateResult {
        self.set(StateValue::CurrentMode(mode))
    }

    pub fn set_current_render_mode(&mut self, render_mode: RenderMode) -> StateResult {
        self.set(StateValue::CurrentRenderMode(render_mode))
    }

    pub fn set_object_mode_state(&mut self, state: ObjectModeState) -> StateResult {
        self.set(StateValue::ObjectModeState(state))
    }

    pub fn set_brush_size(&mut self, size: f32) -> StateResult {
        self.set(StateValue::BrushSize(size))
    }

    pub fn set_brush_shape(&mut self, shape: BrushShape) -> StateResult {
        self.set(StateValue::BrushShape(shape))
    }

    pub fn set_cursor_shape(&mut self, shape: CursorShape) -> StateResult {
        self.set(StateValue::CursorShape(shape))
    }

    pub fn set_primary_color(&mut self, color: Color) -> StateResult {
        self.set(StateValue::PrimaryColor(color))
    }

    pub fn set_secondary_color(&mut self, color: Color) -> StateResult {
        self.set(StateValue::SecondaryColor(color))
    }

    pub fn set_clear_color(&mut self, color: Color) -> StateResult {
        self.set(StateValue::ClearColor(color))
    }

    pub fn set_snap_active(&mut self, active: bool) -> StateResult {
        self.set(StateValue::SnapActive(active))
    }

    /// Also runs the installed `set_grid_active` callback.
    pub fn set_grid_active(&mut self, active: bool) -> StateResult {
        self.set(StateValue::GridActive(active))
    }

    pub fn set_tree_show_internal(&mut self, show: bool) -> StateResult {
        self.set(StateValue::TreeShowInternal(show))
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> StateResult {
        self.set(StateValue::Fullscreen(fullscreen))
    }

    /// Publishes a single selected object, or clears the single selection.
    pub fn set_selected_object(&mut self, object: Option<ObjectId>) -> StateResult {
        self.set(StateValue::SelectedObject(object))
    }

    /// Flags that a multi-selection (owned by the scene graph) exists.
    pub fn set_multiple_selections(&mut self, multiple: bool) -> StateResult {
        self.set(StateValue::MultipleSelections(multiple))
    }

    /// Replaces the whole selection at once, notifying both selection fields.
    pub fn select(&mut self, selection: Selection) {
        log::debug!("Select {selection:?}");
        let mut fields = self.record.replace_selection(selection, Field::SelectedObject);
        if !fields.contains(&Field::MultipleSelections) {
            fields.push(Field::MultipleSelections);
        }
        self.publish(&fields);
    }

    /// Called by the scene graph when an object is deleted.
    ///
    /// Clears the selection if it pointed at `object`. Returns `true` if it did.
    pub fn object_removed(&mut self, object: ObjectId) -> bool {
        if self.record.selected_object() != Some(object) {
            return false;
        }
        log::debug!("Selected {object} was removed, clearing selection");
        let fields = self
            .record
            .replace_selection(Selection::None, Field::SelectedObject);
        self.publish(&fields);
        true
    }

    /// Records a press or release of a tracked button.
    pub fn set_mouse_button_down(&mut self, button: MouseButton, down: bool) -> StateResult {
        let mut buttons = self.record.is_mouse_down;
        buttons[button.index()] = down;
        self.set(StateValue::IsMouseDown(buttons))
    }

    /// Toggles the slot for a raw pointer-event button index.
    pub fn set_mouse_button(&mut self, index: usize, down: bool) -> StateResult {
        let Some(button) = MouseButton::from_index(index) else {
            let e = StateError::MouseButtonOutOfRange {
                index,
                tracked: MOUSE_BUTTON_COUNT,
            };
            log::warn!("Rejected mouse input: {e}");
            return Err(e);
        };
        self.set_mouse_button_down(button, down)
    }

    // -----------------------------------------------------------------------
    // Rendering contexts
    // -----------------------------------------------------------------------

    /// Installs the application's primary rendering context.
    pub fn attach_rendering_context(&mut self, context: RenderingContextHandle) {
        log::info!("Rendering context \"{}\" attached", context.label());
        self.rendering_context = Some(context);
    }

    /// The primary rendering context. Never substitutes the proxy.
    pub fn rendering_context(&self) -> Option<RenderingContextHandle> {
        self.rendering_context.clone()
    }

    /// The override context, for collaborators that target it explicitly.
    pub fn rendering_context_proxy(&self) -> Option<RenderingContextHandle> {
        self.record.rendering_context_proxy.clone()
    }

    pub fn set_rendering_context_proxy(
        &mut self,
        proxy: Option<RenderingContextHandle>,
    ) -> StateResult {
        self.set(StateValue::RenderingContextProxy(proxy))
    }

    // -----------------------------------------------------------------------
    // Collaborator callbacks
    // -----------------------------------------------------------------------

    /// Installs the hook run on every write to [`Field::GridActive`],
    /// replacing any previous one.
    pub fn install_grid_active_callback(&mut self, callback: impl FnMut(bool) + Send + 'static) {
        log::info!("set_grid_active callback installed");
        self.callbacks.set_grid_active = Some(Box::new(callback));
    }

    /// Installs the hook run on every write to [`Field::CurrentMode`],
    /// replacing any previous one.
    pub fn install_current_mode_callback(&mut self, callback: impl FnMut(Mode) + Send + 'static) {
        log::info!("set_current_mode callback installed");
        self.callbacks.set_current_mode = Some(Box::new(callback));
    }

    /// Installs the hook run by [`notify_transform_change`](Self::notify_transform_change).
    pub fn install_transform_change_callback(
        &mut self,
        callback: impl FnMut(ObjectId) + Send + 'static,
    ) {
        log::info!("object_transform_change callback installed");
        self.callbacks.object_transform_change = Some(Box::new(callback));
    }

    /// Reports a committed transform of `object` to the installed listener.
    ///
    /// Returns `false` if no listener is installed.
    pub fn notify_transform_change(&mut self, object: ObjectId) -> bool {
        match self.callbacks.object_transform_change.as_mut() {
            Some(callback) => {
                log::trace!("Transform of {object} committed");
                callback(object);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Runs `callback` after every write to any of `fields`.
    pub fn subscribe(
        &self,
        fields: &[Field],
        callback: impl Fn(&StateRecord, Field) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.observers.lock().add_fields(fields, Arc::new(callback));
        log::debug!("Subscription {id:?} on {fields:?}");
        Subscription::new(id, &self.observers)
    }

    /// Runs `callback` after every write to any field.
    pub fn subscribe_all(
        &self,
        callback: impl Fn(&StateRecord, Field) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.observers.lock().add_whole_record(Arc::new(callback));
        log::debug!("Subscription {id:?} on every field");
        Subscription::new(id, &self.observers)
    }

    /// Cancels a detached subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.lock().remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn publish(&mut self, fields: &[Field]) {
        for &field in fields {
            match field {
                Field::GridActive => {
                    if let Some(callback) = self.callbacks.set_grid_active.as_mut() {
                        callback(self.record.grid_active);
                    }
                }
                Field::CurrentMode => {
                    if let Some(callback) = self.callbacks.set_current_mode.as_mut() {
                        callback(self.record.current_mode);
                    }
                }
                _ => {}
            }

            // Snapshot so callbacks run without the registry locked.
            let subscribers = self.observers.lock().interested(field);
            log::trace!("Notifying {} subscriber(s) of {field}", subscribers.len());
            for subscriber in subscribers {
                subscriber(&self.record, field);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Undo history
    // -----------------------------------------------------------------------

    /// Applies an action and records it for undo.
    ///
    /// A failing apply step is not recorded and its error is returned. Pushing
    /// from inside another action's step fails with [`ActionError::Busy`].
    pub fn push_action(&mut self, action: impl EditAction<Self> + 'static) -> ActionResult {
        self.push_boxed_action(Box::new(action))
    }

    pub fn push_boxed_action(&mut self, action: Box<dyn EditAction<Self>>) -> ActionResult {
        self.with_actions(|actions, state| actions.push(action, state))
    }

    /// Undoes the most recent action. See [`ActionStack::undo`].
    pub fn undo(&mut self) -> ActionResult<UndoStatus> {
        self.with_actions(|actions, state| actions.undo(state))
    }

    /// Whether the undo control should be enabled.
    pub fn can_undo(&self) -> bool {
        self.actions.as_ref().is_some_and(ActionStack::can_undo)
    }

    /// The undo history, or `None` while an action step is running.
    pub fn action_stack(&self) -> Option<&ActionStack<Self>> {
        self.actions.as_ref()
    }

    /// Drops the whole undo history without running any inverse.
    pub fn clear_actions(&mut self) -> ActionResult {
        self.with_actions(|actions, _| {
            actions.clear();
            Ok(())
        })
    }

    /// Changes the undo depth limit; `None` means unbounded.
    pub fn set_max_undo_depth(&mut self, depth: Option<NonZeroUsize>) -> ActionResult {
        self.with_actions(|actions, _| {
            actions.set_max_depth(depth);
            Ok(())
        })
    }

    fn with_actions<R>(
        &mut self,
        f: impl FnOnce(&mut ActionStack<Self>, &mut Self) -> ActionResult<R>,
    ) -> ActionResult<R> {
        let Some(mut actions) = self.actions.take() else {
            log::warn!("Action stack used while another action step is running");
            return Err(ActionError::Busy);
        };
        let result = f(&mut actions, self);
        self.actions = Some(actions);
        result
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SharedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedState")
            .field("record", &self.record)
            .field("subscribers", &self.subscriber_count())
            .field("actions", &self.actions)
            .field("rendering_context", &self.rendering_context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::abstract_editor::FnAction;
    use crate::state::context::RenderingContext;

    #[derive(Debug)]
    struct Viewport {
        label: &'static str,
        redraws: AtomicU32,
    }

    impl Viewport {
        fn new(label: &'static str) -> Arc<Self> {
            Arc::new(Self {
                label,
                redraws: AtomicU32::new(0),
            })
        }
    }

    impl RenderingContext for Viewport {
        fn label(&self) -> &str {
            self.label
        }

        fn request_redraw(&self) {
            self.redraws.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn recorder(state: &SharedState, fields: &[Field]) -> (Arc<Mutex<Vec<Field>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscription = {
            let seen = Arc::clone(&seen);
            state.subscribe(fields, move |_, field| seen.lock().push(field))
        };
        (seen, subscription)
    }

    #[test]
    fn set_notifies_field_subscribers() {
        let mut state = SharedState::new();
        let (seen, _sub) = recorder(&state, &[Field::BrushSize]);

        state.set_brush_size(4.0).unwrap();
        state.set_snap_active(false).unwrap();

        assert_eq!(state.record().brush_size(), 4.0);
        assert_eq!(*seen.lock(), vec![Field::BrushSize]);
    }

    #[test]
    fn subscriber_sees_new_value() {
        let mut state = SharedState::new();
        let observed = Arc::new(Mutex::new(None));
        let _sub = {
            let observed = Arc::clone(&observed);
            state.subscribe(&[Field::PrimaryColor], move |record, _| {
                *observed.lock() = Some(record.primary_color());
            })
        };

        state.set_primary_color(Color::WHITE).unwrap();
        assert_eq!(*observed.lock(), Some(Color::WHITE));
    }

    #[test]
    fn rejected_set_changes_nothing() {
        let mut state = SharedState::new();
        let (seen, _sub) = recorder(&state, &Field::ALL);

        assert_eq!(
            state.set_brush_size(-1.0),
            Err(StateError::InvalidBrushSize(-1.0))
        );
        assert!(state.set_from_str(Field::CurrentTool, "laser").is_err());
        assert!(state.set_mouse_button(MOUSE_BUTTON_COUNT, true).is_err());

        assert_eq!(state.record().brush_size(), 1.0);
        assert_eq!(state.record().current_tool(), Tool::Edit);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn set_from_str_parses_identifiers() {
        let mut state = SharedState::new();
        state.set_from_str(Field::CurrentTool, "fill").unwrap();
        state.set_from_str(Field::ClearColor, "#101010").unwrap();
        assert_eq!(state.record().current_tool(), Tool::Fill);
        assert_eq!(state.get(Field::ClearColor), StateValue::ClearColor(Color::rgb(16, 16, 16)));
    }

    #[test]
    fn grid_callback_runs_on_every_write() {
        let mut state = SharedState::new();
        let calls = Arc::new(Mutex::new(Vec::new()));
        {
            let calls = Arc::clone(&calls);
            state.install_grid_active_callback(move |active| calls.lock().push(active));
        }

        state.set_grid_active(false).unwrap();
        state.set_grid_active(false).unwrap();
        assert_eq!(*calls.lock(), vec![false, false]);
    }

    #[test]
    fn mode_callback_runs_before_subscribers() {
        let mut state = SharedState::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        {
            let order = Arc::clone(&order);
            state.install_current_mode_callback(move |mode| {
                order.lock().push(format!("callback:{mode}"));
            });
        }
        let _sub = {
            let order = Arc::clone(&order);
            state.subscribe(&[Field::CurrentMode], move |record, _| {
                order.lock().push(format!("subscriber:{}", record.current_mode()));
            })
        };

        state.set_current_mode(Mode::Edit).unwrap();
        assert_eq!(*order.lock(), vec!["callback:edit", "subscriber:edit"]);
    }

    #[test]
    fn whole_record_subscriber_hears_everything() {
        let mut state = SharedState::new();
        let count = Arc::new(AtomicU32::new(0));
        let _sub = {
            let count = Arc::clone(&count);
            state.subscribe_all(move |_, _| {
                count.fetch_add(1, Ordering::Relaxed);
            })
        };

        state.set_current_tool(Tool::Paint).unwrap();
        state.set_fullscreen(true).unwrap();
        state.set_rotation(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let mut state = SharedState::new();
        let (seen, sub) = recorder(&state, &[Field::SnapActive]);

        state.set_snap_active(false).unwrap();
        sub.cancel();
        state.set_snap_active(true).unwrap();

        assert_eq!(seen.lock().len(), 1);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn detached_subscription_needs_explicit_cancel() {
        let mut state = SharedState::new();
        let (seen, sub) = recorder(&state, &[Field::Fullscreen]);
        let id = sub.detach();

        state.set_fullscreen(true).unwrap();
        assert!(state.unsubscribe(id));
        state.set_fullscreen(false).unwrap();

        assert_eq!(seen.lock().len(), 1);
        assert!(!state.unsubscribe(id));
    }

    #[test]
    fn select_notifies_both_selection_fields() {
        let mut state = SharedState::new();
        let (seen, _sub) = recorder(&state, &[Field::SelectedObject, Field::MultipleSelections]);

        state.select(Selection::Single(ObjectId::new(2)));
        assert_eq!(
            *seen.lock(),
            vec![Field::SelectedObject, Field::MultipleSelections]
        );
        assert_eq!(state.record().selected_object(), Some(ObjectId::new(2)));
    }

    #[test]
    fn object_removal_clears_matching_selection() {
        let mut state = SharedState::new();
        let object = ObjectId::new(11);
        state.set_selected_object(Some(object)).unwrap();
        let (seen, _sub) = recorder(&state, &[Field::SelectedObject]);

        assert!(!state.object_removed(ObjectId::new(12)));
        assert!(seen.lock().is_empty());

        assert!(state.object_removed(object));
        assert_eq!(state.record().selected_object(), None);
        assert_eq!(*seen.lock(), vec![Field::SelectedObject]);
    }

    #[test]
    fn mouse_buttons_toggle_in_place() {
        let mut state = SharedState::new();
        state.set_mouse_button(2, true).unwrap();
        assert_eq!(state.record().is_mouse_down(), &[false, false, true, false]);
        state.set_mouse_button(2, false).unwrap();
        assert_eq!(state.record().is_mouse_down(), &[false; MOUSE_BUTTON_COUNT]);
    }

    #[test]
    fn typed_mouse_button_matches_index() {
        let mut state = SharedState::new();
        let (seen, _sub) = recorder(&state, &[Field::IsMouseDown]);

        state.set_mouse_button_down(MouseButton::Back, true).unwrap();
        assert_eq!(state.record().is_mouse_down(), &[false, false, false, true]);
        state.set_mouse_button(MouseButton::Back.index(), false).unwrap();
        assert_eq!(state.record().is_mouse_down(), &[false; MOUSE_BUTTON_COUNT]);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn typed_setters_cover_display_fields() {
        let mut state = SharedState::new();
        let (seen, _sub) = recorder(&state, &Field::ALL);

        state.set_current_render_mode(RenderMode::Normals).unwrap();
        state.set_object_mode_state(ObjectModeState::Rotate).unwrap();
        state.set_brush_shape(BrushShape::Circle).unwrap();
        state.set_cursor_shape(CursorShape::Crosshair).unwrap();
        state.set_clear_color(Color::WHITE).unwrap();
        state.set_tree_show_internal(true).unwrap();

        let record = state.record();
        assert_eq!(record.current_render_mode(), RenderMode::Normals);
        assert_eq!(record.object_mode_state(), ObjectModeState::Rotate);
        assert_eq!(record.brush_shape(), BrushShape::Circle);
        assert_eq!(record.cursor_shape(), CursorShape::Crosshair);
        assert_eq!(record.clear_color(), Color::WHITE);
        assert!(record.tree_show_internal());
        assert_eq!(
            *seen.lock(),
            vec![
                Field::CurrentRenderMode,
                Field::ObjectModeState,
                Field::BrushShape,
                Field::CursorShape,
                Field::ClearColor,
                Field::TreeShowInternal,
            ]
        );
    }

    #[test]
    fn proxy_is_never_substituted() {
        let mut state = SharedState::new();
        let primary = Viewport::new("viewport");
        let thumbnails = Viewport::new("thumbnails");

        state.attach_rendering_context(primary.clone());
        state.set_rendering_context_proxy(Some(thumbnails.clone())).unwrap();

        assert_eq!(state.rendering_context().unwrap().label(), "viewport");
        assert_eq!(state.rendering_context_proxy().unwrap().label(), "thumbnails");

        state.set_rendering_context_proxy(None).unwrap();
        assert!(state.rendering_context_proxy().is_none());
        assert_eq!(state.rendering_context().unwrap().label(), "viewport");
    }

    #[test]
    fn grid_callback_can_drive_renderer() {
        let mut state = SharedState::new();
        let viewport = Viewport::new("viewport");
        state.attach_rendering_context(viewport.clone());

        let context = state.rendering_context().unwrap();
        state.install_grid_active_callback(move |_| context.request_redraw());
        state.set_grid_active(false).unwrap();

        assert_eq!(viewport.redraws.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn transform_change_reaches_listener() {
        let mut state = SharedState::new();
        assert!(!state.notify_transform_change(ObjectId::new(1)));

        let changed = Arc::new(Mutex::new(Vec::new()));
        {
            let changed = Arc::clone(&changed);
            state.install_transform_change_callback(move |id| changed.lock().push(id));
        }
        assert!(state.notify_transform_change(ObjectId::new(1)));
        assert_eq!(*changed.lock(), vec![ObjectId::new(1)]);
    }

    #[test]
    fn push_and_undo_through_store() {
        let mut state = SharedState::new();
        state
            .push_action(
                FnAction::new("Wireframe", |s: &mut SharedState| {
                    s.set_current_render_mode(RenderMode::Wireframe).is_ok()
                })
                .with_inverse(|s: &mut SharedState| {
                    let _ = s.set_current_render_mode(RenderMode::default());
                }),
            )
            .unwrap();
        assert!(state.can_undo());
        assert_eq!(state.record().current_render_mode().as_str(), "wireframe");

        assert_eq!(state.undo().unwrap(), UndoStatus::Undone);
        assert_eq!(state.record().current_render_mode().as_str(), "");
        assert!(!state.can_undo());
    }

    #[test]
    fn nested_push_is_refused() {
        let mut state = SharedState::new();
        let nested = Arc::new(Mutex::new(None));
        {
            let nested = Arc::clone(&nested);
            state
                .push_action(FnAction::new("Outer", move |s: &mut SharedState| {
                    let inner = s.push_action(FnAction::new("Inner", |_: &mut SharedState| true));
                    *nested.lock() = Some(inner);
                    assert!(s.action_stack().is_none());
                    true
                }))
                .unwrap();
        }

        assert_eq!(*nested.lock(), Some(Err(ActionError::Busy)));
        let stack = state.action_stack().unwrap();
        assert_eq!(stack.descriptions().collect::<Vec<_>>(), vec!["Outer"]);
    }

    #[test]
    fn state_error_in_step_rejects_push() {
        #[derive(Debug)]
        struct ShrinkBrush;

        impl EditAction<SharedState> for ShrinkBrush {
            fn apply(&mut self, state: &mut SharedState) -> ActionResult {
                state.set_brush_size(0.0)?;
                Ok(())
            }

            fn undo(&mut self, _state: &mut SharedState) -> ActionResult {
                unreachable!("never recorded");
            }

            fn description(&self) -> &str {
                "Shrink brush"
            }
        }

        let mut state = SharedState::new();
        assert_eq!(
            state.push_action(ShrinkBrush),
            Err(ActionError::State(StateError::InvalidBrushSize(0.0)))
        );
        assert!(state.action_stack().unwrap().is_empty());
    }

    #[test]
    fn from_config_applies_defaults_and_depth() {
        let config = EditorConfig {
            tool: Tool::Add,
            brush_size: 2.5,
            grid_active: false,
            base_url: "/editor".into(),
            max_undo_depth: Some(2),
            ..EditorConfig::default()
        };
        let mut state = SharedState::from_config(&config).unwrap();
        assert_eq!(state.record().current_tool(), Tool::Add);
        assert_eq!(state.record().brush_size(), 2.5);
        assert!(!state.record().grid_active());
        assert_eq!(state.record().base_url(), "/editor");

        for size in [3.0, 4.0, 5.0] {
            state
                .push_action(
                    FnAction::new("Resize", move |s: &mut SharedState| {
                        s.set_brush_size(size).is_ok()
                    })
                    .with_inverse(|_: &mut SharedState| {}),
                )
                .unwrap();
        }
        assert_eq!(state.action_stack().unwrap().len(), 2);
    }

    #[test]
    fn zero_undo_depth_is_rejected() {
        let config = EditorConfig {
            max_undo_depth: Some(0),
            ..EditorConfig::default()
        };
        assert_eq!(
            SharedState::from_config(&config).unwrap_err(),
            StateError::InvalidUndoDepth(0)
        );
    }

    #[test]
    fn depth_change_keeps_recent_actions() {
        let mut state = SharedState::new();
        for size in [2.0, 3.0, 4.0] {
            state
                .push_action(
                    FnAction::new("Resize", move |s: &mut SharedState| {
                        s.set_brush_size(size).is_ok()
                    })
                    .with_inverse(|_: &mut SharedState| {}),
                )
                .unwrap();
        }
        state.set_max_undo_depth(NonZeroUsize::new(1)).unwrap();

        let stack = state.action_stack().unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.max_depth(), NonZeroUsize::new(1));
        assert!(state.can_undo());
    }

    #[test]
    fn from_config_rejects_invalid_values() {
        let config = EditorConfig {
            brush_size: 0.0,
            ..EditorConfig::default()
        };
        assert_eq!(
            SharedState::from_config(&config).unwrap_err(),
            StateError::InvalidBrushSize(0.0)
        );
    }
}
