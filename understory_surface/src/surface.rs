// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The surface context: tree ownership, activation, capture, modality, hover, detachment.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};
use understory_event_state::click::ClickTracker;
use understory_event_state::repeat::AutoRepeat;
use understory_widget_tree::{CursorImage, Tree, WidgetFlags, WidgetId, WidgetProps};

use crate::config::SurfaceConfig;
use crate::cursor::Cursor;
use crate::event::{
    ActivationEvent, Callback, CursorEvent, Event, Modifiers, MouseButton, MouseButtons,
    WidgetEvent,
};
use crate::factory::WidgetFactory;
use crate::navigator::{FocusNavigator, Navigator};
use crate::target::RenderTarget;
use crate::widget::{EventCtx, Widget, deliver};

type Chain = SmallVec<[WidgetId; 16]>;

/// Host-facing notifications, queued until [`Surface::drain_events`].
#[derive(Clone, Debug)]
pub enum SurfaceEvent {
    /// The root widget changed; carries the previous root.
    RootWindowChanged {
        /// Previous root.
        old: Option<WidgetId>,
    },
    /// The render target changed; carries the previous target.
    RenderTargetChanged {
        /// Previous target.
        old: Rc<dyn RenderTarget>,
    },
    /// The default font changed.
    DefaultFontChanged,
    /// A tooltip appeared.
    TooltipActive(WidgetId),
    /// A tooltip disappeared.
    TooltipInactive(WidgetId),
    /// A visible tooltip switched to new content or a new type.
    TooltipTransition(WidgetId),
}

/// Input routing and focus management for one rendering surface.
///
/// A surface owns a widget [`Tree`] plus the behavior attached to each widget, and all of the
/// state that belongs to no single widget: the root, the active (focused) widget, the modal
/// widget, input capture, the widget under the cursor, pressed buttons and modifiers, click
/// tracking, auto-repeat and tooltips.
///
/// Widget references held by the surface are kept valid by routing every removal from the
/// root's tree through a single detachment step, which clears whichever of those references
/// names the departing widget.
pub struct Surface {
    pub(crate) tree: Tree,
    handlers: HashMap<WidgetId, Box<dyn Widget>>,
    checked_out: SmallVec<[WidgetId; 8]>,
    pending: Vec<(WidgetId, Callback, Event)>,
    pub(crate) factory: Rc<dyn WidgetFactory>,
    target: Rc<dyn RenderTarget>,
    navigator: Option<Box<dyn Navigator>>,
    pub(crate) config: SurfaceConfig,
    pub(crate) surface_size: Size,
    pub(crate) cursor: Cursor,
    pub(crate) root: Option<WidgetId>,
    pub(crate) active: Option<WidgetId>,
    pub(crate) modal: Option<WidgetId>,
    pub(crate) capture: Option<WidgetId>,
    pub(crate) old_capture: Option<WidgetId>,
    pub(crate) hover: Option<WidgetId>,
    pub(crate) hover_up_to_date: bool,
    pub(crate) buttons: MouseButtons,
    pub(crate) modifiers: Modifiers,
    pub(crate) clicks: ClickTracker<WidgetId>,
    pub(crate) repeat: AutoRepeat<MouseButton>,
    pub(crate) tooltips: HashMap<String, WidgetId>,
    pub(crate) tooltip: Option<WidgetId>,
    pub(crate) tooltip_source: Option<WidgetId>,
    pub(crate) tooltip_timer: f64,
    pub(crate) tooltip_swapping: bool,
    default_font: Option<String>,
    pub(crate) clock: f64,
    pub(crate) events: Vec<SurfaceEvent>,
}

impl core::fmt::Debug for Surface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Surface")
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("active", &self.active)
            .field("modal", &self.modal)
            .field("capture", &self.capture)
            .field("hover", &self.hover)
            .field("tooltip", &self.tooltip)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Create a surface rendering into `target`, creating tooltips through `factory`.
    pub fn new(target: Rc<dyn RenderTarget>, factory: Rc<dyn WidgetFactory>) -> Self {
        let config = SurfaceConfig::default();
        let surface_size = target.area().size();
        Self {
            tree: Tree::new(),
            handlers: HashMap::new(),
            checked_out: SmallVec::new(),
            pending: Vec::new(),
            factory,
            target,
            navigator: Some(Box::new(FocusNavigator::default())),
            clicks: ClickTracker::with_thresholds(
                config.multi_click_timeout,
                config.multi_click_tolerance,
            ),
            config,
            surface_size,
            cursor: Cursor::new(surface_size),
            root: None,
            active: None,
            modal: None,
            capture: None,
            old_capture: None,
            hover: None,
            hover_up_to_date: false,
            buttons: MouseButtons::empty(),
            modifiers: Modifiers::empty(),
            repeat: AutoRepeat::new(),
            tooltips: HashMap::new(),
            tooltip: None,
            tooltip_source: None,
            tooltip_timer: 0.0,
            tooltip_swapping: false,
            default_font: None,
            clock: 0.0,
            events: Vec::new(),
        }
    }

    /// Replace the configuration (builder form of [`Surface::set_config`]).
    pub fn with_config(mut self, config: SurfaceConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Replace the keyboard navigator (builder form of [`Surface::set_navigator`]).
    pub fn with_navigator(mut self, navigator: Option<Box<dyn Navigator>>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: SurfaceConfig) {
        self.clicks.timeout = config.multi_click_timeout;
        self.clicks.tolerance = config.multi_click_tolerance;
        self.config = config;
    }

    /// Replace the keyboard navigator; `None` disables keyboard navigation.
    pub fn set_navigator(&mut self, navigator: Option<Box<dyn Navigator>>) {
        self.navigator = navigator;
    }

    // --- queries ---

    /// The widget tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The root widget.
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// The active (focused) widget.
    pub fn active_window(&self) -> Option<WidgetId> {
        self.active
    }

    /// The modal widget.
    pub fn modal_window(&self) -> Option<WidgetId> {
        self.modal
    }

    /// The widget holding input capture.
    pub fn capture_window(&self) -> Option<WidgetId> {
        self.capture
    }

    /// The capture holder to restore when the current one releases.
    pub fn previous_capture_window(&self) -> Option<WidgetId> {
        self.old_capture
    }

    /// The cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Held modifier keys.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Pressed pointer buttons.
    pub fn pressed_buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Surface size, taken from the render target's area.
    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    /// The render target.
    pub fn render_target(&self) -> &Rc<dyn RenderTarget> {
        &self.target
    }

    /// The default font name.
    pub fn default_font(&self) -> Option<&str> {
        self.default_font.as_deref()
    }

    /// Seconds accumulated from time pulses.
    pub fn time(&self) -> f64 {
        self.clock
    }

    /// Take the queued host notifications.
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        core::mem::take(&mut self.events)
    }

    /// Returns true if `widget` is reachable from the root.
    pub fn is_attached(&self, widget: WidgetId) -> bool {
        self.root
            .is_some_and(|root| self.tree.is_in_hierarchy_of(widget, root))
    }

    /// Returns true if `widget` is the active widget or one of its ancestors.
    pub fn is_window_active(&self, widget: WidgetId) -> bool {
        self.active
            .is_some_and(|active| self.tree.is_in_hierarchy_of(active, widget))
    }

    // --- widget management ---

    /// Insert a widget as the topmost child of `parent` (or detached when `None`).
    ///
    /// If the new widget is reachable from the root it receives
    /// [`Widget::on_attached`].
    pub fn insert_widget(
        &mut self,
        parent: Option<WidgetId>,
        props: WidgetProps,
        handler: Option<Box<dyn Widget>>,
    ) -> WidgetId {
        let parent = parent.filter(|&p| self.tree.is_alive(p));
        let id = self.tree.insert(parent, props);
        if let Some(handler) = handler {
            self.handlers.insert(id, handler);
        }
        if self.is_attached(id) {
            self.hover_up_to_date = false;
            self.attach_subtree(id);
        }
        id
    }

    /// Create a widget through the factory and insert it under `parent`.
    ///
    /// Returns `None` if the factory is locked or does not know `type_name`.
    pub fn create_widget(&mut self, type_name: &str, parent: Option<WidgetId>) -> Option<WidgetId> {
        let factory = Rc::clone(&self.factory);
        if factory.is_locked() {
            debug!(type_name, "factory locked; widget not created");
            return None;
        }
        let made = factory.create(type_name)?;
        Some(self.insert_widget(parent, made.props, Some(made.handler)))
    }

    /// Attach (or replace) the behavior of a widget.
    pub fn set_handler(&mut self, widget: WidgetId, handler: Box<dyn Widget>) -> bool {
        if !self.tree.is_alive(widget) {
            return false;
        }
        self.handlers.insert(widget, handler);
        true
    }

    /// Destroy a widget and its subtree.
    ///
    /// Attached widgets are detached first, so every surface reference to them is cleared.
    pub fn destroy_widget(&mut self, widget: WidgetId) {
        if !self.tree.is_alive(widget) {
            warn!(?widget, "destroy_widget on a stale widget");
            return;
        }
        if self.is_attached(widget) {
            self.detach_subtree(widget);
        }
        if !self.tree.is_alive(widget) {
            return;
        }
        // Tooltip instances outlive the widgets they were shown under.
        let tips: SmallVec<[WidgetId; 4]> = self
            .tooltips
            .values()
            .copied()
            .filter(|&t| t != widget && self.tree.is_in_hierarchy_of(t, widget))
            .collect();
        for tip in tips {
            let _ = self.tree.remove_child(tip);
        }
        for w in self.tree.subtree_post_order(widget) {
            self.tooltips.retain(|_, t| *t != w);
            if self.tooltip == Some(w) {
                self.tooltip = None;
            }
            self.handlers.remove(&w);
        }
        self.tree.remove(widget);
        debug!(?widget, "destroyed widget");
    }

    /// Make `child` the topmost child of `parent`, moving it from any previous parent.
    ///
    /// Returns `false` for stale handles or if `parent` lies inside `child`'s subtree.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        if !self.tree.is_alive(parent)
            || !self.tree.is_alive(child)
            || self.tree.is_in_hierarchy_of(parent, child)
        {
            return false;
        }
        if self.tree.parent_of(child) == Some(parent) {
            return true;
        }
        if self.is_attached(child) {
            self.detach_subtree(child);
        }
        if !self.tree.add_child(parent, child) {
            return false;
        }
        self.hover_up_to_date = false;
        if self.is_attached(child) {
            self.attach_subtree(child);
        }
        true
    }

    /// Detach `child` from its parent without destroying it. Returns the former parent.
    pub fn remove_child(&mut self, child: WidgetId) -> Option<WidgetId> {
        self.tree.parent_of(child)?;
        if self.is_attached(child) {
            self.detach_subtree(child);
        }
        self.hover_up_to_date = false;
        self.tree.remove_child(child)
    }

    /// Show or hide a widget.
    pub fn set_visible(&mut self, widget: WidgetId, visible: bool) {
        if self.tree.flags(widget).is_none_or(|f| f.contains(WidgetFlags::VISIBLE) == visible) {
            return;
        }
        self.tree.set_flag(widget, WidgetFlags::VISIBLE, visible);
        self.hover_up_to_date = false;
        let callback = if visible {
            Callback::Shown
        } else {
            Callback::Hidden
        };
        self.notify(widget, callback, &mut Event::Empty);
    }

    /// Enable or disable a widget.
    pub fn set_enabled(&mut self, widget: WidgetId, enabled: bool) {
        self.set_flag(widget, WidgetFlags::DISABLED, !enabled);
    }

    /// Set or clear behavior flags. Use [`Surface::set_visible`] for visibility.
    pub fn set_flag(&mut self, widget: WidgetId, flag: WidgetFlags, on: bool) {
        self.tree.set_flag(widget, flag, on);
        self.hover_up_to_date = false;
    }

    /// Move or resize a widget (parent-local bounds).
    pub fn set_rect(&mut self, widget: WidgetId, rect: Rect) {
        let Some(props) = self.tree.props_mut(widget) else {
            return;
        };
        props.rect = rect;
        self.hover_up_to_date = false;
        if self.tooltip.is_some() && self.tooltip_source == Some(widget) {
            self.position_tooltip();
        }
    }

    /// Replace a widget's display text.
    pub fn set_text(&mut self, widget: WidgetId, text: impl Into<String>) {
        let Some(props) = self.tree.props_mut(widget) else {
            return;
        };
        props.text = text.into();
        self.notify(widget, Callback::TextChanged, &mut Event::Empty);
    }

    /// Replace a widget's tooltip text; a visible tooltip showing it is updated.
    pub fn set_tooltip_text(&mut self, widget: WidgetId, text: impl Into<String>) {
        let Some(props) = self.tree.props_mut(widget) else {
            return;
        };
        props.tooltip_text = text.into();
        if let (Some(tip), Some(source)) = (self.tooltip, self.tooltip_source)
            && self.tree.is_in_hierarchy_of(source, widget)
        {
            let text = String::from(self.tree.effective_tooltip_text(source));
            self.set_text(tip, text);
        }
    }

    /// Replace a widget's tooltip type; a visible tooltip switches type on the next pulse.
    pub fn set_tooltip_type(&mut self, widget: WidgetId, type_name: impl Into<String>) {
        if let Some(props) = self.tree.props_mut(widget) {
            props.tooltip_type = type_name.into();
        }
    }

    /// Replace a widget's hover cursor image.
    pub fn set_cursor_image(&mut self, widget: WidgetId, image: Option<CursorImage>) {
        let Some(props) = self.tree.props_mut(widget) else {
            return;
        };
        props.cursor = image;
        if self.hover == Some(widget) {
            self.refresh_cursor_image();
        }
    }

    /// Replace the cursor image used when the hovered widget names none.
    pub fn set_default_cursor_image(&mut self, image: Option<CursorImage>) {
        self.cursor.set_default_image(image);
        self.refresh_cursor_image();
    }

    // --- root, activation, modality, capture ---

    /// Replace the root widget.
    ///
    /// The old root's subtree is detached (clearing every reference into it) and the new
    /// root's subtree attached. Queues [`SurfaceEvent::RootWindowChanged`].
    pub fn set_root(&mut self, root: Option<WidgetId>) {
        if self.root == root {
            return;
        }
        if root.is_some_and(|r| !self.tree.is_alive(r)) {
            warn!(?root, "set_root with a stale widget");
            return;
        }
        let old = self.root;
        if let Some(old_root) = old {
            self.detach_subtree(old_root);
        }
        self.root = root;
        self.hover_up_to_date = false;
        if let Some(new_root) = root {
            self.attach_subtree(new_root);
        }
        debug!(?old, ?root, "root changed");
        self.events.push(SurfaceEvent::RootWindowChanged { old });
    }

    /// Make `widget` the active widget, optionally raising it first.
    ///
    /// Fails (returning `false`, no state change) for widgets that are not attached to this
    /// surface, cannot take focus, or are not effectively visible. Otherwise returns whether
    /// the raise changed any sibling order, even when `widget` was already active.
    ///
    /// The old active branch is deactivated leaf first up to (excluding) the common ancestor,
    /// releasing capture held by any of its widgets; the new branch is then activated from
    /// below the common ancestor down to `widget`.
    pub fn set_active(&mut self, widget: Option<WidgetId>, move_to_front: bool) -> bool {
        if let Some(w) = widget
            && (!self.is_attached(w)
                || !self.tree.can_focus(w)
                || !self.tree.is_effectively_visible(w))
        {
            return false;
        }

        let z_changed = move_to_front && widget.is_some_and(|w| self.tree.move_to_front(w));
        if z_changed {
            self.hover_up_to_date = false;
        }
        if widget == self.active {
            return z_changed;
        }

        let prev = self.active;
        let common = self.tree.common_ancestor(widget, prev);
        debug!(?prev, ?widget, ?common, "activation change");

        let mut cur = prev.filter(|&p| Some(p) != common);
        while let Some(c) = cur {
            if Some(c) == common {
                break;
            }
            self.release_input_capture(false, Some(c));
            let parent = self.tree.parent_of(c);
            let mut event = Event::Activation(ActivationEvent {
                widget: c,
                other: widget,
                handled: false,
            });
            self.notify(c, Callback::Deactivated, &mut event);
            cur = parent;
        }

        self.active = widget;

        if let Some(w) = widget
            && Some(w) != common
        {
            let mut branch = Chain::new();
            let mut cur = Some(w);
            while let Some(c) = cur {
                if Some(c) == common {
                    break;
                }
                branch.push(c);
                cur = self.tree.parent_of(c);
            }
            for &c in branch.iter().rev() {
                let mut event = Event::Activation(ActivationEvent {
                    widget: c,
                    other: prev,
                    handled: false,
                });
                self.notify(c, Callback::Activated, &mut event);
            }
        }

        z_changed
    }

    /// Make `widget` modal, activating and raising it first; `None` clears modality.
    ///
    /// Returns whether the modal widget now equals the request.
    pub fn set_modal(&mut self, widget: Option<WidgetId>) -> bool {
        match widget {
            Some(w) => {
                let _ = self.set_active(Some(w), true);
                if self.active == Some(w) {
                    self.modal = Some(w);
                    self.hover_up_to_date = false;
                }
            }
            None => self.modal = None,
        }
        debug!(modal = ?self.modal, "modal change");
        self.modal == widget
    }

    /// Route all cursor input to `widget`.
    ///
    /// Only a widget on the active branch may capture. A widget that opts into restoring
    /// capture remembers the previous holder, which gets capture back on release.
    pub fn capture_input(&mut self, widget: WidgetId) -> bool {
        if !self.is_window_active(widget) {
            return false;
        }
        if self.capture == Some(widget) {
            return true;
        }
        if let Some(old) = self.capture {
            if self.tree.has_flag(widget, WidgetFlags::RESTORES_OLD_CAPTURE) {
                self.old_capture = Some(old);
            }
            self.notify(old, Callback::CaptureLost, &mut Event::Widget(WidgetEvent::new(widget)));
            self.repeat.disarm();
            self.hover_up_to_date = false;
        }
        debug!(?widget, "capture gained");
        self.capture = Some(widget);
        self.notify(
            widget,
            Callback::CaptureGained,
            &mut Event::Widget(WidgetEvent::new(widget)),
        );
        true
    }

    /// Release input capture.
    ///
    /// Does nothing when nothing is captured or when `exact` names a different widget.
    /// When `allow_restore` is set and the holder restores old capture, the remembered
    /// previous holder is raised and captures again. The remembered holder is always
    /// forgotten.
    pub fn release_input_capture(&mut self, allow_restore: bool, exact: Option<WidgetId>) {
        let Some(holder) = self.capture else {
            return;
        };
        if exact.is_some_and(|e| e != holder) {
            return;
        }
        self.notify(holder, Callback::CaptureLost, &mut Event::Widget(WidgetEvent::new(holder)));
        self.repeat.disarm();
        self.hover_up_to_date = false;

        let restore = self.old_capture.filter(|&old| {
            allow_restore
                && self.tree.is_alive(old)
                && self.tree.has_flag(holder, WidgetFlags::RESTORES_OLD_CAPTURE)
        });
        match restore {
            Some(old) => {
                debug!(?holder, restored = ?old, "capture restored");
                self.capture = Some(old);
                self.tree.move_to_front(old);
                self.notify(old, Callback::CaptureGained, &mut Event::Widget(WidgetEvent::new(old)));
            }
            None => {
                debug!(?holder, "capture released");
                self.capture = None;
            }
        }
        self.old_capture = None;
    }

    // --- hit testing ---

    /// The widget that should receive cursor input at `point`.
    ///
    /// `None` without a visible root. A capture holder receives everything, refined to the
    /// child under `point` when it distributes captured input; otherwise the deepest widget
    /// under `point` (or the root) is used. A modal widget overrides any result outside its
    /// subtree.
    pub fn cursor_target_window(&self, point: Point, allow_disabled: bool) -> Option<WidgetId> {
        let root = self
            .root
            .filter(|&r| self.tree.is_effectively_visible(r))?;
        let mut dest = match self.capture {
            Some(c) if self.tree.has_flag(c, WidgetFlags::DISTRIBUTES_CAPTURED_INPUT) => self
                .tree
                .child_at_point(c, point, allow_disabled)
                .unwrap_or(c),
            Some(c) => c,
            None => self
                .tree
                .child_at_point(root, point, allow_disabled)
                .unwrap_or(root),
        };
        if let Some(modal) = self.modal
            && !self.tree.is_in_hierarchy_of(dest, modal)
        {
            dest = modal;
        }
        Some(dest)
    }

    /// The widget that should receive keyboard and text input.
    ///
    /// The active widget, unless it lies outside the capture holder or the modal widget, in
    /// which case that holder or modal widget is used.
    pub fn input_target_window(&self) -> Option<WidgetId> {
        self.root
            .filter(|&r| self.tree.is_effectively_visible(r))?;
        let inside = |scope| {
            self.active
                .filter(|&a| self.tree.is_in_hierarchy_of(a, scope))
                .unwrap_or(scope)
        };
        if let Some(capture) = self.capture {
            return Some(inside(capture));
        }
        if let Some(modal) = self.modal {
            return Some(inside(modal));
        }
        self.active
    }

    /// The widget under the cursor, recomputed if anything invalidated it.
    pub fn window_containing_cursor(&mut self) -> Option<WidgetId> {
        if !self.hover_up_to_date {
            let target = self.cursor_target_window(self.cursor.position(), true);
            self.update_hover(target);
        }
        self.hover
    }

    // --- render target and fonts ---

    /// Render into a different target. Queues [`SurfaceEvent::RenderTargetChanged`].
    pub fn set_render_target(&mut self, target: Rc<dyn RenderTarget>) {
        if Rc::ptr_eq(&self.target, &target) {
            return;
        }
        let old = core::mem::replace(&mut self.target, target);
        self.notify_area_changed();
        self.events.push(SurfaceEvent::RenderTargetChanged { old });
    }

    /// Re-read the render target's area after a resize.
    pub fn notify_area_changed(&mut self) {
        self.surface_size = self.target.area().size();
        self.cursor.notify_target_size_changed(self.surface_size);
        self.hover_up_to_date = false;
        if let Some(root) = self.root {
            self.notify_subtree(root, Callback::SurfaceAreaChanged, |_| Event::Empty);
            self.position_tooltip();
        }
    }

    /// Set the font used by widgets that name none. Queues
    /// [`SurfaceEvent::DefaultFontChanged`] when it changes.
    pub fn set_default_font(&mut self, font: Option<String>) {
        if self.default_font == font {
            return;
        }
        self.default_font = font;
        if let Some(root) = self.root {
            self.notify_subtree(root, Callback::DefaultFontChanged, |_| Event::Empty);
        }
        self.events.push(SurfaceEvent::DefaultFontChanged);
    }

    /// Tell widgets rendering with `font` that its render size changed.
    ///
    /// Returns true if any attached widget uses it.
    pub fn notify_font_render_size_changed(&mut self, font: &str) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let users: Vec<WidgetId> = self
            .tree
            .subtree_pre_order(root)
            .into_iter()
            .filter(|&w| {
                self.tree.props(w).is_some_and(|p| {
                    if p.font.is_empty() {
                        self.default_font.as_deref() == Some(font)
                    } else {
                        p.font == font
                    }
                })
            })
            .collect();
        for &w in &users {
            self.notify(w, Callback::FontRenderSizeChanged, &mut Event::Empty);
        }
        !users.is_empty()
    }

    // --- internals ---

    /// Deliver one notification to a widget's handler.
    ///
    /// A handler that is already running (checked out further up the stack) gets the
    /// notification queued and delivered when it returns.
    pub(crate) fn notify(&mut self, widget: WidgetId, callback: Callback, event: &mut Event) {
        if !self.tree.is_alive(widget) {
            return;
        }
        let Some(mut handler) = self.handlers.remove(&widget) else {
            if self.checked_out.contains(&widget) {
                self.pending.push((widget, callback, event.clone()));
            }
            return;
        };
        trace!(?widget, ?callback, "notify");
        self.checked_out.push(widget);
        deliver(
            handler.as_mut(),
            &mut EventCtx {
                surface: self,
                widget,
            },
            callback,
            event,
        );
        while let Some(pos) = self.pending.iter().position(|(w, ..)| *w == widget) {
            let (_, callback, mut queued) = self.pending.remove(pos);
            deliver(
                handler.as_mut(),
                &mut EventCtx {
                    surface: self,
                    widget,
                },
                callback,
                &mut queued,
            );
        }
        if let Some(pos) = self.checked_out.iter().position(|w| *w == widget) {
            self.checked_out.remove(pos);
        }
        if self.tree.is_alive(widget) {
            self.handlers.entry(widget).or_insert(handler);
        }
    }

    /// Notify every live widget of a subtree, parents first.
    pub(crate) fn notify_subtree(
        &mut self,
        top: WidgetId,
        callback: Callback,
        mut make: impl FnMut(WidgetId) -> Event,
    ) {
        for w in self.tree.subtree_pre_order(top) {
            if self.tree.is_alive(w) {
                self.notify(w, callback, &mut make(w));
            }
        }
    }

    fn attach_subtree(&mut self, top: WidgetId) {
        self.notify_subtree(top, Callback::Attached, |_| Event::Empty);
    }

    /// Detach a subtree from the surface, children first.
    ///
    /// Runs while the subtree is still linked, so focus held inside it passes to each former
    /// parent in turn and finally leaves the subtree.
    pub(crate) fn detach_subtree(&mut self, top: WidgetId) {
        for w in self.tree.subtree_post_order(top) {
            // Callbacks may already have moved or destroyed it.
            if !self.tree.is_in_hierarchy_of(w, top) {
                continue;
            }
            self.notify(w, Callback::Detached, &mut Event::Empty);
            self.on_widget_detached(w);
        }
    }

    /// Clear every surface reference to a departing widget.
    fn on_widget_detached(&mut self, widget: WidgetId) {
        trace!(?widget, "widget detached");
        if self.tooltip_source == Some(widget) {
            self.hide_tooltip();
            self.tooltip_source = None;
        }
        if self.tooltip == Some(widget) {
            self.tooltip = None;
            self.tooltip_timer = 0.0;
        }
        if self.active == Some(widget) {
            let parent = self.tree.parent_of(widget);
            let _ = self.set_active(parent, false);
            if self.active == Some(widget) {
                let _ = self.set_active(None, false);
            }
        }
        if self.hover == Some(widget) {
            self.hover = None;
            self.hover_up_to_date = false;
        }
        if self.root == Some(widget) {
            self.root = None;
        }
        if self.modal == Some(widget) {
            self.modal = None;
        }
        if self.old_capture == Some(widget) {
            self.old_capture = None;
        }
        self.release_input_capture(true, Some(widget));
    }

    /// Switch hover to `new`, firing leave/enter notifications.
    pub(crate) fn update_hover(&mut self, new: Option<WidgetId>) {
        self.hover_up_to_date = true;
        if new == self.hover {
            return;
        }
        let old = self.hover;
        self.hover = new;
        trace!(?old, ?new, "hover change");

        let over_tooltip = new
            .zip(self.tooltip)
            .is_some_and(|(n, tip)| self.tree.is_in_hierarchy_of(n, tip));
        if self.tooltip_source != new && !over_tooltip {
            self.tooltip_source = new;
            self.tooltip_timer = 0.0;
            if self.tooltip.is_some() {
                self.swap_tooltip();
            }
        }

        let common = self.tree.common_ancestor(old, new);
        if let Some(o) = old.filter(|&o| self.tree.is_alive(o)) {
            let mut event = Event::Cursor(self.cursor_event(o, Vec2::ZERO));
            self.notify(o, Callback::CursorLeaves, &mut event);
            self.notify_transition(common, o, Callback::CursorLeavesArea);
        }

        self.refresh_cursor_image();

        if let Some(n) = new.filter(|&n| self.tree.is_alive(n)) {
            let mut event = Event::Cursor(self.cursor_event(n, Vec2::ZERO));
            self.notify(n, Callback::CursorEnters, &mut event);
            self.notify_transition(common, n, Callback::CursorEntersArea);
        }
    }

    /// Notify `bottom` and its ancestors below `top`, outermost first.
    fn notify_transition(&mut self, top: Option<WidgetId>, bottom: WidgetId, callback: Callback) {
        let mut chain = Chain::new();
        let mut cur = Some(bottom);
        while let Some(c) = cur {
            if Some(c) == top {
                break;
            }
            chain.push(c);
            cur = self.tree.parent_of(c);
        }
        for &w in chain.iter().rev() {
            let mut event = Event::Cursor(self.cursor_event(w, Vec2::ZERO));
            self.notify(w, callback, &mut event);
        }
    }

    fn refresh_cursor_image(&mut self) {
        let image = self
            .hover
            .and_then(|h| self.tree.props(h))
            .and_then(|p| p.cursor.clone())
            .or_else(|| self.cursor.default_image().cloned());
        if self.cursor.set_image(image) && self.tooltip.is_some() {
            self.position_tooltip();
        }
    }

    pub(crate) fn local_point(&self, widget: WidgetId) -> Point {
        let position = self.cursor.position();
        self.tree.to_local(widget, position).unwrap_or(position)
    }

    pub(crate) fn cursor_event(&self, widget: WidgetId, delta: Vec2) -> CursorEvent {
        CursorEvent {
            widget,
            position: self.cursor.position(),
            local: self.local_point(widget),
            buttons: self.buttons,
            modifiers: self.modifiers,
            delta,
            handled: false,
        }
    }

    /// Ask the navigator for a new active widget after an unhandled key.
    pub(crate) fn navigate(&mut self, key: crate::event::ScanCode, pressed: bool) -> bool {
        let Some(navigator) = self.navigator.take() else {
            return false;
        };
        let target = navigator.navigate(self, self.active, key, pressed, self.modifiers);
        if self.navigator.is_none() {
            self.navigator = Some(navigator);
        }
        let Some(target) = target else {
            return false;
        };
        let rise = self.config.move_to_front_on_activate
            && self.tree.has_flag(target, WidgetFlags::RISE_ON_ACTIVATION);
        self.set_active(Some(target), rise)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if let Some(root) = self.root {
            self.detach_subtree(root);
        }
        let tooltips: Vec<WidgetId> = self.tooltips.values().copied().collect();
        for tip in tooltips {
            if self.tree.is_alive(tip) {
                self.destroy_widget(tip);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Viewport;
    use crate::testing::Harness;
    use crate::tooltip::TooltipState;
    use alloc::vec;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    fn activation_log(h: &Harness) -> Vec<String> {
        h.take_log()
            .into_iter()
            .filter(|e| e.ends_with(":Activated") || e.ends_with(":Deactivated"))
            .collect()
    }

    #[test]
    fn detach_clears_every_reference() {
        let mut h = Harness::new();
        let panel = h.add(h.root, "panel", rect(0.0, 0.0, 200.0, 200.0));
        let props = WidgetProps::new("button")
            .with_rect(rect(10.0, 10.0, 60.0, 40.0))
            .with_tooltip("Press me")
            .with_flag(WidgetFlags::RESTORES_OLD_CAPTURE, true);
        let recorder = h.recorder("button");
        let button = h.add_with(panel, props, recorder);

        assert!(h.surface.set_modal(Some(panel)), "panel becomes modal");
        let _ = h.surface.set_active(Some(button), false);
        assert!(h.surface.capture_input(panel), "panel captures");
        assert!(h.surface.capture_input(button), "button captures");
        assert_eq!(h.surface.previous_capture_window(), Some(panel));
        h.move_to(20.0, 20.0);
        assert!(h.surface.inject_time_pulse(0.5), "root is visible");
        assert_eq!(h.surface.window_containing_cursor(), Some(button));
        assert_eq!(h.surface.tooltip_state(), TooltipState::Visible);

        assert_eq!(h.surface.remove_child(panel), Some(h.root));

        let s = &h.surface;
        assert_eq!(s.active_window(), Some(h.root), "focus passes up to the root");
        assert_eq!(s.modal_window(), None, "modal cleared");
        assert_eq!(s.capture_window(), None, "capture cleared");
        assert_eq!(s.previous_capture_window(), None, "saved capture cleared");
        assert_eq!(s.tooltip_source(), None, "tooltip source cleared");
        assert_eq!(s.tooltip_window(), None, "tooltip hidden");
        assert!(!s.is_attached(button), "button left the root tree");
        assert!(s.tree().is_alive(button), "detaching does not destroy");
        let events = h.surface.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SurfaceEvent::TooltipInactive(_))),
            "hiding the tooltip is reported: {events:?}"
        );
        assert_eq!(h.surface.window_containing_cursor(), Some(h.root));
    }

    #[test]
    fn destroying_a_subtree_keeps_the_tooltip_instance() {
        let mut h = Harness::new();
        let props = WidgetProps::new("button")
            .with_rect(rect(10.0, 10.0, 60.0, 40.0))
            .with_tooltip("Hi");
        let recorder = h.recorder("button");
        let button = h.add_with(h.root, props, recorder);
        h.move_to(20.0, 20.0);
        let _ = h.surface.inject_time_pulse(0.5);
        let tip = h.surface.tooltip_window().expect("tooltip shown");

        let old_root = h.root;
        h.surface.destroy_widget(old_root);

        assert_eq!(h.surface.root(), None, "root cleared");
        assert!(!h.surface.tree().is_alive(button), "subtree destroyed");
        assert!(h.surface.tree().is_alive(tip), "tooltip instance survives");
        assert_eq!(h.surface.tooltip_object("Tooltip"), Some(tip));
        assert_eq!(h.surface.tree().parent_of(tip), None, "tooltip detached");
    }

    #[test]
    fn exclusive_and_distributed_capture() {
        let mut h = Harness::new();
        let holder = h.add(h.root, "holder", rect(0.0, 0.0, 200.0, 200.0));
        let child = h.add(holder, "child", rect(50.0, 50.0, 100.0, 100.0));
        let _ = h.surface.set_active(Some(holder), false);
        assert!(h.surface.capture_input(holder), "active widget may capture");

        let inside_child = Point::new(60.0, 60.0);
        let s = &mut h.surface;
        assert_eq!(s.cursor_target_window(inside_child, false), Some(holder));
        assert_eq!(s.cursor_target_window(Point::new(350.0, 250.0), false), Some(holder));

        s.set_flag(holder, WidgetFlags::DISTRIBUTES_CAPTURED_INPUT, true);
        assert_eq!(s.cursor_target_window(inside_child, false), Some(child));
        assert_eq!(s.cursor_target_window(Point::new(10.0, 10.0), false), Some(holder));
    }

    #[test]
    fn modal_overrides_every_target_outside_it() {
        let mut h = Harness::new();
        let a = h.add(h.root, "a", rect(0.0, 0.0, 100.0, 100.0));
        let b = h.add(h.root, "b", rect(200.0, 0.0, 300.0, 100.0));
        let inner = h.add(b, "inner", rect(10.0, 10.0, 50.0, 50.0));

        assert!(h.surface.set_modal(Some(b)), "b becomes modal");
        let s = &mut h.surface;
        assert_eq!(s.active_window(), Some(b));
        assert_eq!(s.cursor_target_window(Point::new(20.0, 20.0), false), Some(b));
        assert_eq!(s.cursor_target_window(Point::new(220.0, 20.0), false), Some(inner));
        assert_eq!(s.cursor_target_window(Point::new(390.0, 290.0), false), Some(b));

        // Capture held outside the modal subtree still resolves to the modal widget.
        assert!(s.capture_input(h.root), "the root is on the active branch");
        assert_eq!(s.cursor_target_window(Point::new(20.0, 20.0), false), Some(b));
        assert_eq!(s.input_target_window(), Some(b), "the active widget is inside the holder");

        assert!(s.set_modal(None), "clearing always succeeds");
        s.release_input_capture(true, None);
        assert_eq!(s.cursor_target_window(Point::new(20.0, 20.0), false), Some(a));
    }

    #[test]
    fn modal_requires_successful_activation() {
        let mut h = Harness::new();
        let props = WidgetProps::new("inert").with_flag(WidgetFlags::CAN_FOCUS, false);
        let recorder = h.recorder("inert");
        let inert = h.add_with(h.root, props, recorder);
        assert!(!h.surface.set_modal(Some(inert)), "cannot focus, cannot be modal");
        assert_eq!(h.surface.modal_window(), None);
    }

    #[test]
    fn activation_walks_leaf_to_common_ancestor_and_back() {
        let mut h = Harness::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let a = h.add(h.root, "a", r);
        let a1 = h.add(a, "a1", r);
        let a2 = h.add(a1, "a2", r);
        let b = h.add(h.root, "b", r);
        let b1 = h.add(b, "b1", r);
        let b2 = h.add(b1, "b2", r);

        let _ = h.surface.set_active(Some(a2), false);
        assert_eq!(
            activation_log(&h),
            vec!["root:Activated", "a:Activated", "a1:Activated", "a2:Activated"]
        );

        let _ = h.surface.set_active(Some(b2), false);
        assert_eq!(
            activation_log(&h),
            vec![
                "a2:Deactivated",
                "a1:Deactivated",
                "a:Deactivated",
                "b:Activated",
                "b1:Activated",
                "b2:Activated",
            ]
        );
        assert!(h.surface.is_window_active(b), "ancestors of the active widget are active");
        assert!(!h.surface.is_window_active(a), "old branch is inactive");
    }

    #[test]
    fn activation_reports_z_order_changes() {
        let mut h = Harness::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let a = h.add(h.root, "a", r);
        let _b = h.add(h.root, "b", r);

        assert!(h.surface.set_active(Some(a), true), "a is raised above b");
        assert!(!h.surface.set_active(Some(a), true), "already in front");
        let _ = h.take_log();
        assert!(!h.surface.set_active(Some(a), false), "same widget, no raise");
        assert!(h.take_log().is_empty(), "no notifications for a no-op");
    }

    #[test]
    fn activation_rejects_ineligible_widgets() {
        let mut h = Harness::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let a = h.add(h.root, "a", r);
        let hidden = h.add(h.root, "hidden", r);
        h.surface.set_visible(hidden, false);
        let loose = h.surface.insert_widget(None, WidgetProps::new("loose"), None);
        let _ = h.surface.set_active(Some(a), false);

        assert!(!h.surface.set_active(Some(hidden), false), "hidden");
        assert!(!h.surface.set_active(Some(loose), false), "not attached");
        h.surface.set_enabled(a, false);
        let _ = h.surface.set_active(Some(h.root), false);
        assert!(!h.surface.set_active(Some(a), false), "disabled");
        assert_eq!(h.surface.active_window(), Some(h.root));
    }

    #[test]
    fn capture_hand_off_and_restore() {
        let mut h = Harness::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let a = h.add(h.root, "a", r);
        let props = WidgetProps::new("b")
            .with_rect(r)
            .with_flag(WidgetFlags::RESTORES_OLD_CAPTURE, true);
        let recorder = h.recorder("b");
        let b = h.add_with(a, props, recorder);
        let other = h.add(h.root, "other", r);

        assert!(!h.surface.capture_input(a), "inactive widgets cannot capture");
        let _ = h.surface.set_active(Some(b), false);
        let _ = h.take_log();

        assert!(h.surface.capture_input(a), "a captures");
        assert!(h.surface.capture_input(a), "capturing again is a no-op success");
        assert!(h.surface.capture_input(b), "b captures");
        assert!(!h.surface.capture_input(other), "other is not active");
        h.surface.release_input_capture(true, Some(a));
        assert_eq!(h.surface.capture_window(), Some(b), "exact release of another widget");

        h.surface.release_input_capture(true, None);
        assert_eq!(h.surface.capture_window(), Some(a), "b restores a");
        assert_eq!(h.surface.previous_capture_window(), None);
        assert_eq!(
            h.take_log_of(Callback::CaptureGained),
            vec!["a:CaptureGained", "b:CaptureGained", "a:CaptureGained"]
        );
    }

    #[test]
    fn capture_notification_order() {
        let mut h = Harness::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let a = h.add(h.root, "a", r);
        let props = WidgetProps::new("b")
            .with_rect(r)
            .with_flag(WidgetFlags::RESTORES_OLD_CAPTURE, true);
        let recorder = h.recorder("b");
        let b = h.add_with(a, props, recorder);
        let _ = h.surface.set_active(Some(b), false);
        let _ = h.take_log();

        let _ = h.surface.capture_input(a);
        let _ = h.surface.capture_input(b);
        h.surface.release_input_capture(true, None);
        assert_eq!(
            h.take_log(),
            vec![
                "a:CaptureGained",
                "a:CaptureLost",
                "b:CaptureGained",
                "b:CaptureLost",
                "a:CaptureGained",
            ]
        );
    }

    #[test]
    fn release_without_capture_is_a_no_op() {
        let mut h = Harness::new();
        h.surface.release_input_capture(true, None);
        h.surface.release_input_capture(false, Some(h.root));
        assert_eq!(h.surface.capture_window(), None);
        assert!(h.take_log().is_empty(), "nothing notified");
    }

    #[test]
    fn deactivation_releases_capture_on_the_old_branch() {
        let mut h = Harness::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        let a = h.add(h.root, "a", r);
        let b = h.add(h.root, "b", r);
        let _ = h.surface.set_active(Some(a), false);
        assert!(h.surface.capture_input(a), "a captures");
        let _ = h.surface.set_active(Some(b), false);
        assert_eq!(h.surface.capture_window(), None);
    }

    #[test]
    fn root_change_detaches_and_attaches() {
        let mut h = Harness::new();
        let child = h.add(h.root, "child", rect(0.0, 0.0, 10.0, 10.0));
        let _ = h.surface.set_active(Some(child), false);
        let recorder = h.recorder("next");
        let next = h
            .surface
            .insert_widget(None, WidgetProps::new("next"), Some(Box::new(recorder)));
        let _ = h.take_log();

        let old = h.root;
        h.surface.set_root(Some(next));
        assert_eq!(
            h.take_log()
                .into_iter()
                .filter(|e| e.ends_with("tached"))
                .collect::<Vec<_>>(),
            vec!["child:Detached", "root:Detached", "next:Attached"]
        );
        assert_eq!(h.surface.active_window(), None, "focus left with the old tree");
        assert!(matches!(
            h.surface.drain_events().as_slice(),
            [SurfaceEvent::RootWindowChanged { old: Some(o) }] if *o == old
        ));
    }

    #[test]
    fn reparenting_moves_attachment() {
        let mut h = Harness::new();
        let recorder = h.recorder("loose");
        let loose = h
            .surface
            .insert_widget(None, WidgetProps::new("loose"), Some(Box::new(recorder)));
        assert!(h.surface.add_child(h.root, loose), "attached under the root");
        assert_eq!(h.take_log(), vec!["loose:Attached"]);
        assert!(!h.surface.add_child(loose, h.root), "no cycles");
        assert_eq!(h.surface.remove_child(loose), Some(h.root));
        assert_eq!(h.take_log(), vec!["loose:Detached"]);
    }

    #[test]
    fn font_render_size_reaches_users_of_the_font() {
        let mut h = Harness::new();
        let props = WidgetProps::new("label").with_font("Sans");
        let recorder = h.recorder("label");
        let _label = h.add_with(h.root, props, recorder);
        h.surface.set_default_font(Some(String::from("Serif")));
        let _ = h.take_log();

        assert!(h.surface.notify_font_render_size_changed("Sans"), "label uses Sans");
        assert_eq!(h.take_log(), vec!["label:FontRenderSizeChanged"]);
        assert!(h.surface.notify_font_render_size_changed("Serif"), "root uses the default");
        assert_eq!(h.take_log(), vec!["root:FontRenderSizeChanged"]);
        assert!(!h.surface.notify_font_render_size_changed("Mono"), "nobody uses Mono");
        assert!(matches!(
            h.surface.drain_events().as_slice(),
            [SurfaceEvent::DefaultFontChanged]
        ));
    }

    #[test]
    fn area_changes_reach_the_tree_and_the_cursor() {
        let mut h = Harness::new();
        h.viewport.set_area(rect(0.0, 0.0, 100.0, 80.0));
        h.surface.notify_area_changed();
        assert_eq!(h.surface.surface_size(), Size::new(100.0, 80.0));
        assert_eq!(h.surface.cursor().position(), Point::new(100.0, 80.0));
        assert_eq!(h.take_log(), vec!["root:SurfaceAreaChanged"]);

        let other: Rc<dyn RenderTarget> = Rc::new(Viewport::new(rect(0.0, 0.0, 640.0, 480.0)));
        h.surface.set_render_target(other.clone());
        h.surface.set_render_target(other);
        assert_eq!(h.surface.surface_size(), Size::new(640.0, 480.0));
        assert_eq!(
            h.surface
                .drain_events()
                .iter()
                .filter(|e| matches!(e, SurfaceEvent::RenderTargetChanged { .. }))
                .count(),
            1,
            "setting the same target twice reports once"
        );
    }
}
