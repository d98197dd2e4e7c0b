// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Creating widgets by type name.

use alloc::boxed::Box;
use alloc::string::String;
use core::cell::{Cell, RefCell};

use hashbrown::HashMap;
use understory_widget_tree::WidgetProps;

use crate::widget::Widget;

/// A freshly created widget: its initial properties and its behavior.
pub struct NewWidget {
    /// Initial properties.
    pub props: WidgetProps,
    /// Behavior.
    pub handler: Box<dyn Widget>,
}

impl core::fmt::Debug for NewWidget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewWidget")
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

/// Source of widgets for a surface, shared between surfaces.
///
/// Surfaces only ask the factory for tooltip instances and for
/// [`Surface::create_widget`](crate::Surface::create_widget). A locked factory refuses to
/// create widgets; surfaces treat that as an ordinary failure.
pub trait WidgetFactory {
    /// Create a widget of the given type, or `None` if the type is unknown.
    fn create(&self, type_name: &str) -> Option<NewWidget>;

    /// Returns true while creation is refused.
    fn is_locked(&self) -> bool {
        false
    }
}

type Constructor = Box<dyn Fn() -> NewWidget>;

/// A [`WidgetFactory`] backed by a map of constructors.
///
/// Registration and locking work through `&self`, so a registry can be shared as
/// `Rc<Registry>` between the host and several surfaces.
///
/// ```
/// use understory_surface::{NewWidget, Registry, WidgetFactory};
/// use understory_widget_tree::WidgetProps;
///
/// struct Label;
/// impl understory_surface::Widget for Label {}
///
/// let registry = Registry::new();
/// registry.register("Label", || NewWidget {
///     props: WidgetProps::new("Label"),
///     handler: Box::new(Label),
/// });
///
/// assert!(registry.create("Label").is_some());
/// assert!(registry.create("Slider").is_none());
///
/// let guard = registry.lock();
/// assert!(registry.create("Label").is_none());
/// drop(guard);
/// assert!(!registry.is_locked());
/// ```
#[derive(Default)]
pub struct Registry {
    constructors: RefCell<HashMap<String, Constructor>>,
    locks: Cell<u32>,
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let types = self.constructors.borrow().len();
        f.debug_struct("Registry")
            .field("types", &types)
            .field("locks", &self.locks.get())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `type_name`.
    pub fn register(&self, type_name: impl Into<String>, ctor: impl Fn() -> NewWidget + 'static) {
        self.constructors
            .borrow_mut()
            .insert(type_name.into(), Box::new(ctor));
    }

    /// Returns true if `type_name` has a constructor.
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.constructors.borrow().contains_key(type_name)
    }

    /// Refuse creation until the returned guard is dropped. Guards nest.
    #[must_use = "the registry unlocks when the guard is dropped"]
    pub fn lock(&self) -> RegistryLock<'_> {
        self.locks.set(self.locks.get() + 1);
        RegistryLock { registry: self }
    }
}

impl WidgetFactory for Registry {
    fn create(&self, type_name: &str) -> Option<NewWidget> {
        if self.is_locked() {
            return None;
        }
        let constructors = self.constructors.borrow();
        let ctor = constructors.get(type_name)?;
        Some(ctor())
    }

    fn is_locked(&self) -> bool {
        self.locks.get() > 0
    }
}

/// Keeps a [`Registry`] locked while alive.
#[derive(Debug)]
pub struct RegistryLock<'a> {
    registry: &'a Registry,
}

impl Drop for RegistryLock<'_> {
    fn drop(&mut self) {
        let locks = &self.registry.locks;
        locks.set(locks.get().saturating_sub(1));
    }
}
