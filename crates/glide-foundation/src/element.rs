//! Host element boundary.
//!
//! Engine components never touch a concrete UI toolkit. They bind to
//! elements through these traits, register input listeners on them, and
//! release every listener through a [`ListenerGuard`].

use std::rc::Rc;

use glide_core::{ElementId, EngineError};
use glide_ui_graphics::{Size, Translation};

use crate::input::InputEvent;

pub type ListenerId = u64;

/// What the host should do with an event after a listener saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EventDisposition {
    #[default]
    Continue,
    /// Suppress the host's default handling (native scrolling, text
    /// selection, ...).
    PreventDefault,
}

impl EventDisposition {
    /// Combines the answers of several listeners; any request to prevent
    /// the default wins.
    pub fn merge(self, other: EventDisposition) -> EventDisposition {
        if self == EventDisposition::PreventDefault || other == EventDisposition::PreventDefault {
            EventDisposition::PreventDefault
        } else {
            EventDisposition::Continue
        }
    }
}

pub type InputListener = Rc<dyn Fn(&InputEvent) -> EventDisposition>;

/// An element that delivers input to listeners.
pub trait InteractionTarget {
    fn id(&self) -> ElementId;

    fn is_attached(&self) -> bool;

    /// Fails with [`EngineError::TargetDetached`] when the element is gone.
    fn add_listener(&self, listener: InputListener) -> Result<ListenerId, EngineError>;

    fn remove_listener(&self, id: ListenerId);
}

/// Live overflow measurements of a scrollable container.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Full content size.
    pub scroll_size: Size,
    /// Visible viewport size.
    pub client_size: Size,
}

impl ScrollMetrics {
    pub fn new(scroll_size: Size, client_size: Size) -> Self {
        Self {
            scroll_size,
            client_size,
        }
    }

    pub fn overflow(&self) -> Size {
        Size::new(
            self.scroll_size.width - self.client_size.width,
            self.scroll_size.height - self.client_size.height,
        )
    }
}

/// An element whose content can be translated.
pub trait ScrollContainer: InteractionTarget {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, EngineError>;

    /// Current content translation; identity when no transform is set.
    fn translation(&self) -> Result<Translation, EngineError>;

    /// Writes the content translation. `None` clears the transform.
    fn set_translation(&self, translation: Option<Translation>) -> Result<(), EngineError>;
}

/// Keeps one listener registered; removes it on drop.
pub struct ListenerGuard {
    element: ElementId,
    remove: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    pub fn attach<T>(target: &Rc<T>, listener: InputListener) -> Result<Self, EngineError>
    where
        T: InteractionTarget + ?Sized + 'static,
    {
        let id = target.add_listener(listener)?;
        let target = Rc::clone(target);
        Ok(Self {
            element: target.id(),
            remove: Some(Box::new(move || target.remove_listener(id))),
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Removes the listener now instead of at drop.
    pub fn release(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("element", &self.element)
            .field("attached", &self.remove.is_some())
            .finish()
    }
}
