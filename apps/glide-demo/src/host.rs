//! Headless host: a vsync flag and one scroll container that logs what it
//! would render.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use glide_core::{ElementId, EngineError, RuntimeScheduler};
use glide_foundation::{
    EventDisposition, InputEvent, InputListener, InteractionTarget, ListenerId, ScrollContainer,
    ScrollMetrics,
};
use glide_ui_graphics::Translation;

/// Raised by the runtime whenever a frame callback is queued.
#[derive(Default)]
pub struct VsyncFlag {
    requested: AtomicBool,
}

impl VsyncFlag {
    /// Consumes a pending request.
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }
}

impl RuntimeScheduler for VsyncFlag {
    fn schedule_frame(&self) {
        self.requested.store(true, Ordering::Release);
    }
}

pub struct Panel {
    id: ElementId,
    metrics: ScrollMetrics,
    next_listener: Cell<ListenerId>,
    listeners: RefCell<Vec<(ListenerId, InputListener)>>,
    transform: Cell<Option<Translation>>,
}

impl Panel {
    pub fn new(id: ElementId, metrics: ScrollMetrics) -> Rc<Self> {
        Rc::new(Self {
            id,
            metrics,
            next_listener: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
            transform: Cell::new(None),
        })
    }

    pub fn dispatch(&self, event: impl Into<InputEvent>) -> EventDisposition {
        let event = event.into();
        let listeners: Vec<InputListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        listeners
            .iter()
            .fold(EventDisposition::Continue, |acc, listener| {
                acc.merge(listener(&event))
            })
    }
}

impl InteractionTarget for Panel {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_attached(&self) -> bool {
        true
    }

    fn add_listener(&self, listener: InputListener) -> Result<ListenerId, EngineError> {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

impl ScrollContainer for Panel {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, EngineError> {
        Ok(self.metrics)
    }

    fn translation(&self) -> Result<Translation, EngineError> {
        Ok(self.transform.get().unwrap_or(Translation::IDENTITY))
    }

    fn set_translation(&self, translation: Option<Translation>) -> Result<(), EngineError> {
        match translation {
            Some(translation) => log::debug!("panel {}: transform {translation}", self.id),
            None => log::debug!("panel {}: transform cleared", self.id),
        }
        self.transform.set(translation);
        Ok(())
    }
}
