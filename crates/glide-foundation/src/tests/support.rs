//! Minimal in-crate host element for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use glide_core::{DefaultScheduler, ElementId, EngineError, FrameRuntime};
use glide_ui_graphics::{Point, Size, Translation};

use crate::element::{
    EventDisposition, InputListener, InteractionTarget, ListenerId, ScrollContainer, ScrollMetrics,
};
use crate::input::{InputEvent, PointerEvent, PointerEventKind, WheelEvent};

pub(crate) fn runtime() -> FrameRuntime {
    FrameRuntime::new(Arc::new(DefaultScheduler))
}

pub(crate) struct FakeElement {
    id: ElementId,
    attached: Cell<bool>,
    next_listener: Cell<ListenerId>,
    listeners: RefCell<Vec<(ListenerId, InputListener)>>,
    metrics: Cell<ScrollMetrics>,
    translation: Cell<Option<Translation>>,
    writes: Cell<usize>,
}

impl FakeElement {
    pub(crate) fn new(id: ElementId) -> Rc<Self> {
        Rc::new(Self {
            id,
            attached: Cell::new(true),
            next_listener: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
            metrics: Cell::new(ScrollMetrics::default()),
            translation: Cell::new(None),
            writes: Cell::new(0),
        })
    }

    /// Container whose content overflows the viewport by `overflow`.
    pub(crate) fn scrollable(id: ElementId, overflow_x: f64, overflow_y: f64) -> Rc<Self> {
        let element = Self::new(id);
        element.metrics.set(ScrollMetrics::new(
            Size::new(100.0 + overflow_x, 100.0 + overflow_y),
            Size::new(100.0, 100.0),
        ));
        element
    }

    pub(crate) fn detach(&self) {
        self.attached.set(false);
    }

    pub(crate) fn set_metrics(&self, metrics: ScrollMetrics) {
        self.metrics.set(metrics);
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn stored_translation(&self) -> Option<Translation> {
        self.translation.get()
    }

    pub(crate) fn translation_writes(&self) -> usize {
        self.writes.get()
    }

    pub(crate) fn dispatch(&self, event: impl Into<InputEvent>) -> EventDisposition {
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

    pub(crate) fn down(&self, x: f64, y: f64, t: f64) -> EventDisposition {
        self.dispatch(PointerEvent::new(PointerEventKind::Down, Point::new(x, y), t))
    }

    pub(crate) fn move_to(&self, x: f64, y: f64, t: f64) -> EventDisposition {
        self.dispatch(PointerEvent::new(PointerEventKind::Move, Point::new(x, y), t))
    }

    pub(crate) fn up(&self, x: f64, y: f64, t: f64) -> EventDisposition {
        self.dispatch(PointerEvent::new(PointerEventKind::Up, Point::new(x, y), t))
    }

    pub(crate) fn cancel(&self, x: f64, y: f64, t: f64) -> EventDisposition {
        self.dispatch(PointerEvent::new(PointerEventKind::Cancel, Point::new(x, y), t))
    }

    pub(crate) fn wheel(&self, dx: f64, dy: f64) -> EventDisposition {
        self.dispatch(WheelEvent::new(dx, dy, 0.0))
    }

    pub(crate) fn resize(&self, width: f64, height: f64) -> EventDisposition {
        self.dispatch(InputEvent::Resize(Size::new(width, height)))
    }
}

impl InteractionTarget for FakeElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn add_listener(&self, listener: InputListener) -> Result<ListenerId, EngineError> {
        if !self.attached.get() {
            return Err(EngineError::TargetDetached(self.id));
        }
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

impl ScrollContainer for FakeElement {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, EngineError> {
        if !self.attached.get() {
            return Err(EngineError::TargetDetached(self.id));
        }
        Ok(self.metrics.get())
    }

    fn translation(&self) -> Result<Translation, EngineError> {
        if !self.attached.get() {
            return Err(EngineError::TargetDetached(self.id));
        }
        Ok(self.translation.get().unwrap_or(Translation::IDENTITY))
    }

    fn set_translation(&self, translation: Option<Translation>) -> Result<(), EngineError> {
        if !self.attached.get() {
            return Err(EngineError::TargetDetached(self.id));
        }
        self.writes.set(self.writes.get() + 1);
        self.translation.set(translation);
        Ok(())
    }
}
