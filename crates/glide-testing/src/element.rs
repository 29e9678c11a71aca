use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glide_core::{ElementId, EngineError, RuntimeHandle};
use glide_foundation::{
    EventDisposition, InputEvent, InputListener, InteractionTarget, ListenerId, ScrollContainer,
    ScrollMetrics, WheelEvent,
};
use glide_ui_graphics::{Size, Translation};
use smallvec::SmallVec;

/// In-memory host element.
///
/// Records listeners, dispatches events synchronously and stores the
/// translation written to it. Ids come from the runtime's registry so they
/// are unique per engine instance.
pub struct TestElement {
    id: ElementId,
    runtime: RuntimeHandle,
    attached: Cell<bool>,
    listeners: RefCell<SmallVec<[(ListenerId, InputListener); 4]>>,
    metrics: Cell<ScrollMetrics>,
    translation: Cell<Option<Translation>>,
    translation_writes: Cell<usize>,
}

impl TestElement {
    pub fn new(runtime: &RuntimeHandle) -> Rc<Self> {
        Rc::new(Self {
            id: runtime.with_registry(|registry| registry.next_id()).unwrap_or(0),
            runtime: runtime.clone(),
            attached: Cell::new(true),
            listeners: RefCell::new(SmallVec::new()),
            metrics: Cell::new(ScrollMetrics::default()),
            translation: Cell::new(None),
            translation_writes: Cell::new(0),
        })
    }

    /// Scroll container with a `client` viewport over `content`.
    pub fn scroll_container(runtime: &RuntimeHandle, content: Size, client: Size) -> Rc<Self> {
        let element = Self::new(runtime);
        element.metrics.set(ScrollMetrics::new(content, client));
        element
    }

    pub fn as_container(self: &Rc<Self>) -> Rc<dyn ScrollContainer> {
        self.clone()
    }

    pub fn as_target(self: &Rc<Self>) -> Rc<dyn InteractionTarget> {
        self.clone()
    }

    pub fn set_metrics(&self, metrics: ScrollMetrics) {
        self.metrics.set(metrics);
    }

    /// Simulates removal from the host tree. Listeners stay registered but
    /// every host operation now fails.
    pub fn detach(&self) {
        self.attached.set(false);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Translation as last written, `None` when the transform is cleared.
    pub fn stored_translation(&self) -> Option<Translation> {
        self.translation.get()
    }

    pub fn translation_writes(&self) -> usize {
        self.translation_writes.get()
    }

    /// Delivers `event` to every listener and merges their answers.
    /// Listeners may add or remove listeners while being called.
    pub fn dispatch(&self, event: impl Into<InputEvent>) -> EventDisposition {
        let event = event.into();
        let snapshot: SmallVec<[InputListener; 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        snapshot
            .iter()
            .fold(EventDisposition::Continue, |disposition, listener| {
                disposition.merge(listener(&event))
            })
    }

    pub fn wheel(&self, delta_x: f64, delta_y: f64) -> EventDisposition {
        self.dispatch(WheelEvent::new(delta_x, delta_y, 0.0))
    }

    pub fn resize(&self, width: f64, height: f64) -> EventDisposition {
        self.dispatch(InputEvent::Resize(Size::new(width, height)))
    }

    fn ensure_attached(&self) -> Result<(), EngineError> {
        if self.attached.get() {
            Ok(())
        } else {
            Err(EngineError::TargetDetached(self.id))
        }
    }
}

impl InteractionTarget for TestElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn add_listener(&self, listener: InputListener) -> Result<ListenerId, EngineError> {
        self.ensure_attached()?;
        let id = self
            .runtime
            .with_registry(|registry| registry.next_id())
            .ok_or(EngineError::TargetDetached(self.id))?;
        self.listeners.borrow_mut().push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

impl ScrollContainer for TestElement {
    fn scroll_metrics(&self) -> Result<ScrollMetrics, EngineError> {
        self.ensure_attached()?;
        Ok(self.metrics.get())
    }

    fn translation(&self) -> Result<Translation, EngineError> {
        self.ensure_attached()?;
        Ok(self.translation.get().unwrap_or(Translation::IDENTITY))
    }

    fn set_translation(&self, translation: Option<Translation>) -> Result<(), EngineError> {
        self.ensure_attached()?;
        self.translation_writes.set(self.translation_writes.get() + 1);
        self.translation.set(translation);
        Ok(())
    }
}

impl std::fmt::Debug for TestElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestElement")
            .field("id", &self.id)
            .field("attached", &self.attached.get())
            .field("listeners", &self.listener_count())
            .field("translation", &self.translation.get())
            .finish()
    }
}
