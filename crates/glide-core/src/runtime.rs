//! The animation-frame primitive shared by every frame loop in an engine.
//!
//! A [`FrameRuntime`] keeps a FIFO of one-shot frame callbacks. Hosts call
//! [`FrameRuntime::drain_frame_callbacks`] once per vsync; callbacks that
//! register while a drain is in progress run on the following drain, so a
//! loop can never observe two frames inside one host tick.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::registry::EngineRegistry;

pub type FrameCallbackId = u64;
pub type VisibilityListenerId = u64;

/// Host visibility as reported by the platform integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

type VisibilityListener = Rc<dyn Fn(Visibility)>;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    visibility: Cell<Visibility>,
    visibility_listeners: RefCell<SmallVec<[(VisibilityListenerId, VisibilityListener); 4]>>,
    next_listener_id: Cell<u64>,
    registry: EngineRegistry,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            visibility: Cell::new(Visibility::Visible),
            visibility_listeners: RefCell::new(SmallVec::new()),
            next_listener_id: Cell::new(1),
            registry: EngineRegistry::new(),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        self.needs_frame.set(false);
        for callback in pending {
            callback(frame_time_nanos);
        }
        if self.has_frame_callbacks() {
            self.needs_frame.set(true);
        }
    }

    fn add_visibility_listener(&self, listener: VisibilityListener) -> VisibilityListenerId {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.visibility_listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_visibility_listener(&self, id: VisibilityListenerId) {
        self.visibility_listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn set_visibility(&self, visibility: Visibility) {
        if self.visibility.replace(visibility) == visibility {
            return;
        }
        log::debug!("frame runtime visibility -> {visibility:?}");
        // Listeners may add or remove listeners while being notified.
        let listeners: SmallVec<[VisibilityListener; 4]> = self
            .visibility_listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(visibility);
        }
    }
}

/// Owner of the frame-callback queue for one engine instance.
#[derive(Clone)]
pub struct FrameRuntime {
    inner: Rc<RuntimeInner>,
}

impl FrameRuntime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Runs every frame callback registered before this call.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    /// Whether a frame has been requested since the last drain.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    pub fn pending_frame_callbacks(&self) -> usize {
        self.inner.frame_callbacks.borrow().len()
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.inner.set_visibility(visibility);
    }

    pub fn visibility(&self) -> Visibility {
        self.inner.visibility.get()
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.inner.registry
    }
}

/// Weak handle to a [`FrameRuntime`].
///
/// Every operation degrades to a no-op once the runtime has been dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn add_visibility_listener(
        &self,
        listener: impl Fn(Visibility) + 'static,
    ) -> Option<VisibilityListenerId> {
        self.inner
            .upgrade()
            .map(|inner| inner.add_visibility_listener(Rc::new(listener)))
    }

    pub fn remove_visibility_listener(&self, id: VisibilityListenerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.remove_visibility_listener(id);
        }
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.inner.upgrade().map(|inner| inner.visibility.get())
    }

    pub fn with_registry<R>(&self, f: impl FnOnce(&EngineRegistry) -> R) -> Option<R> {
        self.inner.upgrade().map(|inner| f(&inner.registry))
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
