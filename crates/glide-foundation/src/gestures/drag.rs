//! Pointer gesture tracker.
//!
//! Turns raw pointer/touch events on one element into a drag lifecycle:
//! a start predicate, per-sample move callbacks carrying deltas, distances
//! and velocity, and a single release callback.
//!
//! Sessions move through `Idle → AwaitingStart → Active → Idle`. The start
//! predicate may answer later through a [`StartResolver`]; while it is
//! pending only the most recent move sample is kept and it is replayed
//! once the session is allowed to start.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glide_core::{ElementId, EngineError, RuntimeHandle};
use glide_ui_graphics::Point;

use crate::element::{EventDisposition, InputListener, InteractionTarget, ListenerGuard};
use crate::gesture_constants::ASSUME_STOPPED_MS;
use crate::input::{InputEvent, PointerEvent, PointerEventKind, PointerId, PointerType};

/// Per-session move callback. Returning `false` releases the session.
pub type MoveHandler = Box<dyn FnMut(&DragContext) -> bool>;

type StartCallback = Box<dyn FnMut(&DragStart) -> StartVerdict>;
type MoveFactory = Box<dyn FnMut(ElementId) -> MoveHandler>;
type EndCallback = Box<dyn FnMut(&DragContext, ElementId)>;
type AttachFn = Box<dyn Fn(InputListener) -> Result<ListenerGuard, EngineError>>;

/// Answer of the start predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartVerdict {
    Allow,
    Deny,
    /// The answer will arrive through a [`StartResolver`] taken from
    /// [`DragStart::resolver`].
    Deferred,
}

impl From<bool> for StartVerdict {
    fn from(allow: bool) -> Self {
        if allow {
            StartVerdict::Allow
        } else {
            StartVerdict::Deny
        }
    }
}

/// Snapshot handed to the start predicate.
pub struct DragStart {
    pub element: ElementId,
    pub position: Point,
    pub pointer_type: PointerType,
    pub time_ms: f64,
    resolver: StartResolver,
}

impl DragStart {
    /// Handle for settling a [`StartVerdict::Deferred`] answer later.
    pub fn resolver(&self) -> StartResolver {
        self.resolver.clone()
    }
}

/// Settles a deferred start decision. Stale resolvers (the gesture ended
/// or a newer one began) are ignored.
#[derive(Clone)]
pub struct StartResolver {
    tracker: Weak<TrackerInner>,
    generation: u64,
}

impl StartResolver {
    pub fn resolve(&self, allow: bool) {
        if let Some(tracker) = self.tracker.upgrade() {
            TrackerInner::settle_start(&tracker, self.generation, allow);
        }
    }

    pub fn allow(&self) {
        self.resolve(true);
    }

    pub fn deny(&self) {
        self.resolve(false);
    }
}

/// Per-sample view of a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragContext {
    pub position: Point,
    /// Movement since the previous sample.
    pub delta_x: f64,
    pub delta_y: f64,
    /// Movement since the session started.
    pub distance_x: f64,
    pub distance_y: f64,
    /// Instantaneous velocity in px/ms; on release this is the release
    /// velocity.
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub elapsed_ms: f64,
    pub pointer_type: PointerType,
}

/// Live state of one drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub pointer_id: PointerId,
    pub pointer_type: PointerType,
    pub start_x: f64,
    pub start_y: f64,
    pub last_x: f64,
    pub last_y: f64,
    pub start_time_ms: f64,
    pub last_sample_time_ms: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub active: bool,
}

impl GestureSession {
    fn begin(event: &PointerEvent) -> Self {
        Self {
            pointer_id: event.id,
            pointer_type: event.pointer_type,
            start_x: event.position.x,
            start_y: event.position.y,
            last_x: event.position.x,
            last_y: event.position.y,
            start_time_ms: event.time_ms,
            last_sample_time_ms: event.time_ms,
            velocity_x: 0.0,
            velocity_y: 0.0,
            active: false,
        }
    }

    /// Folds a move sample into the session and describes it.
    fn sample(&mut self, position: Point, time_ms: f64) -> DragContext {
        let delta_x = position.x - self.last_x;
        let delta_y = position.y - self.last_y;
        let dt = time_ms - self.last_sample_time_ms;
        if dt > 0.0 {
            self.velocity_x = delta_x / dt;
            self.velocity_y = delta_y / dt;
        }
        self.last_x = position.x;
        self.last_y = position.y;
        self.last_sample_time_ms = time_ms;
        self.context(position, delta_x, delta_y, time_ms)
    }

    /// Describes the release at `position`; the last sampled velocity is
    /// kept unless the pointer rested before lifting.
    fn release(&self, position: Point, time_ms: f64) -> DragContext {
        let mut context = self.context(
            position,
            position.x - self.last_x,
            position.y - self.last_y,
            time_ms,
        );
        if time_ms - self.last_sample_time_ms > ASSUME_STOPPED_MS {
            context.velocity_x = 0.0;
            context.velocity_y = 0.0;
        }
        context
    }

    fn context(&self, position: Point, delta_x: f64, delta_y: f64, time_ms: f64) -> DragContext {
        DragContext {
            position,
            delta_x,
            delta_y,
            distance_x: position.x - self.start_x,
            distance_y: position.y - self.start_y,
            velocity_x: self.velocity_x,
            velocity_y: self.velocity_y,
            elapsed_ms: time_ms - self.start_time_ms,
            pointer_type: self.pointer_type,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingSample {
    position: Point,
    time_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    AwaitingStart,
    Active,
}

enum Session {
    Idle,
    AwaitingStart {
        session: GestureSession,
        pending: Option<PendingSample>,
    },
    Active(GestureSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureOptions {
    pub enabled: bool,
    /// Skip `on_end_drag` when the move callback released the session.
    pub skip_on_end_drag_when_stopped: bool,
}

impl GestureOptions {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_skip_on_end_drag_when_stopped(mut self, skip: bool) -> Self {
        self.skip_on_end_drag_when_stopped = skip;
        self
    }
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_on_end_drag_when_stopped: false,
        }
    }
}

/// Callbacks driving a [`PointerGestureTracker`].
pub struct DragCallbacks {
    on_start_drag: Option<StartCallback>,
    on_move_drag: MoveFactory,
    on_end_drag: Option<EndCallback>,
}

impl DragCallbacks {
    /// `on_move_drag` is called once per session to produce that session's
    /// move callback.
    pub fn new(on_move_drag: impl FnMut(ElementId) -> MoveHandler + 'static) -> Self {
        Self {
            on_start_drag: None,
            on_move_drag: Box::new(on_move_drag),
            on_end_drag: None,
        }
    }

    pub fn with_on_start(mut self, on_start: impl FnMut(&DragStart) -> StartVerdict + 'static) -> Self {
        self.on_start_drag = Some(Box::new(on_start));
        self
    }

    pub fn with_on_end(mut self, on_end: impl FnMut(&DragContext, ElementId) + 'static) -> Self {
        self.on_end_drag = Some(Box::new(on_end));
        self
    }
}

struct TrackerInner {
    element: ElementId,
    options: Cell<GestureOptions>,
    session: RefCell<Session>,
    generation: Cell<u64>,
    on_start_drag: RefCell<Option<StartCallback>>,
    on_move_drag: RefCell<Option<MoveFactory>>,
    on_end_drag: RefCell<Option<EndCallback>>,
    move_handler: RefCell<Option<MoveHandler>>,
    listener: RefCell<Option<ListenerGuard>>,
    attach: AttachFn,
    runtime: RuntimeHandle,
}

impl TrackerInner {
    fn attach_listener(this: &Rc<Self>) {
        if this.listener.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(this);
        let listener: InputListener = Rc::new(move |event: &InputEvent| match weak.upgrade() {
            Some(inner) => TrackerInner::handle_event(&inner, event),
            None => EventDisposition::Continue,
        });
        match (this.attach)(listener) {
            Ok(guard) => *this.listener.borrow_mut() = Some(guard),
            Err(error) => {
                let key = format!("gesture-detached:{}", this.element);
                this.runtime.with_registry(|registry| {
                    registry.warn_once(&key, || format!("gesture tracker not bound: {error}"))
                });
            }
        }
    }

    fn handle_event(this: &Rc<Self>, event: &InputEvent) -> EventDisposition {
        let InputEvent::Pointer(pointer) = event else {
            return EventDisposition::Continue;
        };
        match pointer.kind {
            PointerEventKind::Down => {
                Self::on_down(this, pointer);
                EventDisposition::Continue
            }
            PointerEventKind::Move => Self::on_move(this, pointer),
            PointerEventKind::Up | PointerEventKind::Cancel => {
                Self::on_release(this, pointer);
                EventDisposition::Continue
            }
        }
    }

    fn on_down(this: &Rc<Self>, event: &PointerEvent) {
        if !event.is_primary_press() || !matches!(*this.session.borrow(), Session::Idle) {
            return;
        }
        let generation = this.generation.get() + 1;
        this.generation.set(generation);
        let session = GestureSession::begin(event);
        *this.session.borrow_mut() = Session::AwaitingStart {
            session,
            pending: None,
        };

        let on_start = this.on_start_drag.borrow_mut().take();
        let verdict = match on_start {
            Some(mut on_start) => {
                let start = DragStart {
                    element: this.element,
                    position: event.position,
                    pointer_type: event.pointer_type,
                    time_ms: event.time_ms,
                    resolver: StartResolver {
                        tracker: Rc::downgrade(this),
                        generation,
                    },
                };
                let verdict = on_start(&start);
                restore(&this.on_start_drag, on_start);
                verdict
            }
            None => StartVerdict::Allow,
        };

        match verdict {
            StartVerdict::Allow => Self::settle_start(this, generation, true),
            StartVerdict::Deny => Self::settle_start(this, generation, false),
            StartVerdict::Deferred => log::trace!("drag start on {} deferred", this.element),
        }
    }

    fn settle_start(this: &Rc<Self>, generation: u64, allow: bool) {
        if generation != this.generation.get() {
            return;
        }
        let (mut session, pending) = {
            let mut slot = this.session.borrow_mut();
            let Session::AwaitingStart { session, pending } = *slot else {
                return;
            };
            *slot = Session::Idle;
            (session, pending)
        };
        if !allow {
            return;
        }

        session.active = true;
        *this.session.borrow_mut() = Session::Active(session);
        let factory = this.on_move_drag.borrow_mut().take();
        if let Some(mut factory) = factory {
            let handler = factory(this.element);
            restore(&this.on_move_drag, factory);
            if this.generation.get() != generation {
                return;
            }
            *this.move_handler.borrow_mut() = Some(handler);
        }

        if let Some(sample) = pending {
            Self::process_move(this, generation, sample.position, sample.time_ms);
        }
    }

    fn on_move(this: &Rc<Self>, event: &PointerEvent) -> EventDisposition {
        let generation = this.generation.get();
        {
            let mut slot = this.session.borrow_mut();
            match &mut *slot {
                Session::Idle => return EventDisposition::Continue,
                Session::AwaitingStart { session, pending } => {
                    if session.pointer_id == event.id {
                        *pending = Some(PendingSample {
                            position: event.position,
                            time_ms: event.time_ms,
                        });
                    }
                    return EventDisposition::Continue;
                }
                Session::Active(session) => {
                    if session.pointer_id != event.id {
                        return EventDisposition::Continue;
                    }
                }
            }
        }
        Self::process_move(this, generation, event.position, event.time_ms);
        EventDisposition::PreventDefault
    }

    fn process_move(this: &Rc<Self>, generation: u64, position: Point, time_ms: f64) {
        let context = {
            let mut slot = this.session.borrow_mut();
            let Session::Active(session) = &mut *slot else {
                return;
            };
            session.sample(position, time_ms)
        };

        let handler = this.move_handler.borrow_mut().take();
        let Some(mut handler) = handler else {
            return;
        };
        let keep_going = handler(&context);
        if this.generation.get() != generation {
            // Disabled or released from inside the callback.
            return;
        }
        *this.move_handler.borrow_mut() = Some(handler);

        if !keep_going {
            let skip_end = this.options.get().skip_on_end_drag_when_stopped;
            Self::finish(this, context, !skip_end);
        }
    }

    fn on_release(this: &Rc<Self>, event: &PointerEvent) {
        let context = {
            let slot = this.session.borrow();
            match &*slot {
                Session::Idle => return,
                Session::AwaitingStart { session, .. } => {
                    if session.pointer_id != event.id {
                        return;
                    }
                    None
                }
                Session::Active(session) => {
                    if session.pointer_id != event.id {
                        return;
                    }
                    Some(session.release(event.position, event.time_ms))
                }
            }
        };
        match context {
            Some(context) => Self::finish(this, context, true),
            None => {
                // Never started: abandon without an end callback.
                this.generation.set(this.generation.get() + 1);
                *this.session.borrow_mut() = Session::Idle;
            }
        }
    }

    fn finish(this: &Rc<Self>, context: DragContext, invoke_end: bool) {
        this.generation.set(this.generation.get() + 1);
        *this.session.borrow_mut() = Session::Idle;
        let handler = this.move_handler.borrow_mut().take();
        drop(handler);
        if !invoke_end {
            return;
        }
        let on_end = this.on_end_drag.borrow_mut().take();
        if let Some(mut on_end) = on_end {
            on_end(&context, this.element);
            restore(&this.on_end_drag, on_end);
        }
    }

    fn reset_session(&self) {
        self.generation.set(self.generation.get() + 1);
        *self.session.borrow_mut() = Session::Idle;
        let handler = self.move_handler.borrow_mut().take();
        drop(handler);
    }
}

fn restore<T>(slot: &RefCell<Option<T>>, value: T) {
    let mut slot = slot.borrow_mut();
    if slot.is_none() {
        *slot = Some(value);
    }
}

/// Drag lifecycle bound to one element.
///
/// Dropping the tracker removes its listener.
pub struct PointerGestureTracker {
    inner: Rc<TrackerInner>,
}

impl PointerGestureTracker {
    pub fn bind<T>(
        runtime: &RuntimeHandle,
        target: &Rc<T>,
        callbacks: DragCallbacks,
        options: GestureOptions,
    ) -> Self
    where
        T: InteractionTarget + ?Sized + 'static,
    {
        let attach_target = Rc::clone(target);
        let inner = Rc::new(TrackerInner {
            element: target.id(),
            options: Cell::new(options),
            session: RefCell::new(Session::Idle),
            generation: Cell::new(0),
            on_start_drag: RefCell::new(callbacks.on_start_drag),
            on_move_drag: RefCell::new(Some(callbacks.on_move_drag)),
            on_end_drag: RefCell::new(callbacks.on_end_drag),
            move_handler: RefCell::new(None),
            listener: RefCell::new(None),
            attach: Box::new(move |listener| ListenerGuard::attach(&attach_target, listener)),
            runtime: runtime.clone(),
        });
        if options.enabled {
            TrackerInner::attach_listener(&inner);
        }
        Self { inner }
    }

    /// Disabling drops any session without further callbacks and removes
    /// the listener; enabling attaches it again.
    pub fn set_enabled(&self, enabled: bool) {
        let mut options = self.inner.options.get();
        if options.enabled == enabled {
            return;
        }
        options.enabled = enabled;
        self.inner.options.set(options);
        if enabled {
            TrackerInner::attach_listener(&self.inner);
        } else {
            self.inner.reset_session();
            let guard = self.inner.listener.borrow_mut().take();
            drop(guard);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.options.get().enabled
    }

    /// Whether a listener is currently registered on the element.
    pub fn is_bound(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }

    pub fn element(&self) -> ElementId {
        self.inner.element
    }

    pub fn phase(&self) -> SessionPhase {
        match &*self.inner.session.borrow() {
            Session::Idle => SessionPhase::Idle,
            Session::AwaitingStart { .. } => SessionPhase::AwaitingStart,
            Session::Active(_) => SessionPhase::Active,
        }
    }

    pub fn session(&self) -> Option<GestureSession> {
        match &*self.inner.session.borrow() {
            Session::Idle => None,
            Session::AwaitingStart { session, .. } | Session::Active(session) => Some(*session),
        }
    }
}

#[cfg(test)]
#[path = "../tests/drag_tests.rs"]
mod tests;
