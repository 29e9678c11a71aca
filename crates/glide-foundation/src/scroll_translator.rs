//! Bounded 2-D scroll translation of a container's content.
//!
//! The translator owns its [`ScrollTranslation`]; the container's transform
//! is read once when binding and afterwards only written. Bounds are
//! recomputed from live overflow measurements on every step.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use glide_core::RuntimeHandle;
use glide_ui_graphics::Translation;
use smallvec::SmallVec;

use crate::element::{
    EventDisposition, InputListener, InteractionTarget, ListenerGuard, ScrollContainer,
};
use crate::gestures::drag::{
    DragCallbacks, DragContext, GestureOptions, MoveHandler, PointerGestureTracker,
};
use crate::input::InputEvent;

/// Content translation applied to a scroll container.
pub type ScrollTranslation = Translation;

/// Axes the translator may move along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScrollAxis {
    X,
    Y,
    #[default]
    Both,
}

impl ScrollAxis {
    fn allows_x(self) -> bool {
        matches!(self, ScrollAxis::X | ScrollAxis::Both)
    }

    fn allows_y(self) -> bool {
        matches!(self, ScrollAxis::Y | ScrollAxis::Both)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTranslatorOptions {
    pub axis: ScrollAxis,
    /// Overscroll allowance as a percentage of the viewport size.
    pub overscroll_pct: f64,
    /// Snap back to the origin when the window is resized.
    pub reset_on_resize: bool,
    /// Translate on pointer drags in addition to wheel input.
    pub enable_pointer_scroll: bool,
}

impl ScrollTranslatorOptions {
    pub fn with_axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_overscroll_pct(mut self, overscroll_pct: f64) -> Self {
        self.overscroll_pct = overscroll_pct;
        self
    }

    pub fn with_reset_on_resize(mut self, reset_on_resize: bool) -> Self {
        self.reset_on_resize = reset_on_resize;
        self
    }

    pub fn with_pointer_scroll(mut self, enabled: bool) -> Self {
        self.enable_pointer_scroll = enabled;
        self
    }
}

impl Default for ScrollTranslatorOptions {
    fn default() -> Self {
        Self {
            axis: ScrollAxis::Both,
            overscroll_pct: 0.0,
            reset_on_resize: true,
            enable_pointer_scroll: true,
        }
    }
}

/// Moves `current` by `delta`, confined to `[-(overflow + threshold), threshold]`.
/// Axes without overflow never move.
fn clamp_axis(current: f64, delta: f64, overflow: f64, client: f64, overscroll_pct: f64) -> f64 {
    if overflow <= 0.0 {
        return current;
    }
    let threshold = client * overscroll_pct / 100.0;
    (current + delta).max(-(overflow + threshold)).min(threshold)
}

struct TranslatorInner {
    container: Rc<dyn ScrollContainer>,
    options: ScrollTranslatorOptions,
    translation: Cell<ScrollTranslation>,
}

impl TranslatorInner {
    fn apply_scroll_delta(&self, delta_x: f64, delta_y: f64) -> bool {
        if !self.container.is_attached() {
            return false;
        }
        let metrics = match self.container.scroll_metrics() {
            Ok(metrics) => metrics,
            Err(error) => {
                log::debug!("scroll delta ignored: {error}");
                return false;
            }
        };
        let overflow = metrics.overflow();
        let current = self.translation.get();
        let mut next = current;
        if self.options.axis.allows_x() {
            next.x = clamp_axis(
                current.x,
                delta_x,
                overflow.width,
                metrics.client_size.width,
                self.options.overscroll_pct,
            );
        }
        if self.options.axis.allows_y() {
            next.y = clamp_axis(
                current.y,
                delta_y,
                overflow.height,
                metrics.client_size.height,
                self.options.overscroll_pct,
            );
        }
        if next == current {
            return false;
        }
        if let Err(error) = self.container.set_translation(Some(next)) {
            log::debug!("scroll translation not written: {error}");
            return false;
        }
        self.translation.set(next);
        true
    }

    fn reset(&self) {
        self.translation.set(Translation::IDENTITY);
        if !self.container.is_attached() {
            return;
        }
        if let Err(error) = self.container.set_translation(None) {
            log::debug!("scroll translation not cleared: {error}");
        }
    }

    fn wheel_delta(&self, delta_x: f64, delta_y: f64) -> (f64, f64) {
        match self.options.axis {
            ScrollAxis::X => (delta_x, 0.0),
            ScrollAxis::Y => (0.0, delta_y),
            ScrollAxis::Both => (delta_x, delta_y),
        }
    }

    fn handle_event(&self, event: &InputEvent) -> EventDisposition {
        match event {
            InputEvent::Wheel(wheel) => {
                let (dx, dy) = self.wheel_delta(wheel.delta.x, wheel.delta.y);
                if self.apply_scroll_delta(dx, dy) {
                    EventDisposition::PreventDefault
                } else {
                    EventDisposition::Continue
                }
            }
            InputEvent::Resize(_) => {
                if self.options.reset_on_resize {
                    self.reset();
                }
                EventDisposition::Continue
            }
            InputEvent::Pointer(_) => EventDisposition::Continue,
        }
    }
}

fn event_listener(inner: &Rc<TranslatorInner>) -> InputListener {
    let weak: Weak<TranslatorInner> = Rc::downgrade(inner);
    Rc::new(move |event: &InputEvent| match weak.upgrade() {
        Some(inner) => inner.handle_event(event),
        None => EventDisposition::Continue,
    })
}

/// Binding that translates a container's content in response to drags,
/// wheel input and window resizes.
///
/// Exactly one translator should own a given container. Dropping it
/// removes every listener it registered.
pub struct ScrollTranslator {
    inner: Rc<TranslatorInner>,
    drag: Option<PointerGestureTracker>,
    guards: SmallVec<[ListenerGuard; 2]>,
}

impl ScrollTranslator {
    /// Binds to `container`. Resize events reaching the container, or
    /// `window` when given, reset the translation.
    pub fn bind(
        runtime: &RuntimeHandle,
        container: Rc<dyn ScrollContainer>,
        window: Option<Rc<dyn InteractionTarget>>,
        options: ScrollTranslatorOptions,
    ) -> Self {
        let initial = if container.is_attached() {
            container.translation().unwrap_or(Translation::IDENTITY)
        } else {
            Translation::IDENTITY
        };
        let inner = Rc::new(TranslatorInner {
            container: Rc::clone(&container),
            options,
            translation: Cell::new(initial),
        });

        let mut translator = Self {
            inner,
            drag: None,
            guards: SmallVec::new(),
        };
        if !container.is_attached() {
            let key = format!("scroll-detached:{}", container.id());
            runtime.with_registry(|registry| {
                registry.warn_once(&key, || {
                    format!("scroll translator bound to detached element {}", container.id())
                })
            });
            return translator;
        }

        match ListenerGuard::attach(&container, event_listener(&translator.inner)) {
            Ok(guard) => translator.guards.push(guard),
            Err(error) => log::warn!("scroll translator wheel listener not attached: {error}"),
        }
        if let Some(window) = window {
            match ListenerGuard::attach(&window, event_listener(&translator.inner)) {
                Ok(guard) => translator.guards.push(guard),
                Err(error) => log::warn!("scroll translator resize listener not attached: {error}"),
            }
        }

        if options.enable_pointer_scroll {
            let weak = Rc::downgrade(&translator.inner);
            let callbacks = DragCallbacks::new(move |_element| -> MoveHandler {
                let weak = weak.clone();
                Box::new(move |context: &DragContext| {
                    if let Some(inner) = weak.upgrade() {
                        inner.apply_scroll_delta(context.delta_x, context.delta_y);
                    }
                    // Hitting a bound is not a reason to end the drag.
                    true
                })
            });
            translator.drag = Some(PointerGestureTracker::bind(
                runtime,
                &container,
                callbacks,
                GestureOptions::default(),
            ));
        }
        translator
    }

    /// Applies a delta to the owned translation, clamped per axis.
    /// Returns `true` when the content moved.
    pub fn apply_scroll_delta(&self, delta_x: f64, delta_y: f64) -> bool {
        self.inner.apply_scroll_delta(delta_x, delta_y)
    }

    pub fn translation(&self) -> ScrollTranslation {
        self.inner.translation.get()
    }

    /// Clears the container's transform and returns to the origin.
    pub fn reset(&self) {
        self.inner.reset();
    }

    pub fn options(&self) -> ScrollTranslatorOptions {
        self.inner.options
    }

    /// Whether input listeners are registered on the container.
    pub fn is_bound(&self) -> bool {
        !self.guards.is_empty()
    }

    pub fn drag_tracker(&self) -> Option<&PointerGestureTracker> {
        self.drag.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/scroll_translator_tests.rs"]
mod tests;
