use glide_foundation::{
    EventDisposition, PointerEvent, PointerEventKind, PointerId, PointerType,
};
use glide_ui_graphics::Point;

use crate::TestElement;

/// Timed pointer sequence for one pointer.
///
/// ```ignore
/// let script = PointerScript::touch()
///     .down(100.0, 100.0, 0.0)
///     .drag_to(40.0, 100.0, 6, 48.0)
///     .up_here(56.0);
/// script.play(&element);
/// ```
#[derive(Clone, Debug)]
pub struct PointerScript {
    pointer_id: PointerId,
    pointer_type: PointerType,
    events: Vec<PointerEvent>,
    position: Point,
    time_ms: f64,
}

impl PointerScript {
    pub fn new(pointer_type: PointerType) -> Self {
        Self {
            pointer_id: 0,
            pointer_type,
            events: Vec::new(),
            position: Point::ZERO,
            time_ms: 0.0,
        }
    }

    pub fn mouse() -> Self {
        Self::new(PointerType::Mouse)
    }

    pub fn touch() -> Self {
        Self::new(PointerType::Touch)
    }

    pub fn with_pointer_id(mut self, pointer_id: PointerId) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    fn push(mut self, kind: PointerEventKind, x: f64, y: f64, time_ms: f64) -> Self {
        self.position = Point::new(x, y);
        self.time_ms = time_ms;
        self.events.push(
            PointerEvent::new(kind, self.position, time_ms)
                .with_id(self.pointer_id)
                .with_pointer_type(self.pointer_type),
        );
        self
    }

    pub fn down(self, x: f64, y: f64, time_ms: f64) -> Self {
        self.push(PointerEventKind::Down, x, y, time_ms)
    }

    pub fn move_to(self, x: f64, y: f64, time_ms: f64) -> Self {
        self.push(PointerEventKind::Move, x, y, time_ms)
    }

    pub fn up(self, x: f64, y: f64, time_ms: f64) -> Self {
        self.push(PointerEventKind::Up, x, y, time_ms)
    }

    pub fn cancel(self, x: f64, y: f64, time_ms: f64) -> Self {
        self.push(PointerEventKind::Cancel, x, y, time_ms)
    }

    /// Lifts the pointer where it currently is.
    pub fn up_here(self, time_ms: f64) -> Self {
        let Point { x, y } = self.position;
        self.up(x, y, time_ms)
    }

    /// Moves in `steps` evenly spaced samples to `(x, y)` over `duration_ms`.
    pub fn drag_to(mut self, x: f64, y: f64, steps: usize, duration_ms: f64) -> Self {
        let steps = steps.max(1);
        let from = self.position;
        let start_ms = self.time_ms;
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            self = self.move_to(
                from.x + (x - from.x) * t,
                from.y + (y - from.y) * t,
                start_ms + duration_ms * t,
            );
        }
        self
    }

    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }

    pub fn end_time_ms(&self) -> f64 {
        self.time_ms
    }

    /// Dispatches every event in order and returns each disposition.
    pub fn play(&self, element: &TestElement) -> Vec<EventDisposition> {
        self.events
            .iter()
            .map(|event| element.dispatch(*event))
            .collect()
    }
}
