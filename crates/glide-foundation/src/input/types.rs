use glide_ui_graphics::{Point, Size};

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
    Back = 3,
    Forward = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer, touch or pen sample delivered by the host.
///
/// Touch start/end/cancel map to `Down`/`Up`/`Cancel` with
/// [`PointerType::Touch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub pointer_type: PointerType,
    pub position: Point,
    pub buttons: PointerButtons,
    /// Host timestamp in milliseconds.
    pub time_ms: f64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, time_ms: f64) -> Self {
        let buttons = match kind {
            PointerEventKind::Down | PointerEventKind::Move => {
                PointerButtons::NONE.with(PointerButton::Primary)
            }
            PointerEventKind::Up | PointerEventKind::Cancel => PointerButtons::NONE,
        };
        Self {
            id: 0,
            kind,
            pointer_type: PointerType::Mouse,
            position,
            buttons,
            time_ms,
        }
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set the buttons state for this event
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Whether a `Down` of this event may open a drag session: any touch
    /// or pen contact, or a mouse press with the primary button.
    pub fn is_primary_press(&self) -> bool {
        match self.pointer_type {
            PointerType::Touch | PointerType::Pen => true,
            PointerType::Mouse => self.buttons.contains(PointerButton::Primary),
        }
    }
}

/// Wheel / trackpad scroll sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub delta: Point,
    pub time_ms: f64,
}

impl WheelEvent {
    pub fn new(delta_x: f64, delta_y: f64, time_ms: f64) -> Self {
        Self {
            delta: Point::new(delta_x, delta_y),
            time_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    /// The window hosting the element changed size.
    Resize(Size),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        InputEvent::Pointer(event)
    }
}

impl From<WheelEvent> for InputEvent {
    fn from(event: WheelEvent) -> Self {
        InputEvent::Wheel(event)
    }
}
