pub mod types;

pub use types::{
    InputEvent, PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerId,
    PointerType, WheelEvent,
};

pub mod prelude {
    pub use super::types::{
        InputEvent, PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerId,
        PointerType, WheelEvent,
    };
}
