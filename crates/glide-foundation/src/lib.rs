//! Input plumbing for Glide: the host element boundary, the pointer
//! gesture tracker and the bounded scroll translator built on it.

pub mod element;
pub mod gesture_constants;
pub mod gestures;
pub mod input;
pub mod scroll_translator;

pub use element::{
    EventDisposition, InputListener, InteractionTarget, ListenerGuard, ListenerId, ScrollContainer,
    ScrollMetrics,
};
pub use gestures::drag::{
    DragCallbacks, DragContext, DragStart, GestureOptions, GestureSession, MoveHandler,
    PointerGestureTracker, SessionPhase, StartResolver, StartVerdict,
};
pub use input::{
    InputEvent, PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerId,
    PointerType, WheelEvent,
};
pub use scroll_translator::{ScrollAxis, ScrollTranslation, ScrollTranslator, ScrollTranslatorOptions};

pub mod prelude {
    pub use crate::element::{EventDisposition, InteractionTarget, ScrollContainer, ScrollMetrics};
    pub use crate::gestures::drag::{
        DragCallbacks, DragContext, DragStart, GestureOptions, PointerGestureTracker, StartVerdict,
    };
    pub use crate::input::prelude::*;
    pub use crate::scroll_translator::{ScrollAxis, ScrollTranslator, ScrollTranslatorOptions};
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
