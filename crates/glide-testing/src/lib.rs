//! Headless host for exercising Glide components in tests.
//!
//! [`FrameDriver`] stands in for the vsync source, [`TestElement`] for a
//! scrollable host element, and [`PointerScript`] for a user's hand.

mod driver;
mod element;
mod pointer_script;

pub use driver::FrameDriver;
pub use element::TestElement;
pub use pointer_script::PointerScript;

pub mod prelude {
    pub use crate::{FrameDriver, PointerScript, TestElement};
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
