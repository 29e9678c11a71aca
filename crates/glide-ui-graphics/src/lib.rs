//! Pure math/data shared by the Glide crates.

pub mod geometry;

pub use geometry::*;
