//! # littlebird
//!
//! Infinite periodic tilings drawn onto a finite canvas.
//!
//! A tiling is a small motif (a [`Unit`]) repeated over a 2D lattice. Only
//! the copies that can touch the canvas are drawn: [`generate_covering`]
//! finds them with a row-by-row search whose cost follows the number of
//! visible copies, not the area of the plane. [`create_little_bird_pattern`]
//! layers eight such tilings into the Little Bird pattern.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Unlike Node.js, you must explicitly declare every module.

pub mod log;

pub mod canvas;
pub mod covering;
pub mod drawing;
pub mod geometry;
pub mod path;
pub mod pattern;
pub mod recording;

// Re-export common types at crate root for convenience.
pub use canvas::{Canvas, Colour, ColourError};
pub use covering::{CoveringError, CoveringStats, HorizontalRange, generate_covering, generate_covering_with_stats};
pub use drawing::{
    Background, Drawable, Join, ModifyTransformation, Tiling, Unit, WithFill, create_tiling,
    draw_background, join_drawables, with_fill, with_modify_transformation,
};
pub use geometry::{Basis, Rectangle, Transformation, Vector};
pub use path::{Affine, DevicePath, PathCanvas, PathElement, Surface};
pub use pattern::{Motif, PatternConfig, create_little_bird_pattern};
pub use recording::{Command, RecordingCanvas};
