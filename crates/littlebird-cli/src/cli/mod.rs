//! CLI command implementations.
//!
//! This module contains the implementations for the non-interactive
//! subcommands:
//! - `render` - Write one frame to PNG or SVG
//! - `covering` - Dump the cells each tiling draws as JSON
//! - `benchmark` - Time covering and rendering across a zoom sweep

pub mod benchmark;
pub mod common;
pub mod covering;
pub mod render;

pub use benchmark::cmd_benchmark;
pub use common::{frame_work, parse_view_args, print_view_flags};
pub use covering::cmd_covering;
pub use render::cmd_render;
