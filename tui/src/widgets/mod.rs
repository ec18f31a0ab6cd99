//! Widgets

pub mod text_block;

pub use text_block::{centered_x, truncate, wrap_lines, TextBlock, TextBlockState};
