//! Presentation layer for the gift finder
//!
//! Argument handling lives in the binary; rendering, preset categories
//! and prompt-command parsing live here so they can be tested without a
//! terminal.

pub mod display;
pub mod presets;
pub mod repl;
