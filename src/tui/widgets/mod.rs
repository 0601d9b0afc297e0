//! TUI widgets for the playground.
//!
//! Contains reusable UI components.

pub mod editor;
pub mod header;
pub mod help;
pub mod spinner;
pub mod table;
pub mod templates;
pub mod toast;
