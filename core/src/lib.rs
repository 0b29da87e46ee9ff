//! # Tinted Core
//!
//! Core crate for Tinted: math helpers, RGB colors, generational slot storage
//! and profiling macros shared by the graphics and demo crates.

pub mod color;
pub mod math;
pub mod profiling;
pub mod slots;

pub use color::{ColorParseError, Rgb};
pub use slots::{SlotHandle, SlotMap};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core crate version.
pub fn init() {
    log::info!("Tinted Core v{} initialized", VERSION);
}
