//! # Tinted Demos
//!
//! Demo scenes showcasing Tinted per-instance gradient materials.
//!
//! ## Available Demos
//!
//! - `gradient_cubes` - Four cubes sharing one material template, each with its own parameters

pub mod overrides;
pub mod scene;

pub use overrides::ParameterOverride;
pub use scene::{CubePreset, FrameStats, GradientCubes, cube_presets, cube_template};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
