//! # Tinted Graphics
//!
//! Shader augmentation for per-instance gradient materials.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`shader`] - GLSL chunk library, data-driven patch rules and the composer
//! - [`materials`] - Augmentor, effect parameters, instance registry and parameter bridge
//! - [`backend`] - Trait for GPU backends plus a recording [`DummyBackend`]
//! - [`RenderContext`] - Backend, composer and frame counter passed to every operation
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tinted_graphics::*;
//!
//! let mut ctx = RenderContext::new(Arc::new(DummyBackend::new()));
//! let template = Arc::new(MaterialTemplate::basic_gradient(TemplateId(0)));
//! let mut registry = MaterialInstanceRegistry::new();
//!
//! let cube = registry.create_instance(&ctx, &template, EffectParameters::default())?;
//! set_parameter(&registry, cube, EffectField::CornerExponent, 7.0_f32)?;
//! let report = registry.prepare_all(&ctx);
//! assert!(report.is_ok());
//! ctx.end_frame();
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod materials;
pub mod shader;

// Re-export main types for convenience
pub use backend::dummy::DummyBackend;
pub use backend::{GpuBackend, GpuProgram, UniformValue};
pub use context::RenderContext;
pub use error::GraphicsError;
pub use materials::{
    EffectField, EffectFields, EffectParameters, EffectSample, MaterialHandle, MaterialInstance,
    MaterialInstanceRegistry, MaterialTemplate, ParameterBridge, ParameterFeedback,
    ParameterOutOfRange, ParameterValue, PrepareReport, ShaderAugmentor, TemplateId,
    set_parameter,
};
pub use shader::{
    ComposerConfig, PatchCatalog, PatchRule, ShaderComposer, ShaderSource, ShaderStage,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    log::info!("Tinted Graphics v{} initialized", VERSION);
}
