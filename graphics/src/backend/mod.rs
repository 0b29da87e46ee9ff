//! GPU backend abstraction layer.
//!
//! The material pipeline only needs three things from a GPU API: turn a
//! composed program into a GPU object, write named uniforms into it, and
//! release it again. Each backend implements the [`GpuBackend`] trait for
//! exactly that surface.
//!
//! # Available Backends
//!
//! - `dummy` (default): Recording backend for tests and headless runs

pub mod dummy;

use std::fmt;
use std::sync::Arc;

use tinted_core::Rgb;

use crate::error::GraphicsError;
use crate::shader::ComposedProgram;

/// Handle to a compiled GPU program.
#[derive(Clone, PartialEq, Eq)]
pub enum GpuProgram {
    /// Dummy backend program (no GPU object)
    Dummy {
        /// Backend-unique program id.
        id: u64,
        /// Debug label given at compile time.
        label: String,
    },
}

impl GpuProgram {
    /// Debug label given at compile time.
    pub fn label(&self) -> &str {
        match self {
            Self::Dummy { label, .. } => label,
        }
    }
}

impl fmt::Debug for GpuProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dummy { id, label } => write!(f, "GpuProgram::Dummy({id}, {label:?})"),
        }
    }
}

/// Value written into a named uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Rgb> for UniformValue {
    fn from(c: Rgb) -> Self {
        Self::Vec3(c.to_array())
    }
}

/// GPU backend trait for abstracting different GPU APIs.
pub trait GpuBackend: Send + Sync + 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Compile a composed program into a GPU object.
    fn compile_program(
        &self,
        label: &str,
        program: &ComposedProgram,
    ) -> Result<GpuProgram, GraphicsError>;

    /// Write a value into a named uniform of `program`.
    fn upload_uniform(
        &self,
        program: &GpuProgram,
        name: &str,
        value: UniformValue,
    ) -> Result<(), GraphicsError>;

    /// Release a program. The handle must not be used afterwards.
    fn release_program(&self, program: GpuProgram);
}

/// Selects and creates the appropriate backend based on available features.
pub fn create_backend() -> Result<Arc<dyn GpuBackend>, GraphicsError> {
    log::info!("Using dummy backend");
    Ok(Arc::new(dummy::DummyBackend::new()))
}
