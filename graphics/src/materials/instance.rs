//! Material instance with its own parameters and program.
//!
//! A [`MaterialInstance`] owns one [`ParameterBlock`] and the augmented
//! program bound to it. Multiple instances can share the same
//! [`MaterialTemplate`] without sharing any parameter state.

use std::sync::Arc;

use tinted_core::profiling::profile_scope;

use crate::backend::GpuProgram;
use crate::context::RenderContext;
use crate::error::GraphicsError;
use crate::shader::ComposedProgram;

use super::augment::AugmentedProgram;
use super::params::{EffectFields, EffectParameters, ParameterBlock};
use super::template::MaterialTemplate;

/// One independently parameterized use of a [`MaterialTemplate`].
#[derive(Debug)]
pub struct MaterialInstance {
    label: String,
    template: Arc<MaterialTemplate>,
    parameters: ParameterBlock,
    program: AugmentedProgram,
    composed: ComposedProgram,
    /// Compiled on first draw.
    gpu_program: Option<GpuProgram>,
}

impl MaterialInstance {
    pub(crate) fn new(
        label: String,
        template: Arc<MaterialTemplate>,
        parameters: ParameterBlock,
        program: AugmentedProgram,
        composed: ComposedProgram,
    ) -> Self {
        Self {
            label,
            template,
            parameters,
            program,
            composed,
            gpu_program: None,
        }
    }

    /// Debug label, also used as the GPU program label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn template(&self) -> &Arc<MaterialTemplate> {
        &self.template
    }

    /// The instance's live parameter storage.
    pub fn parameter_block(&self) -> &ParameterBlock {
        &self.parameters
    }

    /// Copy of the current parameters.
    pub fn parameters(&self) -> EffectParameters {
        self.parameters.get()
    }

    pub fn program(&self) -> &AugmentedProgram {
        &self.program
    }

    /// Composed GLSL (and WGSL when validated) of the augmented program.
    pub fn composed(&self) -> &ComposedProgram {
        &self.composed
    }

    pub fn gpu_program(&self) -> Option<&GpuProgram> {
        self.gpu_program.as_ref()
    }

    pub fn is_compiled(&self) -> bool {
        self.gpu_program.is_some()
    }

    /// Get the instance ready for a draw: compile on first use, then upload
    /// changed effect uniforms. Returns the fields that were uploaded.
    pub fn prepare(&mut self, ctx: &RenderContext) -> Result<EffectFields, GraphicsError> {
        profile_scope!("material_prepare");

        let gpu = match &mut self.gpu_program {
            Some(gpu) => gpu,
            slot @ None => {
                let gpu = compile(ctx, &self.label, &self.template, &self.composed)?;
                self.program.invalidate_uploads();
                slot.insert(gpu)
            }
        };
        self.program.upload(ctx.backend(), gpu)
    }

    /// Release the GPU program, if one was compiled.
    pub(crate) fn release(mut self, ctx: &RenderContext) {
        if let Some(gpu) = self.gpu_program.take() {
            ctx.backend().release_program(gpu);
        }
    }
}

/// Compile `composed` and upload the template's base uniforms.
fn compile(
    ctx: &RenderContext,
    label: &str,
    template: &MaterialTemplate,
    composed: &ComposedProgram,
) -> Result<GpuProgram, GraphicsError> {
    let backend = ctx.backend();
    let gpu = backend.compile_program(label, composed)?;
    for (name, value) in template.base_uniforms() {
        if let Err(e) = backend.upload_uniform(&gpu, name, value) {
            backend.release_program(gpu);
            return Err(e);
        }
    }
    log::info!("Compiled program for '{label}' on frame {}", ctx.frame_index());
    Ok(gpu)
}

static_assertions::assert_impl_all!(MaterialInstance: Send, Sync);
