//! Shader augmentation: patch a base program once and bind its effect uniforms.

use tinted_core::profiling::profile_scope;

use crate::backend::{GpuBackend, GpuProgram, UniformValue};
use crate::error::GraphicsError;
use crate::shader::{PatchCatalog, ShaderSource, ShaderStage, inject_defines};

use super::params::{EffectField, EffectFields, EffectParameters, ParameterBlock};

/// Define the augmentor adds after `#version` in both stages of every program it patches.
pub const AUGMENTED_DEFINE: &str = "TINTED_AUGMENTED";

/// Applies a [`PatchCatalog`] to program sources.
#[derive(Debug, Clone, Copy)]
pub struct ShaderAugmentor<'a> {
    catalog: &'a PatchCatalog,
}

impl<'a> ShaderAugmentor<'a> {
    pub fn new(catalog: &'a PatchCatalog) -> Self {
        Self { catalog }
    }

    /// Patch a copy of `source` and bind `parameters` as its live uniforms.
    ///
    /// Both stages of the result carry [`AUGMENTED_DEFINE`], whatever rules the
    /// catalog holds. Fails with [`GraphicsError::AlreadyAugmented`] when either
    /// stage of `source` already carries it, and with
    /// [`GraphicsError::PatchAnchorNotFound`] when a rule's anchor is missing.
    pub fn augment(
        &self,
        source: &ShaderSource,
        parameters: ParameterBlock,
    ) -> Result<AugmentedProgram, GraphicsError> {
        profile_scope!("augment");

        if is_augmented(source) {
            return Err(GraphicsError::AlreadyAugmented);
        }

        let mut patched = self.catalog.apply(source.clone())?;
        mark_augmented(&mut patched);
        log::debug!(
            "Augmented program with {} patch rules (fs: {} -> {} bytes)",
            self.catalog.len(),
            source.fragment.len(),
            patched.fragment.len()
        );

        Ok(AugmentedProgram {
            source: patched,
            parameters,
            uploaded: None,
        })
    }
}

/// `true` when either stage of `source` already defines [`AUGMENTED_DEFINE`].
pub fn is_augmented(source: &ShaderSource) -> bool {
    [ShaderStage::Vertex, ShaderStage::Fragment]
        .into_iter()
        .any(|stage| {
            source.stage(stage).lines().any(|line| {
                line.trim().strip_prefix("#define").map(str::trim) == Some(AUGMENTED_DEFINE)
            })
        })
}

fn mark_augmented(source: &mut ShaderSource) {
    for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
        let text = source.stage_mut(stage);
        *text = inject_defines(text, &[AUGMENTED_DEFINE]);
    }
}

/// Patched program source bound to a live [`ParameterBlock`].
///
/// The source is frozen after augmentation. Parameter changes reach the GPU
/// through [`AugmentedProgram::upload`] only.
#[derive(Debug)]
pub struct AugmentedProgram {
    source: ShaderSource,
    parameters: ParameterBlock,
    /// Values last written to the current GPU program, `None` before the first upload.
    uploaded: Option<EffectParameters>,
}

impl AugmentedProgram {
    /// Patched source, read-only.
    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    /// The live parameter binding.
    pub fn parameters(&self) -> &ParameterBlock {
        &self.parameters
    }

    /// Current uniform values, in slot order.
    pub fn uniform_values(&self) -> [(&'static str, UniformValue); 4] {
        let params = self.parameters.get();
        EffectField::ALL.map(|field| (field.uniform_name(), uniform_value(&params, field)))
    }

    /// Fields that differ from what was last uploaded. All fields before the first upload.
    pub fn dirty_fields(&self) -> EffectFields {
        match &self.uploaded {
            Some(uploaded) => uploaded.changed_fields(&self.parameters.get()),
            None => EffectFields::all(),
        }
    }

    /// Upload dirty uniforms to `program` and return which fields were sent.
    pub fn upload(
        &mut self,
        backend: &dyn GpuBackend,
        program: &GpuProgram,
    ) -> Result<EffectFields, GraphicsError> {
        let params = self.parameters.get();
        let dirty = match &self.uploaded {
            Some(uploaded) => uploaded.changed_fields(&params),
            None => EffectFields::all(),
        };

        for field in dirty.fields() {
            backend.upload_uniform(program, field.uniform_name(), uniform_value(&params, field))?;
        }
        self.uploaded = Some(params);
        Ok(dirty)
    }

    /// Forget the upload state, so the next upload sends every field.
    pub fn invalidate_uploads(&mut self) {
        self.uploaded = None;
    }
}

fn uniform_value(params: &EffectParameters, field: EffectField) -> UniformValue {
    match field {
        EffectField::GradientStrength => UniformValue::Float(params.gradient_strength),
        EffectField::CornerExponent => UniformValue::Float(params.corner_exponent),
        EffectField::TopColor => params.top_color.into(),
        EffectField::BottomColor => params.bottom_color.into(),
    }
}
