//! Shared material template.
//!
//! A [`MaterialTemplate`] is the immutable definition behind a logical
//! material: base shader source, base color, the patch catalog applied to
//! every instance and the `#define`s its programs are composed with. It is
//! shared across instances as `Arc<MaterialTemplate>`.

use std::fmt;

use tinted_core::Rgb;

use crate::backend::UniformValue;
use crate::shader::library::{BASIC_FRAGMENT_SHADER, BASIC_VERTEX_SHADER};
use crate::shader::{PatchCatalog, ShaderSource};

/// Identifier of a material template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template#{}", self.0)
    }
}

/// Immutable definition shared by all instances of a logical material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTemplate {
    id: TemplateId,
    label: Option<String>,
    base_color: Rgb,
    source: ShaderSource,
    patches: PatchCatalog,
    defines: Vec<String>,
}

impl MaterialTemplate {
    /// Create a template with a white base color and no patches.
    pub fn new(id: TemplateId, source: ShaderSource) -> Self {
        Self {
            id,
            label: None,
            base_color: Rgb::WHITE,
            source,
            patches: PatchCatalog::new(),
            defines: Vec::new(),
        }
    }

    /// The basic opaque material with the gradient/corner patches.
    pub fn basic_gradient(id: TemplateId) -> Self {
        Self::new(
            id,
            ShaderSource::new(BASIC_VERTEX_SHADER, BASIC_FRAGMENT_SHADER),
        )
        .with_patches(PatchCatalog::gradient_corner())
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the base (diffuse) color.
    pub fn with_base_color(mut self, color: Rgb) -> Self {
        self.base_color = color;
        self
    }

    /// Replace the patch catalog.
    pub fn with_patches(mut self, patches: PatchCatalog) -> Self {
        self.patches = patches;
        self
    }

    /// Compose every instance program with `name` defined, e.g. `DITHERING`.
    pub fn with_define(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.defines.contains(&name) {
            self.defines.push(name);
        }
        self
    }

    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// Get the template label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    /// Unpatched base source.
    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    pub fn patches(&self) -> &PatchCatalog {
        &self.patches
    }

    /// Extra `#define` names, in insertion order.
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Uniforms of the base material, uploaded once per compiled program.
    pub fn base_uniforms(&self) -> [(&'static str, UniformValue); 2] {
        [
            ("diffuse", self.base_color.into()),
            ("opacity", UniformValue::Float(1.0)),
        ]
    }
}
