//! Declarative source patching.
//!
//! A [`PatchRule`] names an anchor marker in one stage of a [`ShaderSource`]
//! and the text to splice in before or after its first occurrence. Rules are
//! plain data collected in a [`PatchCatalog`]; a new effect is added by
//! appending rules, never by editing the ones already there.
//!
//! Anchors are the `#include <chunk>` lines of the base material template, so
//! patching runs on the unresolved template, before
//! [`ShaderComposer`](super::ShaderComposer) expands the includes.

use crate::error::GraphicsError;

use super::source::{ShaderSource, ShaderStage};

/// Anchor present once in both stages, right after the `#version` line.
pub const COMMON_ANCHOR: &str = "#include <common>";

/// Vertex anchor where the local-space position is first read.
pub const BEGIN_VERTEX_ANCHOR: &str = "#include <begin_vertex>";

/// Fragment anchor where the output color is finalized.
pub const DITHERING_FRAGMENT_ANCHOR: &str = "#include <dithering_fragment>";

const GRADIENT_CORNER_VERTEX_PARS: &str =
    include_str!("../../shaders/effects/gradient_corner/vertex_pars.glsl");
const GRADIENT_CORNER_VERTEX: &str =
    include_str!("../../shaders/effects/gradient_corner/vertex.glsl");
const GRADIENT_CORNER_FRAGMENT_PARS: &str =
    include_str!("../../shaders/effects/gradient_corner/fragment_pars.glsl");
const GRADIENT_CORNER_FRAGMENT: &str =
    include_str!("../../shaders/effects/gradient_corner/fragment.glsl");

/// Where the insertion goes relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchPosition {
    /// Immediately before the anchor's first character.
    Before,
    /// Immediately after the anchor's last character.
    After,
}

/// One injection: splice `insertion` next to the first `anchor` in `stage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    /// Rule name, reported when the anchor is missing.
    pub name: String,
    /// Stage whose source is patched.
    pub stage: ShaderStage,
    /// Text that must exist verbatim in the stage source.
    pub anchor: String,
    /// Text to insert.
    pub insertion: String,
    /// Side of the anchor to insert on.
    pub position: PatchPosition,
}

impl PatchRule {
    /// Create a new patch rule.
    pub fn new(
        name: impl Into<String>,
        stage: ShaderStage,
        anchor: impl Into<String>,
        insertion: impl Into<String>,
        position: PatchPosition,
    ) -> Self {
        Self {
            name: name.into(),
            stage,
            anchor: anchor.into(),
            insertion: insertion.into(),
            position,
        }
    }

    /// Rule inserting `snippet` on its own line(s) after the anchor line.
    pub fn after_line(
        name: impl Into<String>,
        stage: ShaderStage,
        anchor: impl Into<String>,
        snippet: &str,
    ) -> Self {
        Self::new(
            name,
            stage,
            anchor,
            format!("\n{}", snippet.trim_end()),
            PatchPosition::After,
        )
    }

    /// Rule inserting `snippet` on its own line(s) before the anchor line.
    pub fn before_line(
        name: impl Into<String>,
        stage: ShaderStage,
        anchor: impl Into<String>,
        snippet: &str,
    ) -> Self {
        Self::new(
            name,
            stage,
            anchor,
            format!("{}\n", snippet.trim_end()),
            PatchPosition::Before,
        )
    }

    /// Apply this rule to `source` in place.
    ///
    /// On error `source` is left untouched.
    pub fn apply_to(&self, source: &mut ShaderSource) -> Result<(), GraphicsError> {
        let text = source.stage_mut(self.stage);
        let Some(start) = text.find(&self.anchor) else {
            return Err(GraphicsError::PatchAnchorNotFound {
                rule: self.name.clone(),
                stage: self.stage,
                anchor: self.anchor.clone(),
            });
        };
        let at = match self.position {
            PatchPosition::Before => start,
            PatchPosition::After => start + self.anchor.len(),
        };
        text.insert_str(at, &self.insertion);
        Ok(())
    }
}

/// Apply `rules` to `source` in order.
///
/// Consumes the source so that a failed run leaves no partially patched copy
/// behind: the caller either gets a fully patched program or the error.
pub fn apply_patches(
    mut source: ShaderSource,
    rules: &[PatchRule],
) -> Result<ShaderSource, GraphicsError> {
    for rule in rules {
        rule.apply_to(&mut source)?;
        log::debug!(
            "Applied patch '{}' ({} {:?} '{}')",
            rule.name,
            rule.stage,
            rule.position,
            rule.anchor
        );
    }
    Ok(source)
}

/// Ordered collection of patch rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchCatalog {
    rules: Vec<PatchRule>,
}

impl PatchCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for the vertical gradient and corner darkening effects.
    ///
    /// The vertex stage forwards the untransformed local position; the
    /// fragment stage declares the effect uniforms and modulates the final
    /// color:
    ///
    /// ```glsl
    /// blend_factor   = smoothstep(-gradientStrength, gradientStrength, local.y)
    /// vertical_color = mix(bottomColor, topColor, blend_factor)
    /// corner_factor  = pow(length(abs(local)), cornerExponent)
    /// final_color    = mix(vertical_color, vec3(0.0), clamp(corner_factor, 0.0, 1.0))
    /// out_color.rgb *= final_color
    /// ```
    pub fn gradient_corner() -> Self {
        Self::new()
            .with_rule(PatchRule::after_line(
                "local_position_varying",
                ShaderStage::Vertex,
                COMMON_ANCHOR,
                GRADIENT_CORNER_VERTEX_PARS,
            ))
            .with_rule(PatchRule::after_line(
                "local_position_assign",
                ShaderStage::Vertex,
                BEGIN_VERTEX_ANCHOR,
                GRADIENT_CORNER_VERTEX,
            ))
            .with_rule(PatchRule::after_line(
                "effect_uniforms",
                ShaderStage::Fragment,
                COMMON_ANCHOR,
                GRADIENT_CORNER_FRAGMENT_PARS,
            ))
            .with_rule(PatchRule::before_line(
                "effect_output",
                ShaderStage::Fragment,
                DITHERING_FRAGMENT_ANCHOR,
                GRADIENT_CORNER_FRAGMENT,
            ))
    }

    /// Append a rule.
    pub fn with_rule(mut self, rule: PatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule (mutable version).
    pub fn push(&mut self, rule: PatchRule) {
        self.rules.push(rule);
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[PatchRule] {
        &self.rules
    }

    /// Find a rule by name.
    pub fn rule(&self, name: &str) -> Option<&PatchRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule of the catalog to `source`.
    pub fn apply(&self, source: ShaderSource) -> Result<ShaderSource, GraphicsError> {
        apply_patches(source, &self.rules)
    }
}
