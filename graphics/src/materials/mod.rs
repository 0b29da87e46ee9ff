//! Per-instance gradient materials.
//!
//! This module layers the gradient/corner effect on top of a base material:
//!
//! - [`MaterialTemplate`] - Shared base source, base color and patch catalog
//! - [`ShaderAugmentor`] - Patches a template's source once and binds live uniforms
//! - [`MaterialInstanceRegistry`] - Owns independently parameterized instances
//! - [`ParameterBridge`] / [`set_parameter`] - Routes debug-panel edits to instances
//!
//! # Parameter Ownership
//!
//! Every instance owns its own [`ParameterBlock`], created from a value copy
//! of the caller's [`EffectParameters`]. Two instances of one template never
//! share parameter state, and edits only cost a uniform upload on the next
//! draw.

mod augment;
mod bridge;
mod effect;
mod instance;
mod params;
mod registry;
mod template;

pub use augment::{AUGMENTED_DEFINE, AugmentedProgram, ShaderAugmentor, is_augmented};
pub use bridge::{ControlId, ControlKind, ParameterBridge, ParameterControl, set_parameter};
pub use effect::EffectSample;
pub use instance::MaterialInstance;
pub use params::{
    CORNER_EXPONENT_MIN, EffectField, EffectFields, EffectParameters, GRADIENT_STRENGTH_MAX,
    GRADIENT_STRENGTH_MIN, ParameterBlock, ParameterFeedback, ParameterOutOfRange, ParameterValue,
};
pub use registry::{MaterialHandle, MaterialInstanceRegistry, PrepareReport};
pub use template::{MaterialTemplate, TemplateId};
