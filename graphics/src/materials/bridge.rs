//! Live parameter bridge between debug controls and material instances.
//!
//! Writes go straight into the instance's [`ParameterBlock`](super::ParameterBlock);
//! the next [`prepare_draw`](super::MaterialInstanceRegistry::prepare_draw)
//! uploads the changed uniforms. Nothing is recompiled.

use std::fmt;

use super::params::{EffectField, ParameterFeedback, ParameterValue};
use super::registry::{MaterialHandle, MaterialInstanceRegistry};
use crate::error::GraphicsError;

/// Write one field of an instance's parameters.
///
/// Out-of-range values are clamped and reported through
/// [`ParameterFeedback::Clamped`]; the call still succeeds. A dead handle or
/// a value of the wrong kind is an error and leaves the parameters untouched.
pub fn set_parameter(
    registry: &MaterialInstanceRegistry,
    handle: MaterialHandle,
    field: EffectField,
    value: impl Into<ParameterValue>,
) -> Result<ParameterFeedback, GraphicsError> {
    let feedback = registry.parameter_block(handle)?.update(field, value.into())?;
    if let ParameterFeedback::Clamped(report) = &feedback {
        log::debug!("{handle}: {report}");
    }
    Ok(feedback)
}

/// Identifier of a [`ParameterControl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control {}", self.0)
    }
}

/// Widget shape of a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    /// Numeric slider. The range only bounds the widget; writes are clamped
    /// to the field's own range.
    Slider { min: f32, max: f32, step: f32 },
    /// Color picker.
    Color,
}

impl ControlKind {
    /// Default widget for a field.
    pub fn for_field(field: EffectField) -> Self {
        match field {
            EffectField::GradientStrength => Self::Slider {
                min: 0.01,
                max: 5.0,
                step: 0.01,
            },
            EffectField::CornerExponent => Self::Slider {
                min: 0.0,
                max: 10.0,
                step: 0.1,
            },
            EffectField::TopColor | EffectField::BottomColor => Self::Color,
        }
    }
}

/// One debug-panel control bound to a single field of a single instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterControl {
    pub id: ControlId,
    pub instance: MaterialHandle,
    pub field: EffectField,
    /// Panel folder the control is grouped under.
    pub folder: String,
    pub label: &'static str,
    pub kind: ControlKind,
}

/// Set of controls routed to material instances.
#[derive(Debug, Default)]
pub struct ParameterBridge {
    controls: Vec<ParameterControl>,
    next_id: u32,
}

impl ParameterBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one control per effect field of `handle`, grouped under `folder`.
    pub fn bind_instance(
        &mut self,
        registry: &MaterialInstanceRegistry,
        handle: MaterialHandle,
        folder: impl Into<String>,
    ) -> Result<Vec<ControlId>, GraphicsError> {
        if !registry.contains(handle) {
            return Err(GraphicsError::InvalidHandle(handle.to_string()));
        }

        let folder = folder.into();
        let ids = EffectField::ALL
            .into_iter()
            .map(|field| {
                let id = ControlId(self.next_id);
                self.next_id += 1;
                self.controls.push(ParameterControl {
                    id,
                    instance: handle,
                    field,
                    folder: folder.clone(),
                    label: field.label(),
                    kind: ControlKind::for_field(field),
                });
                id
            })
            .collect();
        log::debug!("Bound {handle} to folder '{folder}'");
        Ok(ids)
    }

    /// Remove every control of `handle`. Returns how many were removed.
    pub fn unbind_instance(&mut self, handle: MaterialHandle) -> usize {
        let before = self.controls.len();
        self.controls.retain(|c| c.instance != handle);
        before - self.controls.len()
    }

    /// All controls, in binding order.
    pub fn controls(&self) -> &[ParameterControl] {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> Option<&ParameterControl> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// Control bound to `field` of `handle`, if any.
    pub fn find(&self, handle: MaterialHandle, field: EffectField) -> Option<ControlId> {
        self.controls
            .iter()
            .find(|c| c.instance == handle && c.field == field)
            .map(|c| c.id)
    }

    /// Route a widget edit to its instance.
    pub fn on_input(
        &self,
        registry: &MaterialInstanceRegistry,
        control: ControlId,
        value: impl Into<ParameterValue>,
    ) -> Result<ParameterFeedback, GraphicsError> {
        let control = self
            .control(control)
            .ok_or_else(|| GraphicsError::InvalidHandle(control.to_string()))?;
        set_parameter(registry, control.instance, control.field, value)
    }

    /// Current value shown by a control.
    pub fn value(
        &self,
        registry: &MaterialInstanceRegistry,
        control: ControlId,
    ) -> Result<ParameterValue, GraphicsError> {
        let control = self
            .control(control)
            .ok_or_else(|| GraphicsError::InvalidHandle(control.to_string()))?;
        let params = registry
            .parameters(control.instance)
            .ok_or_else(|| GraphicsError::InvalidHandle(control.instance.to_string()))?;
        Ok(params.get(control.field))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::dummy::DummyBackend;
    use crate::context::RenderContext;
    use crate::materials::params::{EffectParameters, GRADIENT_STRENGTH_MIN};
    use crate::materials::template::{MaterialTemplate, TemplateId};
    use crate::shader::{ComposerConfig, ShaderComposer};
    use tinted_core::Rgb;

    fn setup() -> (RenderContext, MaterialInstanceRegistry, MaterialHandle) {
        let composer =
            ShaderComposer::with_standard_library().with_config(ComposerConfig { validate: false });
        let ctx = RenderContext::with_composer(Arc::new(DummyBackend::new()), composer);
        let template = Arc::new(MaterialTemplate::basic_gradient(TemplateId(1)));
        let mut registry = MaterialInstanceRegistry::new();
        let handle = registry
            .create_instance(&ctx, &template, EffectParameters::default())
            .unwrap();
        (ctx, registry, handle)
    }

    #[test]
    fn test_set_parameter_in_range() {
        let (_ctx, registry, handle) = setup();
        let feedback =
            set_parameter(&registry, handle, EffectField::CornerExponent, 7.0_f32).unwrap();
        assert_eq!(feedback, ParameterFeedback::Applied(ParameterValue::Scalar(7.0)));
        assert_eq!(registry.parameters(handle).unwrap().corner_exponent, 7.0);
    }

    #[test]
    fn test_set_parameter_clamps_and_reports() {
        let (_ctx, registry, handle) = setup();
        let feedback =
            set_parameter(&registry, handle, EffectField::GradientStrength, -5.0_f32).unwrap();
        assert!(feedback.was_clamped());
        assert_eq!(
            registry.parameters(handle).unwrap().gradient_strength,
            GRADIENT_STRENGTH_MIN
        );
    }

    #[test]
    fn test_set_parameter_wrong_kind() {
        let (_ctx, registry, handle) = setup();
        let before = registry.parameters(handle);
        let result = set_parameter(&registry, handle, EffectField::TopColor, 0.5_f32);
        assert!(matches!(result, Err(GraphicsError::InvalidParameter(_))));
        assert_eq!(registry.parameters(handle), before);
    }

    #[test]
    fn test_bind_creates_one_control_per_field() {
        let (_ctx, registry, handle) = setup();
        let mut bridge = ParameterBridge::new();
        let ids = bridge.bind_instance(&registry, handle, "Red Cube").unwrap();

        assert_eq!(ids.len(), 4);
        let labels: Vec<&str> = bridge.controls().iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec!["Gradient Strength", "Corner Exponent", "Top Color", "Bottom Color"]
        );
        assert!(bridge.controls().iter().all(|c| c.folder == "Red Cube"));
        assert_eq!(
            bridge.control(ids[2]).map(|c| c.kind),
            Some(ControlKind::Color)
        );
    }

    #[test]
    fn test_on_input_routes_to_instance() {
        let (_ctx, registry, handle) = setup();
        let mut bridge = ParameterBridge::new();
        bridge.bind_instance(&registry, handle, "cube").unwrap();

        let top = bridge.find(handle, EffectField::TopColor).unwrap();
        bridge.on_input(&registry, top, Rgb::from_hex(0x00ff00)).unwrap();
        assert_eq!(
            bridge.value(&registry, top).unwrap(),
            ParameterValue::Color(Rgb::new(0.0, 1.0, 0.0))
        );
    }

    #[test]
    fn test_controls_of_destroyed_instance() {
        let (ctx, mut registry, handle) = setup();
        let mut bridge = ParameterBridge::new();
        let ids = bridge.bind_instance(&registry, handle, "cube").unwrap();

        registry.destroy_instance(&ctx, handle);
        assert!(matches!(
            bridge.on_input(&registry, ids[0], 1.0_f32),
            Err(GraphicsError::InvalidHandle(_))
        ));
        assert!(matches!(
            bridge.bind_instance(&registry, handle, "cube"),
            Err(GraphicsError::InvalidHandle(_))
        ));

        assert_eq!(bridge.unbind_instance(handle), 4);
        assert!(bridge.controls().is_empty());
        assert!(matches!(
            bridge.on_input(&registry, ids[0], 1.0_f32),
            Err(GraphicsError::InvalidHandle(_))
        ));
    }
}
