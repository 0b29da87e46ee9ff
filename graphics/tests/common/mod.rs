//! Common utilities for material integration tests.

use std::sync::Arc;

use tinted_core::Rgb;
use tinted_graphics::{
    ComposerConfig, DummyBackend, EffectParameters, MaterialHandle, MaterialInstanceRegistry,
    MaterialTemplate, RenderContext, ShaderComposer, TemplateId,
};

/// Whether composed programs are run through naga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Text composition only.
    Off,
    /// Parse and validate with naga when the feature is compiled in.
    Naga,
}

impl Validation {
    pub fn config(self) -> ComposerConfig {
        ComposerConfig {
            validate: self == Validation::Naga,
        }
    }
}

/// Registry, context and recording backend for one test.
pub struct TestContext {
    pub backend: Arc<DummyBackend>,
    pub ctx: RenderContext,
    pub registry: MaterialInstanceRegistry,
    pub template: Arc<MaterialTemplate>,
}

impl TestContext {
    pub fn new(validation: Validation) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let backend = Arc::new(DummyBackend::new());
        let composer = ShaderComposer::with_standard_library().with_config(validation.config());
        let ctx = RenderContext::with_composer(backend.clone(), composer);
        let template = Arc::new(
            MaterialTemplate::basic_gradient(TemplateId(1))
                .with_label("cube")
                .with_base_color(Rgb::WHITE),
        );

        Self {
            backend,
            ctx,
            registry: MaterialInstanceRegistry::new(),
            template,
        }
    }

    /// Create an instance of the default template.
    pub fn create(&mut self, params: EffectParameters) -> MaterialHandle {
        self.registry
            .create_instance(&self.ctx, &self.template, params)
            .unwrap()
    }
}

/// Parameters of the four demo cubes: top color, corner exponent, gradient strength.
pub fn cube_presets() -> Vec<EffectParameters> {
    [
        (0xff0000, 3.0, 0.8),
        (0x00ff00, 7.0, 1.0),
        (0xffffff, 3.0, 0.6),
        (0xadd8e6, 3.0, 1.0),
    ]
    .into_iter()
    .map(|(top, corner, gradient)| EffectParameters {
        gradient_strength: gradient,
        corner_exponent: corner,
        top_color: Rgb::from_hex(top),
        ..Default::default()
    })
    .collect()
}
