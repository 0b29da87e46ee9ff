//! The gradient cubes scene: one shared template, four independently tuned cubes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tinted_core::Rgb;
use tinted_core::math::Vec3;
use tinted_core::profiling::profile_scope;
use tinted_graphics::{
    EffectParameters, EffectSample, GraphicsError, MaterialHandle, MaterialInstanceRegistry,
    MaterialTemplate, ParameterBridge, ParameterFeedback, RenderContext, TemplateId,
};

use crate::overrides::ParameterOverride;

/// Base color of the shared cube material.
pub const CUBE_BASE_COLOR: u32 = 0xffff00;

/// Starting parameters and placement of one cube.
#[derive(Debug, Clone, PartialEq)]
pub struct CubePreset {
    pub name: &'static str,
    pub top_color: Rgb,
    pub corner_exponent: f32,
    pub gradient_strength: f32,
    pub position: Vec3,
}

impl CubePreset {
    pub fn parameters(&self) -> EffectParameters {
        EffectParameters {
            gradient_strength: self.gradient_strength,
            corner_exponent: self.corner_exponent,
            top_color: self.top_color,
            ..Default::default()
        }
    }
}

/// The four cubes of the demo, left to right.
pub fn cube_presets() -> Vec<CubePreset> {
    vec![
        CubePreset {
            name: "red",
            top_color: Rgb::from_hex(0xff0000),
            corner_exponent: 3.0,
            gradient_strength: 0.8,
            position: Vec3::new(-2.0, 0.0, 0.0),
        },
        CubePreset {
            name: "green",
            top_color: Rgb::from_hex(0x00ff00),
            corner_exponent: 7.0,
            gradient_strength: 1.0,
            position: Vec3::new(0.0, 0.0, 0.0),
        },
        CubePreset {
            name: "white",
            top_color: Rgb::from_hex(0xffffff),
            corner_exponent: 3.0,
            gradient_strength: 0.6,
            position: Vec3::new(2.0, 0.0, 0.0),
        },
        CubePreset {
            name: "blue",
            top_color: Rgb::from_hex(0xadd8e6),
            corner_exponent: 3.0,
            gradient_strength: 1.0,
            position: Vec3::new(4.0, 0.0, 0.0),
        },
    ]
}

/// Per-frame numbers reported when performance display is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    /// Instances that uploaded at least one uniform this frame.
    pub uploaded_instances: usize,
    /// Instances that could not be prepared and keep last frame's state.
    pub failed_instances: usize,
    pub compiled_programs: usize,
    pub elapsed: Duration,
}

struct Cube {
    preset: CubePreset,
    handle: MaterialHandle,
}

/// Demo state: render context, registry, debug-panel bridge and the cubes.
pub struct GradientCubes {
    ctx: RenderContext,
    registry: MaterialInstanceRegistry,
    bridge: ParameterBridge,
    cubes: Vec<Cube>,
    /// Mirrors the panel's "Show Performance" toggle.
    pub show_performance: bool,
}

/// The shared cube material: basic gradient template on a yellow base.
pub fn cube_template() -> MaterialTemplate {
    MaterialTemplate::basic_gradient(TemplateId(0))
        .with_label("cube")
        .with_base_color(Rgb::from_hex(CUBE_BASE_COLOR))
}

impl GradientCubes {
    /// Create the scene with the default [`cube_template`].
    pub fn new(ctx: RenderContext) -> Result<Self, GraphicsError> {
        Self::with_template(ctx, cube_template())
    }

    /// Create one instance of `template` per preset.
    pub fn with_template(
        ctx: RenderContext,
        template: MaterialTemplate,
    ) -> Result<Self, GraphicsError> {
        let template = Arc::new(template);

        let mut registry = MaterialInstanceRegistry::new();
        let mut bridge = ParameterBridge::new();
        let mut cubes = Vec::new();
        for preset in cube_presets() {
            let handle = registry.create_instance(&ctx, &template, preset.parameters())?;
            bridge.bind_instance(&registry, handle, preset.name)?;
            log::info!("Cube '{}' at {:?} -> {handle}", preset.name, preset.position.as_slice());
            cubes.push(Cube { preset, handle });
        }

        Ok(Self {
            ctx,
            registry,
            bridge,
            cubes,
            show_performance: false,
        })
    }

    pub fn registry(&self) -> &MaterialInstanceRegistry {
        &self.registry
    }

    pub fn bridge(&self) -> &ParameterBridge {
        &self.bridge
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Handle of the cube called `name`.
    pub fn cube(&self, name: &str) -> Option<MaterialHandle> {
        self.cubes
            .iter()
            .find(|c| c.preset.name == name)
            .map(|c| c.handle)
    }

    /// Route an override through the cube's debug-panel control.
    pub fn apply(&self, edit: &ParameterOverride) -> Result<ParameterFeedback, GraphicsError> {
        let handle = self.cube(&edit.cube).ok_or_else(|| {
            GraphicsError::InvalidHandle(format!("no cube named '{}'", edit.cube))
        })?;
        let control = self
            .bridge
            .find(handle, edit.field)
            .ok_or_else(|| GraphicsError::InvalidHandle(format!("no control for {edit}")))?;
        self.bridge.on_input(&self.registry, control, edit.value)
    }

    /// Prepare every cube for drawing and advance the frame.
    ///
    /// A cube that fails to prepare is skipped for this frame; the others
    /// still receive their uniform updates.
    pub fn render_frame(&mut self) -> FrameStats {
        profile_scope!("render_frame");

        let start = Instant::now();
        let frame = self.ctx.frame_index();
        let report = self.registry.prepare_all(&self.ctx);
        let compiled_programs = self
            .cubes
            .iter()
            .filter(|c| self.registry.get(c.handle).is_some_and(|i| i.is_compiled()))
            .count();
        self.ctx.end_frame();

        let stats = FrameStats {
            frame,
            uploaded_instances: report.uploaded,
            failed_instances: report.failed.len(),
            compiled_programs,
            elapsed: start.elapsed(),
        };
        if self.show_performance {
            log::info!(
                "frame {}: {} uploads, {} programs, {:?}",
                stats.frame,
                stats.uploaded_instances,
                stats.compiled_programs,
                stats.elapsed
            );
        }
        stats
    }

    /// CPU-evaluated color at the center of each cube's top face, by cube name.
    pub fn top_face_colors(&self) -> Vec<(&'static str, Rgb)> {
        let base = Rgb::from_hex(CUBE_BASE_COLOR);
        let top_center = Vec3::new(0.0, 0.5, 0.0);
        self.cubes
            .iter()
            .filter_map(|c| {
                let params = self.registry.parameters(c.handle)?;
                Some((c.preset.name, EffectSample::evaluate(&params, &top_center, base).output))
            })
            .collect()
    }

    /// Destroy every cube and release its program.
    pub fn shutdown(mut self) {
        for cube in self.cubes.drain(..) {
            self.bridge.unbind_instance(cube.handle);
            self.registry.destroy_instance(&self.ctx, cube.handle);
        }
        log::info!("Gradient cubes shut down after {} frames", self.ctx.frame_index());
    }
}
