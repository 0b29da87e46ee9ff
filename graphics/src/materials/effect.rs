//! CPU evaluation of the gradient/corner fragment formula.
//!
//! Mirrors `shaders/effects/gradient_corner/fragment.glsl` term by term so
//! the effect can be checked without a GPU.

use tinted_core::Rgb;
use tinted_core::math::{Vec3, abs_vec3, mix_vec3, saturate, smoothstep};

use super::params::EffectParameters;

/// Intermediate and final terms of the effect at one local-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSample {
    /// Vertical smoothstep factor in `[0, 1]`.
    pub blend_factor: f32,
    /// Gradient color before corner darkening.
    pub vertical_color: Rgb,
    /// Unclamped corner falloff term.
    pub corner_factor: f32,
    /// Gradient color after corner darkening.
    pub final_color: Rgb,
    /// Base color modulated by `final_color`.
    pub output: Rgb,
}

impl EffectSample {
    /// Evaluate the effect for `base` color at `local_position`.
    pub fn evaluate(params: &EffectParameters, local_position: &Vec3, base: Rgb) -> Self {
        let g = params.gradient_strength;
        let blend_factor = smoothstep(-g, g, local_position.y);
        let vertical = mix_vec3(
            &params.bottom_color.to_vec3(),
            &params.top_color.to_vec3(),
            blend_factor,
        );

        // pow(0, 0) is 1 on the GPU too, so a zero exponent blacks out everything.
        let corner_factor = abs_vec3(local_position).norm().powf(params.corner_exponent);
        let final_color = mix_vec3(&vertical, &Vec3::zeros(), saturate(corner_factor));
        let output = base.to_vec3().component_mul(&final_color);

        Self {
            blend_factor,
            vertical_color: Rgb::from_vec3(&vertical),
            corner_factor,
            final_color: Rgb::from_vec3(&final_color),
            output: Rgb::from_vec3(&output),
        }
    }
}
