//! Math type aliases and the scalar helpers shaders rely on.
//!
//! The helpers follow GLSL semantics so CPU-side evaluation of shader
//! formulas matches what the GPU computes.

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// GLSL `smoothstep(edge0, edge1, x)`: Hermite interpolation of `x` between the edges.
///
/// Returns 0.0 below `edge0`, 1.0 above `edge1`. Equal edges degrade to a step.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `mix(a, b, t)` for 3-component vectors.
pub fn mix_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// GLSL `clamp(x, 0.0, 1.0)`.
pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Component-wise absolute value.
pub fn abs_vec3(v: &Vec3) -> Vec3 {
    v.abs()
}
