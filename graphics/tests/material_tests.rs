//! Integration tests for per-instance gradient materials.
//!
//! All tests run against the recording [`DummyBackend`](tinted_graphics::DummyBackend),
//! so compile and upload traffic can be asserted on directly.
//!
//! ```bash
//! cargo test -p tinted-graphics --test material_tests
//! ```

mod common;

use rstest::rstest;

use common::{TestContext, Validation, cube_presets};
use tinted_core::Rgb;
use tinted_core::math::Vec3;
use tinted_graphics::backend::dummy::BackendEvent;
use tinted_graphics::materials::{GRADIENT_STRENGTH_MAX, GRADIENT_STRENGTH_MIN};
use tinted_graphics::{
    EffectField, EffectParameters, EffectSample, GraphicsError, MaterialTemplate, ParameterBridge,
    ParameterFeedback, ParameterValue, PatchCatalog, PatchRule, ShaderSource, ShaderStage,
    TemplateId, UniformValue, set_parameter,
};

// ============================================================================
// Effect formula
// ============================================================================

#[rstest]
#[case::soft(0.5)]
#[case::default(2.0)]
#[case::sharp(7.0)]
fn test_vertical_center_blends_halfway(#[case] corner_exponent: f32) {
    let params = EffectParameters::new(1.0, corner_exponent, Rgb::WHITE, Rgb::BLACK);
    let sample = EffectSample::evaluate(&params, &Vec3::new(0.25, 0.0, 0.25), Rgb::WHITE);
    assert_eq!(sample.blend_factor, 0.5);
}

#[rstest]
#[case::narrow(0.01)]
#[case::default(1.0)]
#[case::wide(10.0)]
fn test_origin_corner_term_is_neutral(#[case] gradient_strength: f32) {
    let params = EffectParameters::new(gradient_strength, 3.0, Rgb::WHITE, Rgb::BLACK);
    let sample = EffectSample::evaluate(&params, &Vec3::zeros(), Rgb::WHITE);
    assert_eq!(sample.corner_factor, 0.0);
    assert_eq!(sample.final_color, sample.vertical_color);
}

#[rstest]
fn test_end_to_end_mid_gray() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::new(1.0, 3.0, Rgb::WHITE, Rgb::BLACK));
    t.registry.prepare_draw(&t.ctx, handle).unwrap();

    let params = t.registry.parameters(handle).unwrap();
    let sample = EffectSample::evaluate(&params, &Vec3::zeros(), t.template.base_color());
    assert_eq!(sample.blend_factor, 0.5);
    assert_eq!(sample.vertical_color, Rgb::gray(0.5));
    assert_eq!(sample.output, Rgb::gray(0.5));

    let gpu = t.registry.get(handle).unwrap().gpu_program().unwrap().clone();
    assert_eq!(
        t.backend.last_upload(&gpu, "gradientStrength"),
        Some(UniformValue::Float(1.0))
    );
    assert_eq!(
        t.backend.last_upload(&gpu, "bottomColor"),
        Some(UniformValue::Vec3([0.0, 0.0, 0.0]))
    );
}

// ============================================================================
// Instance lifecycle
// ============================================================================

#[rstest]
fn test_destroy_twice_releases_once() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());
    t.registry.prepare_draw(&t.ctx, handle).unwrap();

    assert!(t.registry.destroy_instance(&t.ctx, handle));
    assert!(!t.registry.destroy_instance(&t.ctx, handle));

    let releases = t
        .backend
        .events()
        .into_iter()
        .filter(|e| matches!(e, BackendEvent::Released { .. }))
        .count();
    assert_eq!(releases, 1);
    assert_eq!(t.backend.live_programs(), 0);
    assert!(t.registry.is_empty());
}

#[rstest]
fn test_destroy_before_first_draw_releases_nothing() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());
    assert!(t.registry.destroy_instance(&t.ctx, handle));
    assert!(t.backend.events().is_empty());
}

#[rstest]
fn test_instances_are_independent() {
    let mut t = TestContext::new(Validation::Off);
    let shared = EffectParameters::default();
    let a = t.create(shared);
    let b = t.create(shared);

    set_parameter(&t.registry, a, EffectField::CornerExponent, 7.0_f32).unwrap();
    set_parameter(&t.registry, a, EffectField::TopColor, Rgb::from_hex(0xff0000)).unwrap();

    assert_eq!(t.registry.parameters(a).unwrap().corner_exponent, 7.0);
    assert_eq!(t.registry.parameters(b), Some(shared));

    let block_a = t.registry.parameter_block(a).unwrap();
    let block_b = t.registry.parameter_block(b).unwrap();
    assert!(!block_a.ptr_eq(block_b));
}

#[rstest]
fn test_missing_anchor_leaves_registry_unchanged() {
    let mut t = TestContext::new(Validation::Off);
    let existing = t.create(EffectParameters::default());

    let base = t.template.source();
    let broken = std::sync::Arc::new(
        MaterialTemplate::new(
            TemplateId(2),
            ShaderSource::new(
                base.vertex.replace("#include <begin_vertex>", ""),
                base.fragment.clone(),
            ),
        )
        .with_patches(t.template.patches().clone()),
    );

    let err = t
        .registry
        .create_instance(&t.ctx, &broken, EffectParameters::default())
        .unwrap_err();
    match err {
        GraphicsError::PatchAnchorNotFound { rule, anchor, .. } => {
            assert_eq!(rule, "local_position_assign");
            assert_eq!(anchor, "#include <begin_vertex>");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(t.registry.len(), 1);
    assert_eq!(t.registry.handles(), &[existing]);
    assert!(t.registry.instances_of(TemplateId(2)).is_empty());
    assert_eq!(t.backend.compile_count(), 0);
}

#[rstest]
fn test_pre_augmented_template_is_rejected() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());
    let augmented = t.registry.get(handle).unwrap().program().source().clone();

    let twice = std::sync::Arc::new(
        MaterialTemplate::new(TemplateId(3), augmented).with_patches(t.template.patches().clone()),
    );
    assert_eq!(
        t.registry
            .create_instance(&t.ctx, &twice, EffectParameters::default())
            .unwrap_err(),
        GraphicsError::AlreadyAugmented
    );
    assert_eq!(t.registry.len(), 1);
}

#[rstest]
fn test_custom_catalog_is_augmented_once() {
    let mut t = TestContext::new(Validation::Off);
    let tint = PatchCatalog::new().with_rule(PatchRule::before_line(
        "tint",
        ShaderStage::Fragment,
        "#include <dithering_fragment>",
        "    out_color.rgb *= 0.5;",
    ));
    let tinted = std::sync::Arc::new(
        MaterialTemplate::new(TemplateId(4), t.template.source().clone())
            .with_patches(tint.clone()),
    );
    let handle = t
        .registry
        .create_instance(&t.ctx, &tinted, EffectParameters::default())
        .unwrap();
    let augmented = t.registry.get(handle).unwrap().program().source().clone();
    assert_eq!(augmented.fragment.matches("out_color.rgb *= 0.5;").count(), 1);

    let again =
        std::sync::Arc::new(MaterialTemplate::new(TemplateId(5), augmented).with_patches(tint));
    assert_eq!(
        t.registry
            .create_instance(&t.ctx, &again, EffectParameters::default())
            .unwrap_err(),
        GraphicsError::AlreadyAugmented
    );
    assert_eq!(t.registry.len(), 1);
    assert!(t.registry.instances_of(TemplateId(5)).is_empty());
}

#[rstest]
fn test_compile_failure_is_retried_next_draw() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());

    t.backend.set_fail_compiles(true);
    assert!(matches!(
        t.registry.prepare_draw(&t.ctx, handle),
        Err(GraphicsError::ShaderCompilationFailed(_))
    ));
    assert!(!t.registry.get(handle).unwrap().is_compiled());

    t.backend.set_fail_compiles(false);
    t.registry.prepare_draw(&t.ctx, handle).unwrap();
    assert_eq!(t.backend.compile_count(), 1);
}

// ============================================================================
// Live parameters
// ============================================================================

#[rstest]
#[case::negative(-5.0)]
#[case::zero(0.0)]
#[case::nan(f32::NAN)]
#[case::negative_infinity(f32::NEG_INFINITY)]
fn test_gradient_strength_clamps_to_minimum(#[case] requested: f32) {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());

    let feedback =
        set_parameter(&t.registry, handle, EffectField::GradientStrength, requested).unwrap();
    let ParameterFeedback::Clamped(report) = feedback else {
        panic!("expected a clamp report, got {feedback:?}");
    };
    assert_eq!(report.field, EffectField::GradientStrength);
    assert_eq!(report.applied, ParameterValue::Scalar(GRADIENT_STRENGTH_MIN));

    let stored = t.registry.parameters(handle).unwrap().gradient_strength;
    assert_eq!(stored, GRADIENT_STRENGTH_MIN);
    assert!(stored > 0.0);
}

#[rstest]
#[case::huge(3.0e38)]
#[case::max(f32::MAX)]
#[case::infinity(f32::INFINITY)]
fn test_gradient_strength_clamps_to_maximum(#[case] requested: f32) {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());

    let feedback =
        set_parameter(&t.registry, handle, EffectField::GradientStrength, requested).unwrap();
    assert!(feedback.was_clamped());
    assert_eq!(feedback.applied(), ParameterValue::Scalar(GRADIENT_STRENGTH_MAX));

    let params = t.registry.parameters(handle).unwrap();
    let sample = EffectSample::evaluate(&params, &Vec3::zeros(), Rgb::WHITE);
    assert_eq!(sample.blend_factor, 0.5);
}

#[rstest]
fn test_oversized_initial_gradient_is_capped() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::new(3.0e38, 2.0, Rgb::WHITE, Rgb::BLACK));
    let params = t.registry.parameters(handle).unwrap();
    assert_eq!(params.gradient_strength, GRADIENT_STRENGTH_MAX);

    let sample = EffectSample::evaluate(&params, &Vec3::new(0.0, 0.0, 0.1), Rgb::WHITE);
    assert_eq!(sample.blend_factor, 0.5);
}

#[rstest]
fn test_initial_parameters_are_sanitized() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::new(-1.0, -3.0, Rgb::new(2.0, 0.0, 0.0), Rgb::BLACK));
    let params = t.registry.parameters(handle).unwrap();
    assert_eq!(params.gradient_strength, GRADIENT_STRENGTH_MIN);
    assert_eq!(params.corner_exponent, 0.0);
    assert_eq!(params.top_color, Rgb::new(1.0, 0.0, 0.0));
}

#[rstest]
fn test_parameter_change_uploads_without_recompiling() {
    let mut t = TestContext::new(Validation::Off);
    let handle = t.create(EffectParameters::default());
    t.registry.prepare_draw(&t.ctx, handle).unwrap();
    let gpu = t.registry.get(handle).unwrap().gpu_program().unwrap().clone();
    let uploads_after_first_draw = t.backend.uploads_for(&gpu).len();

    set_parameter(&t.registry, handle, EffectField::GradientStrength, 0.3_f32).unwrap();
    let sent = t.registry.prepare_draw(&t.ctx, handle).unwrap();

    assert_eq!(sent.fields().collect::<Vec<_>>(), vec![EffectField::GradientStrength]);
    assert_eq!(t.backend.compile_count(), 1);
    assert_eq!(t.backend.uploads_for(&gpu).len(), uploads_after_first_draw + 1);
    assert_eq!(
        t.backend.last_upload(&gpu, "gradientStrength"),
        Some(UniformValue::Float(0.3))
    );
}

#[rstest]
fn test_bridge_drives_demo_cubes() {
    let mut t = TestContext::new(Validation::Off);
    let mut bridge = ParameterBridge::new();
    let handles: Vec<_> = cube_presets().into_iter().map(|p| t.create(p)).collect();
    for (i, handle) in handles.iter().enumerate() {
        bridge
            .bind_instance(&t.registry, *handle, format!("Cube {i}"))
            .unwrap();
    }
    assert_eq!(bridge.controls().len(), 16);

    let green_corner = bridge.find(handles[1], EffectField::CornerExponent).unwrap();
    bridge.on_input(&t.registry, green_corner, 1.5_f32).unwrap();

    let exponents: Vec<f32> = handles
        .iter()
        .map(|h| t.registry.parameters(*h).unwrap().corner_exponent)
        .collect();
    assert_eq!(exponents, vec![3.0, 1.5, 3.0, 3.0]);

    assert_eq!(t.registry.prepare_all(&t.ctx).uploaded, 4);
    assert_eq!(t.backend.compile_count(), 4);
}

#[rstest]
fn test_prepare_all_keeps_going_after_a_failure() {
    let mut t = TestContext::new(Validation::Off);
    let broken = t.create(EffectParameters::default());
    let steady = t.create(EffectParameters::default());
    let edited = t.create(EffectParameters::default());
    t.registry.prepare_draw(&t.ctx, steady).unwrap();
    t.registry.prepare_draw(&t.ctx, edited).unwrap();

    // Only the never-compiled instance needs the backend to compile.
    t.backend.set_fail_compiles(true);
    set_parameter(&t.registry, edited, EffectField::CornerExponent, 5.0_f32).unwrap();
    let report = t.registry.prepare_all(&t.ctx);

    assert_eq!(report.uploaded, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, broken);
    assert!(matches!(report.failed[0].1, GraphicsError::ShaderCompilationFailed(_)));

    let gpu = t.registry.get(edited).unwrap().gpu_program().unwrap().clone();
    assert_eq!(
        t.backend.last_upload(&gpu, "cornerExponent"),
        Some(UniformValue::Float(5.0))
    );
    assert!(!t.registry.get(broken).unwrap().is_compiled());
}

// ============================================================================
// Composition
// ============================================================================

#[rstest]
#[case::text_only(Validation::Off)]
#[case::naga(Validation::Naga)]
fn test_augmented_program_composes(#[case] validation: Validation) {
    let mut t = TestContext::new(validation);
    let handle = t.create(EffectParameters::default());
    let composed = t.registry.get(handle).unwrap().composed();

    assert!(!composed.vertex.glsl.contains("#include"));
    assert!(composed.vertex.glsl.contains("v_local_position = position;"));
    assert!(composed.fragment.glsl.contains("uniform EffectUniforms"));
    assert!(composed.fragment.glsl.contains("smoothstep(-effect.gradientStrength"));

    let expect_wgsl = cfg!(feature = "naga-validation") && validation == Validation::Naga;
    assert_eq!(composed.fragment.wgsl.is_some(), expect_wgsl);
}
