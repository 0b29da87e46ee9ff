//! Gradient cubes demo.
//!
//! Renders a few headless frames of four cubes that share one augmented
//! material template. Each cube keeps its own gradient strength, corner
//! exponent and colors, which can be edited with `--set` without any shader
//! recompilation.
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin gradient_cubes -- --set green.cornerExponent=2 --show-performance
//! ```

mod args;

use clap::Parser;
use tinted_graphics::backend::create_backend;
use tinted_graphics::{ComposerConfig, ParameterFeedback, RenderContext, ShaderComposer};
use tinted_demos::{GradientCubes, cube_template};

use args::DemoArgs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    tinted_core::init();
    tinted_graphics::init();

    let args = DemoArgs::parse();
    log::info!("Gradient cubes demo v{}", tinted_demos::VERSION);

    let composer = ShaderComposer::with_standard_library().with_config(ComposerConfig {
        validate: !args.no_validate,
    });
    let ctx = RenderContext::with_composer(create_backend()?, composer);

    let mut template = cube_template();
    if args.dither {
        template = template.with_define("DITHERING");
    }
    let mut scene = GradientCubes::with_template(ctx, template)?;
    scene.show_performance = args.show_performance;

    for edit in &args.set {
        match scene.apply(edit)? {
            ParameterFeedback::Applied(_) => log::info!("Applied {edit}"),
            ParameterFeedback::Clamped(report) => log::warn!("Clamped {edit}: {report}"),
        }
    }

    for _ in 0..args.frames {
        let stats = scene.render_frame();
        if stats.failed_instances > 0 {
            log::warn!(
                "frame {}: {} cubes could not be prepared",
                stats.frame,
                stats.failed_instances
            );
        }
    }

    for (name, color) in scene.top_face_colors() {
        log::info!("{name:>5} cube top face: {color}");
    }

    scene.shutdown();
    Ok(())
}
