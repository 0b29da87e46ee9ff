//! Command line arguments for the gradient cubes demo.

use clap::Parser;
use tinted_demos::ParameterOverride;

#[derive(Parser, Debug)]
#[command(
    name = "Gradient Cubes",
    about = "Four cubes sharing one material template, each with its own effect parameters",
    version
)]
pub struct DemoArgs {
    /// Number of frames to render before exiting.
    #[arg(long, default_value = "3")]
    pub frames: u64,

    /// Skip naga validation of the composed shaders.
    #[arg(long)]
    pub no_validate: bool,

    /// Compose the cube material with `DITHERING` defined.
    #[arg(long)]
    pub dither: bool,

    /// Parameter edit applied before the first frame, e.g. `red.cornerExponent=5`
    /// or `blue.topColor=#00ff00`. May be repeated.
    #[arg(long = "set", value_name = "CUBE.FIELD=VALUE")]
    pub set: Vec<ParameterOverride>,

    /// Log per-frame timings ("Show Performance").
    #[arg(long)]
    pub show_performance: bool,
}
