//! Built-in shader chunks and the basic material template.
//!
//! # Shader Files
//!
//! The chunks are stored as `.glsl` files in `shaders/chunks/` and are
//! included with `#include <name>`:
//!
//! | Include | Stage | Description |
//! |---------|-------|-------------|
//! | `common` | both | Constants and small helpers |
//! | `begin_vertex` | vertex | Reads the local-space position into `transformed` |
//! | `project_vertex` | vertex | Writes `gl_Position` |
//! | `dithering_pars_fragment` | fragment | Dither helper (behind `DITHERING`) |
//! | `dithering_fragment` | fragment | Final output adjustment (behind `DITHERING`) |
//!
//! The include lines double as anchor markers for
//! [`PatchRule`](super::PatchRule)s, which is why the basic template keeps
//! each one on a line of its own.

const COMMON_CHUNK: &str = include_str!("../../shaders/chunks/common.glsl");
const BEGIN_VERTEX_CHUNK: &str = include_str!("../../shaders/chunks/begin_vertex.glsl");
const PROJECT_VERTEX_CHUNK: &str = include_str!("../../shaders/chunks/project_vertex.glsl");
const DITHERING_PARS_FRAGMENT_CHUNK: &str =
    include_str!("../../shaders/chunks/dithering_pars_fragment.glsl");
const DITHERING_FRAGMENT_CHUNK: &str =
    include_str!("../../shaders/chunks/dithering_fragment.glsl");

/// Vertex stage of the basic opaque material.
pub const BASIC_VERTEX_SHADER: &str = include_str!("../../shaders/basic.vert");

/// Fragment stage of the basic opaque material.
pub const BASIC_FRAGMENT_SHADER: &str = include_str!("../../shaders/basic.frag");

/// Collection of includable shader chunks.
pub struct ShaderLibrary {
    modules: Vec<(&'static str, &'static str)>,
}

impl ShaderLibrary {
    /// Create the standard chunk library used by the basic material.
    pub fn standard() -> Self {
        Self {
            modules: vec![
                ("common", COMMON_CHUNK),
                ("begin_vertex", BEGIN_VERTEX_CHUNK),
                ("project_vertex", PROJECT_VERTEX_CHUNK),
                ("dithering_pars_fragment", DITHERING_PARS_FRAGMENT_CHUNK),
                ("dithering_fragment", DITHERING_FRAGMENT_CHUNK),
            ],
        }
    }

    /// Create an empty library.
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Iterate `(include name, source)` pairs.
    pub fn modules(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.modules.iter().copied()
    }

    /// Add a chunk.
    pub fn with_module(mut self, name: &'static str, source: &'static str) -> Self {
        self.modules.push((name, source));
        self
    }
}
