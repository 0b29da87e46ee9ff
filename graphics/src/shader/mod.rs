//! Shader source handling: patching, include resolution and validation.
//!
//! # Overview
//!
//! - [`ShaderSource`] - vertex + fragment GLSL text pair
//! - [`PatchRule`] / [`PatchCatalog`] - declarative anchor-based source patches
//! - [`ShaderLibrary`] - built-in `#include <chunk>` modules and the basic template
//! - [`ShaderComposer`] - resolves includes, injects defines and (with the
//!   `naga-validation` feature) parses each stage through naga
//!
//! # Example
//!
//! ```ignore
//! use tinted_graphics::shader::{PatchCatalog, ShaderComposer, ShaderSource};
//! use tinted_graphics::shader::library::{BASIC_FRAGMENT_SHADER, BASIC_VERTEX_SHADER};
//!
//! let source = ShaderSource::new(BASIC_VERTEX_SHADER, BASIC_FRAGMENT_SHADER);
//! let patched = PatchCatalog::gradient_corner().apply(source)?;
//!
//! let composer = ShaderComposer::with_standard_library();
//! let program = composer.compose_program(&patched, &[])?;
//! ```

pub mod library;
pub mod patch;
pub mod source;

use std::collections::{HashMap, HashSet};

use tinted_core::profiling::profile_scope;

use crate::error::GraphicsError;

pub use library::ShaderLibrary;
pub use patch::{PatchCatalog, PatchPosition, PatchRule, apply_patches};
pub use source::{ShaderSource, ShaderStage};

/// Composer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Parse and validate each composed stage through naga.
    ///
    /// Ignored when the crate is built without `naga-validation`.
    pub validate: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// One fully composed stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedStage {
    /// GLSL with includes expanded and defines injected after `#version`.
    pub glsl: String,
    /// WGSL produced by naga when validation ran.
    pub wgsl: Option<String>,
}

/// Vertex + fragment output of [`ShaderComposer::compose_program`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedProgram {
    /// Composed vertex stage.
    pub vertex: ComposedStage,
    /// Composed fragment stage.
    pub fragment: ComposedStage,
}

impl ComposedProgram {
    /// Composed stage by kind.
    pub fn stage(&self, stage: ShaderStage) -> &ComposedStage {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Shader composer for resolving includes and composing final GLSL shaders.
///
/// # Include Syntax
///
/// ```glsl
/// #include <common>
/// #include "project/utils.glsl"
/// ```
///
/// Each include is expanded at most once per stage.
///
/// # Shader Definitions
///
/// The stage define (`VERTEX` / `FRAGMENT`) and the caller's defines are
/// injected right after the `#version` directive, so chunks can use
/// `#ifdef DITHERING` style conditionals.
pub struct ShaderComposer {
    /// Registered include sources: path -> source text.
    includes: HashMap<String, String>,
    config: ComposerConfig,
}

impl Default for ShaderComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderComposer {
    /// Create a new empty shader composer.
    pub fn new() -> Self {
        Self {
            includes: HashMap::new(),
            config: ComposerConfig::default(),
        }
    }

    /// Create a shader composer with the standard library pre-loaded.
    pub fn with_standard_library() -> Self {
        let mut composer = Self::new();
        composer.add_library(&ShaderLibrary::standard());
        composer
    }

    /// Replace the composer configuration.
    pub fn with_config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> ComposerConfig {
        self.config
    }

    /// Add a shader library to the composer.
    pub fn add_library(&mut self, library: &ShaderLibrary) {
        for (path, source) in library.modules() {
            self.register_include(path, source);
        }
    }

    /// Register a single include source.
    ///
    /// The path is what appears between `<>` or `""` in the directive.
    pub fn register_include(&mut self, path: &str, source: &str) {
        self.includes.insert(path.to_string(), source.to_string());
    }

    /// Resolve `#include` directives in a GLSL source.
    pub fn resolve_glsl(&self, source: &str) -> Result<String, GraphicsError> {
        let mut included = HashSet::new();
        self.resolve_includes(source, &mut included)
    }

    /// Build the defines list for a given stage.
    ///
    /// The stage define is always first; duplicates are dropped.
    pub fn build_defines<'a>(stage: ShaderStage, defines: &[&'a str]) -> Vec<&'a str> {
        let mut out = vec![stage.define()];
        for &name in defines {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// Compose both stages of a program with the given `#define` names set.
    pub fn compose_program(
        &self,
        source: &ShaderSource,
        defines: &[&str],
    ) -> Result<ComposedProgram, GraphicsError> {
        profile_scope!("compose_program");

        Ok(ComposedProgram {
            vertex: self.compose_stage(&source.vertex, ShaderStage::Vertex, defines)?,
            fragment: self.compose_stage(&source.fragment, ShaderStage::Fragment, defines)?,
        })
    }

    fn compose_stage(
        &self,
        source: &str,
        stage: ShaderStage,
        defines: &[&str],
    ) -> Result<ComposedStage, GraphicsError> {
        let resolved = self.resolve_glsl(source)?;
        let defines = Self::build_defines(stage, defines);
        let glsl = inject_defines(&resolved, &defines);

        let wgsl = if self.config.validate {
            self.validate_stage(&resolved, stage, &defines)?
        } else {
            None
        };

        Ok(ComposedStage { glsl, wgsl })
    }

    #[cfg(feature = "naga-validation")]
    fn validate_stage(
        &self,
        resolved: &str,
        stage: ShaderStage,
        defines: &[&str],
    ) -> Result<Option<String>, GraphicsError> {
        let module = parse_glsl(resolved, stage, defines)?;
        write_wgsl(&module).map(Some)
    }

    #[cfg(not(feature = "naga-validation"))]
    fn validate_stage(
        &self,
        _resolved: &str,
        stage: ShaderStage,
        _defines: &[&str],
    ) -> Result<Option<String>, GraphicsError> {
        log::trace!("naga-validation disabled, skipping {stage} stage validation");
        Ok(None)
    }

    /// Resolve `#include` directives recursively.
    fn resolve_includes(
        &self,
        source: &str,
        included: &mut HashSet<String>,
    ) -> Result<String, GraphicsError> {
        let mut result = String::with_capacity(source.len());

        for line in source.lines() {
            let trimmed = line.trim();
            if let Some(path) = parse_include_directive(trimmed) {
                // Skip if already included (prevent double-inclusion)
                if !included.insert(path.to_string()) {
                    continue;
                }

                let include_source = self.includes.get(path).ok_or_else(|| {
                    GraphicsError::ShaderCompilationFailed(format!("Include not found: \"{path}\""))
                })?;

                let resolved = self.resolve_includes(include_source, included)?;
                result.push_str(&resolved);
                if !resolved.ends_with('\n') {
                    result.push('\n');
                }
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }

        Ok(result)
    }
}

/// Insert `#define` lines right after the `#version` directive (or at the top).
pub(crate) fn inject_defines(source: &str, defines: &[&str]) -> String {
    let block: String = defines
        .iter()
        .map(|name| format!("#define {name}\n"))
        .collect();

    let mut out = String::with_capacity(source.len() + block.len());
    match source.find("#version") {
        Some(start) => {
            let line_end = source[start..]
                .find('\n')
                .map(|i| start + i + 1)
                .unwrap_or(source.len());
            out.push_str(&source[..line_end]);
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&block);
            out.push_str(&source[line_end..]);
        }
        None => {
            out.push_str(&block);
            out.push_str(source);
        }
    }
    out
}

#[cfg(feature = "naga-validation")]
fn parse_glsl(
    resolved: &str,
    stage: ShaderStage,
    defines: &[&str],
) -> Result<naga::Module, GraphicsError> {
    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    let mut naga_defines = naga::FastHashMap::default();
    for name in defines {
        naga_defines.insert(name.to_string(), String::new());
    }

    let options = naga::front::glsl::Options {
        stage: naga_stage,
        defines: naga_defines,
    };

    let mut frontend = naga::front::glsl::Frontend::default();
    frontend.parse(&options, resolved).map_err(|errors| {
        GraphicsError::ShaderCompilationFailed(format!("GLSL parse error ({stage}):\n{errors}"))
    })
}

#[cfg(feature = "naga-validation")]
fn write_wgsl(module: &naga::Module) -> Result<String, GraphicsError> {
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    let module_info = validator
        .validate(module)
        .map_err(|e| GraphicsError::ShaderCompilationFailed(format!("Validation error: {e}")))?;

    naga::back::wgsl::write_string(module, &module_info, naga::back::wgsl::WriterFlags::empty())
        .map_err(|e| GraphicsError::ShaderCompilationFailed(format!("WGSL generation error: {e}")))
}

/// Parse a `#include "path"` or `#include <path>` directive.
fn parse_include_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("#include")?;
    let rest = rest.trim();
    if let Some(inner) = rest.strip_prefix('"') {
        inner.strip_suffix('"')
    } else if let Some(inner) = rest.strip_prefix('<') {
        inner.strip_suffix('>')
    } else {
        None
    }
}
