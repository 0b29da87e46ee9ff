//! Explicit render context passed to every material operation.

use std::sync::Arc;

use tinted_core::profiling::frame_mark;

use crate::backend::GpuBackend;
use crate::shader::ShaderComposer;

/// Backend, shader composer and frame counter for one render loop.
pub struct RenderContext {
    backend: Arc<dyn GpuBackend>,
    composer: ShaderComposer,
    frame_index: u64,
}

impl RenderContext {
    /// Create a context with the standard shader library loaded.
    pub fn new(backend: Arc<dyn GpuBackend>) -> Self {
        Self::with_composer(backend, ShaderComposer::with_standard_library())
    }

    pub fn with_composer(backend: Arc<dyn GpuBackend>, composer: ShaderComposer) -> Self {
        log::info!("Render context created on {}", backend.name());
        Self {
            backend,
            composer,
            frame_index: 0,
        }
    }

    pub fn backend(&self) -> &dyn GpuBackend {
        self.backend.as_ref()
    }

    pub fn composer(&self) -> &ShaderComposer {
        &self.composer
    }

    /// Index of the current frame, starting at 0.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Finish the current frame and advance the counter.
    pub fn end_frame(&mut self) {
        frame_mark!();
        self.frame_index += 1;
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("backend", &self.backend.name())
            .field("frame_index", &self.frame_index)
            .finish()
    }
}
