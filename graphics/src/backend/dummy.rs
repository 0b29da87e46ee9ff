//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It hands out program
//! ids and records every call so tests can assert on compile and upload
//! traffic without GPU hardware.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::shader::ComposedProgram;

use super::{GpuBackend, GpuProgram, UniformValue};

/// A call observed by the [`DummyBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Compiled { id: u64, label: String },
    Uploaded { id: u64, name: String, value: UniformValue },
    Released { id: u64 },
}

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    next_id: AtomicU64,
    fail_compiles: AtomicBool,
    live: Mutex<HashSet<u64>>,
    events: Mutex<Vec<BackendEvent>>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following compile fail with [`GraphicsError::ShaderCompilationFailed`].
    pub fn set_fail_compiles(&self, fail: bool) {
        self.fail_compiles.store(fail, Ordering::Relaxed);
    }

    /// Copy of all recorded events, oldest first.
    pub fn events(&self) -> Vec<BackendEvent> {
        self.events.lock().clone()
    }

    /// Number of successful compiles so far.
    pub fn compile_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, BackendEvent::Compiled { .. }))
            .count()
    }

    /// Number of programs compiled and not yet released.
    pub fn live_programs(&self) -> usize {
        self.live.lock().len()
    }

    /// Uploads recorded for one program, in order.
    pub fn uploads_for(&self, program: &GpuProgram) -> Vec<(String, UniformValue)> {
        let GpuProgram::Dummy { id: target, .. } = program;
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                BackendEvent::Uploaded { id, name, value } if id == target => {
                    Some((name.clone(), *value))
                }
                _ => None,
            })
            .collect()
    }

    /// Most recent value uploaded to `name` on `program`.
    pub fn last_upload(&self, program: &GpuProgram, name: &str) -> Option<UniformValue> {
        self.uploads_for(program)
            .into_iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Forget recorded events. Live programs stay live.
    pub fn clear_events(&self) {
        self.events.lock().clear();
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn compile_program(
        &self,
        label: &str,
        program: &ComposedProgram,
    ) -> Result<GpuProgram, GraphicsError> {
        if self.fail_compiles.load(Ordering::Relaxed) {
            return Err(GraphicsError::ShaderCompilationFailed(format!(
                "{label}: dummy backend configured to fail"
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        log::trace!(
            "DummyBackend: compiling program {:?} (vs: {} bytes, fs: {} bytes)",
            label,
            program.vertex.glsl.len(),
            program.fragment.glsl.len()
        );
        self.live.lock().insert(id);
        self.events.lock().push(BackendEvent::Compiled {
            id,
            label: label.to_string(),
        });
        Ok(GpuProgram::Dummy {
            id,
            label: label.to_string(),
        })
    }

    fn upload_uniform(
        &self,
        program: &GpuProgram,
        name: &str,
        value: UniformValue,
    ) -> Result<(), GraphicsError> {
        let GpuProgram::Dummy { id, .. } = program;
        if !self.live.lock().contains(id) {
            return Err(GraphicsError::InvalidHandle(format!(
                "program {id} is not live"
            )));
        }
        log::trace!("DummyBackend: program {id} uniform {name} = {value:?}");
        self.events.lock().push(BackendEvent::Uploaded {
            id: *id,
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn release_program(&self, program: GpuProgram) {
        let GpuProgram::Dummy { id, .. } = program;
        log::trace!("DummyBackend: releasing program {id}");
        self.live.lock().remove(&id);
        self.events.lock().push(BackendEvent::Released { id });
    }
}
