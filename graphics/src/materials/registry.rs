//! Registry of material instances keyed by template.
//!
//! Each call to [`MaterialInstanceRegistry::create_instance`] yields a fresh
//! instance with its own value copy of the caller's parameters. Handles are
//! generational: once an instance is destroyed its handle stays dead even if
//! the slot is reused.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tinted_core::profiling::profile_function;
use tinted_core::{SlotHandle, SlotMap};

use crate::context::RenderContext;
use crate::error::GraphicsError;

use super::augment::ShaderAugmentor;
use super::instance::MaterialInstance;
use super::params::{EffectFields, EffectParameters, ParameterBlock};
use super::template::{MaterialTemplate, TemplateId};

/// Handle to a [`MaterialInstance`] in a [`MaterialInstanceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(SlotHandle);

impl fmt::Display for MaterialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material {}", self.0)
    }
}

/// Outcome of [`MaterialInstanceRegistry::prepare_all`].
#[derive(Debug, Default, PartialEq)]
pub struct PrepareReport {
    /// Instances that uploaded at least one uniform.
    pub uploaded: usize,
    /// Instances that failed to compile or upload, in creation order.
    pub failed: Vec<(MaterialHandle, GraphicsError)>,
}

impl PrepareReport {
    /// `true` when no instance failed.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns all material instances and indexes them by template.
#[derive(Default)]
pub struct MaterialInstanceRegistry {
    instances: SlotMap<MaterialInstance>,
    /// Live handles per template, in creation order.
    by_template: HashMap<TemplateId, Vec<MaterialHandle>>,
    /// Live handles across all templates, in creation order.
    order: Vec<MaterialHandle>,
}

impl MaterialInstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance of `template` starting from a copy of `initial`.
    ///
    /// The program is augmented and composed immediately; a missing patch
    /// anchor or a composition error fails here and leaves the registry
    /// unchanged. GPU compilation is deferred to the first
    /// [`prepare_draw`](Self::prepare_draw).
    pub fn create_instance(
        &mut self,
        ctx: &RenderContext,
        template: &Arc<MaterialTemplate>,
        initial: EffectParameters,
    ) -> Result<MaterialHandle, GraphicsError> {
        profile_function!();

        let parameters = ParameterBlock::new(initial);
        let program = ShaderAugmentor::new(template.patches())
            .augment(template.source(), parameters.share())?;
        let defines: Vec<&str> = template.defines().iter().map(String::as_str).collect();
        let composed = ctx.composer().compose_program(program.source(), &defines)?;

        let index = self.by_template.get(&template.id()).map_or(0, Vec::len);
        let label = match template.label() {
            Some(label) => format!("{label}#{index}"),
            None => format!("{}#{index}", template.id()),
        };

        let slot = self.instances.insert(MaterialInstance::new(
            label,
            Arc::clone(template),
            parameters,
            program,
            composed,
        ));
        let handle = MaterialHandle(slot);
        self.by_template.entry(template.id()).or_default().push(handle);
        self.order.push(handle);

        log::info!(
            "Created {handle} ({}) from {}",
            self.instances.get(slot).map_or("", |i| i.label()),
            template.id()
        );
        Ok(handle)
    }

    /// Destroy an instance and release its GPU program.
    ///
    /// Returns `false` (and does nothing) when the handle is already dead.
    pub fn destroy_instance(&mut self, ctx: &RenderContext, handle: MaterialHandle) -> bool {
        let Some(instance) = self.instances.remove(handle.0) else {
            log::debug!("Ignoring destroy of dead {handle}");
            return false;
        };

        let template_id = instance.template().id();
        if let Some(handles) = self.by_template.get_mut(&template_id) {
            handles.retain(|h| *h != handle);
            if handles.is_empty() {
                self.by_template.remove(&template_id);
            }
        }
        self.order.retain(|h| *h != handle);

        log::info!("Destroyed {handle} ({})", instance.label());
        instance.release(ctx);
        true
    }

    /// Compile on first use and upload changed uniforms for one instance.
    pub fn prepare_draw(
        &mut self,
        ctx: &RenderContext,
        handle: MaterialHandle,
    ) -> Result<EffectFields, GraphicsError> {
        self.instances
            .get_mut(handle.0)
            .ok_or_else(|| GraphicsError::InvalidHandle(handle.to_string()))?
            .prepare(ctx)
    }

    /// [`prepare_draw`](Self::prepare_draw) every live instance in creation
    /// order.
    ///
    /// A failing instance is logged and collected in the report; the
    /// remaining instances are still prepared.
    pub fn prepare_all(&mut self, ctx: &RenderContext) -> PrepareReport {
        profile_function!();

        let mut report = PrepareReport::default();
        for handle in &self.order {
            let Some(instance) = self.instances.get_mut(handle.0) else {
                continue;
            };
            match instance.prepare(ctx) {
                Ok(sent) if !sent.is_empty() => report.uploaded += 1,
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Failed to prepare {handle} ({}): {e}", instance.label());
                    report.failed.push((*handle, e));
                }
            }
        }
        report
    }

    /// Live instances of a template, in creation order.
    pub fn instances_of(&self, template: TemplateId) -> &[MaterialHandle] {
        self.by_template
            .get(&template)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Live instances across all templates, in creation order.
    pub fn handles(&self) -> &[MaterialHandle] {
        &self.order
    }

    pub fn get(&self, handle: MaterialHandle) -> Option<&MaterialInstance> {
        self.instances.get(handle.0)
    }

    /// Copy of an instance's current parameters.
    pub fn parameters(&self, handle: MaterialHandle) -> Option<EffectParameters> {
        self.get(handle).map(MaterialInstance::parameters)
    }

    /// Live parameter storage of an instance.
    pub fn parameter_block(
        &self,
        handle: MaterialHandle,
    ) -> Result<&ParameterBlock, GraphicsError> {
        self.get(handle)
            .map(MaterialInstance::parameter_block)
            .ok_or_else(|| GraphicsError::InvalidHandle(handle.to_string()))
    }

    pub fn contains(&self, handle: MaterialHandle) -> bool {
        self.instances.contains(handle.0)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Destroy every instance.
    pub fn clear(&mut self, ctx: &RenderContext) {
        for handle in std::mem::take(&mut self.order) {
            if let Some(instance) = self.instances.remove(handle.0) {
                instance.release(ctx);
            }
        }
        self.by_template.clear();
    }
}

impl fmt::Debug for MaterialInstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialInstanceRegistry")
            .field("instances", &self.instances.len())
            .field("templates", &self.by_template.len())
            .finish()
    }
}
