//! Refresh dispatch over the registered surfaces

use crate::config::WidgetsConfig;
use crate::host::{HostError, PinCallback, WidgetHost};
use crate::registry::SurfaceRegistry;
use crate::surface::{ResolveError, SurfaceCatalog, SurfaceDescriptor, WidgetId};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use widget_bridge::{BridgeError, BridgeResult};

/// Marker returned by `getCurrentConfigurations`
pub const NOT_SUPPORTED: &str = "not supported";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Unresolved(#[from] ResolveError),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl From<ReloadError> for BridgeError {
    fn from(error: ReloadError) -> Self {
        match error {
            ReloadError::Unresolved(e) => BridgeError::not_found(e.to_string()),
            ReloadError::Host(e) => BridgeError::operation_failed(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A refresh went out to these instances
    Refreshed(Vec<WidgetId>),
    /// The surface has no live instances, nothing was sent
    NoInstances,
    Failed(ReloadError),
}

/// Result of reloading one registered descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorReload {
    pub descriptor: SurfaceDescriptor,
    pub outcome: ReloadOutcome,
}

/// Tracks the registered surfaces and sends refreshes to them.
///
/// The registry is owned here and only changes through
/// [`set_registered_widgets`](Self::set_registered_widgets).
pub struct RefreshDispatcher {
    host: Arc<dyn WidgetHost>,
    catalog: SurfaceCatalog,
    registry: SurfaceRegistry,
    config: WidgetsConfig,
}

impl fmt::Debug for RefreshDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshDispatcher")
            .field("catalog", &self.catalog)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RefreshDispatcher {
    pub fn new(
        host: Arc<dyn WidgetHost>,
        catalog: SurfaceCatalog,
        registry: SurfaceRegistry,
        config: WidgetsConfig,
    ) -> Self {
        Self {
            host,
            catalog,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &SurfaceCatalog {
        &self.catalog
    }

    /// Replace the registered surfaces in one step
    pub fn set_registered_widgets(&mut self, descriptors: Vec<SurfaceDescriptor>) {
        let count = descriptors.len();
        let previous = self.registry.replace(descriptors);
        tracing::info!(count, previous = previous.len(), "Registered widget surfaces");
    }

    /// Refresh every live instance of one surface
    fn refresh(&self, descriptor: &str) -> Result<Vec<WidgetId>, ReloadError> {
        let surface = self.catalog.resolve(descriptor)?;
        let ids = self.host.instance_ids(&surface)?;
        if !ids.is_empty() {
            self.host.broadcast(&surface, &ids)?;
            tracing::debug!(surface = %descriptor, instances = ids.len(), "Sent refresh broadcast");
        }
        Ok(ids)
    }

    /// Refresh every registered surface, in registration order.
    ///
    /// A failing descriptor is logged and skipped; the others still run.
    pub fn reload_all_timelines(&self) -> Vec<DescriptorReload> {
        self.registry
            .descriptors()
            .iter()
            .map(|descriptor| {
                let outcome = match self.refresh(descriptor.as_str()) {
                    Ok(ids) if ids.is_empty() => ReloadOutcome::NoInstances,
                    Ok(ids) => ReloadOutcome::Refreshed(ids),
                    Err(error) => {
                        tracing::warn!(surface = %descriptor, %error, "Skipping widget surface");
                        ReloadOutcome::Failed(error)
                    }
                };
                DescriptorReload {
                    descriptor: descriptor.clone(),
                    outcome,
                }
            })
            .collect()
    }

    /// Refresh one surface, registered or not
    pub fn reload_timelines(&self, kind: &str) -> BridgeResult<Vec<WidgetId>> {
        Ok(self.refresh(kind)?)
    }

    /// Per-instance configuration cannot be read back on this platform
    pub fn current_configurations(&self) -> &'static str {
        NOT_SUPPORTED
    }

    /// Prompt the user to pin the first registered surface
    pub fn request_widget(&self) -> BridgeResult<SurfaceDescriptor> {
        let api_level = self.host.api_level();
        if api_level < self.config.min_pin_api_level {
            return Err(BridgeError::UnsupportedPlatform(format!(
                "This feature requires API level {} or higher (running {}).",
                self.config.min_pin_api_level, api_level
            )));
        }

        let descriptor = self
            .registry
            .first()
            .ok_or_else(|| BridgeError::not_found("No registered widget provider"))?;

        let surface = self
            .catalog
            .resolve(descriptor.as_str())
            .map_err(BridgeError::operation_failed)?;

        if !self.host.is_request_pin_supported() {
            return Err(BridgeError::Unsupported("Pinning not supported".into()));
        }

        let callback = self
            .config
            .pin_success_callback
            .then(|| PinCallback::refresh(surface.clone()));
        self.host
            .request_pin(&surface, callback)
            .map_err(BridgeError::operation_failed)?;

        tracing::info!(surface = %descriptor, "Requested widget pin");
        Ok(descriptor.clone())
    }
}
