//! Widget surfaces and the catalog that resolves them

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Fully-qualified name of a widget provider, e.g. `com.example.MyAppWidget`
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceDescriptor(String);

impl SurfaceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceDescriptor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SurfaceDescriptor {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for SurfaceDescriptor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SurfaceDescriptor {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of one live widget instance on the home screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub i32);

/// Code that redraws the instances of one surface when a refresh arrives
pub trait WidgetProvider: Send + Sync {
    fn on_update(&self, ids: &[WidgetId]);
}

impl<F> WidgetProvider for F
where
    F: Fn(&[WidgetId]) + Send + Sync,
{
    fn on_update(&self, ids: &[WidgetId]) {
        self(ids)
    }
}

/// Provider for surfaces the platform renders on its own
struct PlatformRendered;

impl WidgetProvider for PlatformRendered {
    fn on_update(&self, _ids: &[WidgetId]) {}
}

/// A descriptor resolved against the catalog
#[derive(Clone)]
pub struct SurfaceType {
    descriptor: SurfaceDescriptor,
    provider: Arc<dyn WidgetProvider>,
}

impl SurfaceType {
    pub fn descriptor(&self) -> &SurfaceDescriptor {
        &self.descriptor
    }

    pub fn provider(&self) -> &dyn WidgetProvider {
        self.provider.as_ref()
    }
}

impl fmt::Debug for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceType")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Widget surface not found: {0}")]
    UnknownSurface(SurfaceDescriptor),
}

/// Every widget surface the app ships, keyed by descriptor.
///
/// Built once at startup; resolution is a plain lookup.
#[derive(Clone, Default)]
pub struct SurfaceCatalog {
    surfaces: HashMap<SurfaceDescriptor, SurfaceType>,
}

impl SurfaceCatalog {
    pub fn builder() -> SurfaceCatalogBuilder {
        SurfaceCatalogBuilder::default()
    }

    pub fn resolve(&self, descriptor: &str) -> Result<SurfaceType, ResolveError> {
        self.surfaces
            .get(descriptor)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownSurface(SurfaceDescriptor::new(descriptor)))
    }

    /// Known descriptors, sorted
    pub fn descriptors(&self) -> Vec<&SurfaceDescriptor> {
        let mut descriptors: Vec<_> = self.surfaces.keys().collect();
        descriptors.sort();
        descriptors
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl fmt::Debug for SurfaceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.descriptors()).finish()
    }
}

#[derive(Default)]
pub struct SurfaceCatalogBuilder {
    surfaces: HashMap<SurfaceDescriptor, SurfaceType>,
}

impl SurfaceCatalogBuilder {
    /// Register a surface with the provider that redraws it.
    ///
    /// Registering the same descriptor again replaces its provider.
    pub fn register<P>(mut self, descriptor: impl Into<SurfaceDescriptor>, provider: P) -> Self
    where
        P: WidgetProvider + 'static,
    {
        let descriptor = descriptor.into();
        self.surfaces.insert(
            descriptor.clone(),
            SurfaceType {
                descriptor,
                provider: Arc::new(provider),
            },
        );
        self
    }

    /// Register a surface the platform renders without in-process code
    pub fn register_kind(self, descriptor: impl Into<SurfaceDescriptor>) -> Self {
        self.register(descriptor, PlatformRendered)
    }

    pub fn build(self) -> SurfaceCatalog {
        SurfaceCatalog {
            surfaces: self.surfaces,
        }
    }
}
