//! The platform widget subsystem, seen from the bridge

use crate::surface::{SurfaceDescriptor, SurfaceType, WidgetId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("{0}")]
    Failed(String),
    #[error("pinning widgets is not supported")]
    PinUnsupported,
}

/// A refresh signal delivered to the instances of one surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RefreshBroadcast {
    pub surface: SurfaceDescriptor,
    pub ids: Vec<WidgetId>,
}

/// Runs once the user accepts a pin prompt: refreshes the pinned surface
#[derive(Clone, Debug)]
pub struct PinCallback {
    surface: SurfaceType,
}

impl PinCallback {
    pub fn refresh(surface: SurfaceType) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &SurfaceType {
        &self.surface
    }
}

/// Platform widget subsystem.
///
/// Calls are synchronous and may take as long as the platform needs; the
/// bridge neither times them out nor retries them.
pub trait WidgetHost: Send + Sync {
    /// Platform API level, compared against the pin-flow minimum
    fn api_level(&self) -> u32;

    /// Live instances of a surface on the home screen
    fn instance_ids(&self, surface: &SurfaceType) -> Result<Vec<WidgetId>, HostError>;

    /// Ask the platform to redraw the given instances
    fn broadcast(&self, surface: &SurfaceType, ids: &[WidgetId]) -> Result<(), HostError>;

    fn is_request_pin_supported(&self) -> bool;

    /// Prompt the user to add `surface` to the home screen
    fn request_pin(
        &self,
        surface: &SurfaceType,
        on_success: Option<PinCallback>,
    ) -> Result<(), HostError>;
}

#[derive(Debug, Default)]
struct LocalState {
    instances: HashMap<SurfaceDescriptor, Vec<WidgetId>>,
    next_id: i32,
    broadcasts: Vec<RefreshBroadcast>,
    pin_requests: Vec<SurfaceDescriptor>,
    failing: HashSet<SurfaceDescriptor>,
}

/// In-process widget host.
///
/// Keeps instances in memory and delivers refreshes straight to the
/// surface's [`WidgetProvider`](crate::WidgetProvider). Pin requests are
/// accepted immediately and add a new instance.
#[derive(Debug)]
pub struct LocalWidgetHost {
    api_level: u32,
    pin_supported: bool,
    state: Mutex<LocalState>,
}

impl Default for LocalWidgetHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalWidgetHost {
    pub const DEFAULT_API_LEVEL: u32 = 34;

    pub fn new() -> Self {
        Self {
            api_level: Self::DEFAULT_API_LEVEL,
            pin_supported: true,
            state: Mutex::new(LocalState {
                next_id: 1,
                ..LocalState::default()
            }),
        }
    }

    pub fn with_api_level(mut self, api_level: u32) -> Self {
        self.api_level = api_level;
        self
    }

    pub fn with_pin_support(mut self, supported: bool) -> Self {
        self.pin_supported = supported;
        self
    }

    fn lock(&self) -> MutexGuard<'_, LocalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a new instance of `descriptor` on the home screen
    pub fn add_instance(&self, descriptor: impl Into<SurfaceDescriptor>) -> WidgetId {
        let mut state = self.lock();
        let id = WidgetId(state.next_id);
        state.next_id += 1;
        state.instances.entry(descriptor.into()).or_default().push(id);
        id
    }

    /// Take an instance off the home screen. Returns whether it existed.
    pub fn remove_instance(&self, id: WidgetId) -> bool {
        let mut state = self.lock();
        let mut removed = false;
        for ids in state.instances.values_mut() {
            let before = ids.len();
            ids.retain(|existing| *existing != id);
            removed |= ids.len() != before;
        }
        removed
    }

    /// Make every platform call for `descriptor` fail
    pub fn fail_surface(&self, descriptor: impl Into<SurfaceDescriptor>) {
        self.lock().failing.insert(descriptor.into());
    }

    /// Broadcasts delivered so far, oldest first
    pub fn broadcasts(&self) -> Vec<RefreshBroadcast> {
        self.lock().broadcasts.clone()
    }

    /// Surfaces the user was prompted to pin, oldest first
    pub fn pin_requests(&self) -> Vec<SurfaceDescriptor> {
        self.lock().pin_requests.clone()
    }

    fn check(&self, state: &LocalState, surface: &SurfaceType) -> Result<(), HostError> {
        if state.failing.contains(surface.descriptor()) {
            return Err(HostError::Failed(format!(
                "widget host rejected {}",
                surface.descriptor()
            )));
        }
        Ok(())
    }
}

impl WidgetHost for LocalWidgetHost {
    fn api_level(&self) -> u32 {
        self.api_level
    }

    fn instance_ids(&self, surface: &SurfaceType) -> Result<Vec<WidgetId>, HostError> {
        let state = self.lock();
        self.check(&state, surface)?;
        Ok(state
            .instances
            .get(surface.descriptor())
            .cloned()
            .unwrap_or_default())
    }

    fn broadcast(&self, surface: &SurfaceType, ids: &[WidgetId]) -> Result<(), HostError> {
        {
            let mut state = self.lock();
            self.check(&state, surface)?;
            state.broadcasts.push(RefreshBroadcast {
                surface: surface.descriptor().clone(),
                ids: ids.to_vec(),
            });
        }
        surface.provider().on_update(ids);
        Ok(())
    }

    fn is_request_pin_supported(&self) -> bool {
        self.pin_supported
    }

    fn request_pin(
        &self,
        surface: &SurfaceType,
        on_success: Option<PinCallback>,
    ) -> Result<(), HostError> {
        if !self.pin_supported {
            return Err(HostError::PinUnsupported);
        }
        {
            let mut state = self.lock();
            self.check(&state, surface)?;
            state.pin_requests.push(surface.descriptor().clone());
        }

        let id = self.add_instance(surface.descriptor().clone());
        if let Some(callback) = on_success {
            self.broadcast(callback.surface(), &[id])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceCatalog;
    use pretty_assertions::assert_eq;

    fn clock() -> SurfaceType {
        SurfaceCatalog::builder()
            .register_kind("com.example.Clock")
            .build()
            .resolve("com.example.Clock")
            .unwrap()
    }

    #[test]
    fn instances_are_tracked_per_surface() {
        let host = LocalWidgetHost::new();
        let a = host.add_instance("com.example.Clock");
        let b = host.add_instance("com.example.Clock");
        host.add_instance("com.example.Other");

        assert_eq!(host.instance_ids(&clock()).unwrap(), vec![a, b]);
        assert!(host.remove_instance(a));
        assert!(!host.remove_instance(a));
        assert_eq!(host.instance_ids(&clock()).unwrap(), vec![b]);
    }

    #[test]
    fn accepted_pin_adds_an_instance_and_runs_the_callback() {
        let host = LocalWidgetHost::new();
        let surface = clock();

        host.request_pin(&surface, Some(PinCallback::refresh(surface.clone())))
            .unwrap();

        let ids = host.instance_ids(&surface).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(host.pin_requests(), vec![SurfaceDescriptor::from("com.example.Clock")]);
        assert_eq!(
            host.broadcasts(),
            vec![RefreshBroadcast {
                surface: "com.example.Clock".into(),
                ids,
            }]
        );
    }

    #[test]
    fn failing_surface_rejects_calls() {
        let host = LocalWidgetHost::new();
        host.fail_surface("com.example.Clock");

        assert!(matches!(host.instance_ids(&clock()), Err(HostError::Failed(_))));
        assert!(host.broadcast(&clock(), &[WidgetId(1)]).is_err());
        assert!(host.broadcasts().is_empty());
    }
}
