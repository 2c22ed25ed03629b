//! The set of widget surfaces the app currently manages

use crate::surface::SurfaceDescriptor;
use serde_json::Value;

/// Whether any surface is registered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryState {
    Empty,
    Populated,
}

/// Ordered list of registered surface descriptors.
///
/// Starts empty and is only ever replaced as a whole. Nothing is persisted:
/// the host registers its surfaces again on every launch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceRegistry {
    descriptors: Vec<SurfaceDescriptor>,
}

impl SurfaceRegistry {
    pub fn new<I, D>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<SurfaceDescriptor>,
    {
        Self {
            descriptors: descriptors.into_iter().map(Into::into).collect(),
        }
    }

    /// Keep only the string entries of a raw JSON list, in order
    pub fn descriptors_from_values(values: &[Value]) -> Vec<SurfaceDescriptor> {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(SurfaceDescriptor::from)
            .collect()
    }

    /// Swap in a new set, returning the previous one
    pub fn replace(&mut self, descriptors: Vec<SurfaceDescriptor>) -> Vec<SurfaceDescriptor> {
        std::mem::replace(&mut self.descriptors, descriptors)
    }

    pub fn descriptors(&self) -> &[SurfaceDescriptor] {
        &self.descriptors
    }

    pub fn first(&self) -> Option<&SurfaceDescriptor> {
        self.descriptors.first()
    }

    pub fn contains(&self, descriptor: &str) -> bool {
        self.descriptors.iter().any(|d| d.as_str() == descriptor)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn state(&self) -> RegistryState {
        if self.descriptors.is_empty() {
            RegistryState::Empty
        } else {
            RegistryState::Populated
        }
    }
}
