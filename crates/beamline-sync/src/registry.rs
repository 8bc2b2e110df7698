//! Build-once registries mapping device kinds to synchronizers and
//! property accessors.
//!
//! Lookup walks the kind's supertag chain, so one handler registered
//! for a family tag serves the whole family unless a more specific
//! registration shadows it. Registries are assembled before the
//! manager exists and are not mutable afterward.

use beamline_core::DeviceKind;
use indexmap::IndexMap;

use crate::accessor::{
    ElectromagnetAccessor, PermanentQuadAccessor, PropertyAccessor, RfCavityAccessor,
};
use crate::synchronizer::{
    ElectromagnetSynchronizer, PermanentQuadSynchronizer, RfCavitySynchronizer, Synchronizer,
};

/// Registry of synchronizers keyed by device kind.
pub struct SynchronizerRegistry {
    table: IndexMap<DeviceKind, Box<dyn Synchronizer>>,
}

impl SynchronizerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            table: IndexMap::new(),
        }
    }

    /// Register a synchronizer for `kind` (and, via supertag lookup,
    /// every kind that resolves to it).
    pub fn with(mut self, kind: DeviceKind, synchronizer: Box<dyn Synchronizer>) -> Self {
        self.table.insert(kind, synchronizer);
        self
    }

    /// Resolve the synchronizer serving `kind`, walking its supertag
    /// chain.
    pub fn resolve(&self, kind: DeviceKind) -> Option<&dyn Synchronizer> {
        kind.resolution_chain()
            .find_map(|k| self.table.get(&k))
            .map(Box::as_ref)
    }
}

impl Default for SynchronizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of property accessors keyed by device kind.
pub struct AccessorRegistry {
    table: IndexMap<DeviceKind, Box<dyn PropertyAccessor>>,
}

impl AccessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            table: IndexMap::new(),
        }
    }

    /// Register an accessor for `kind` and its resolvable subtypes.
    pub fn with(mut self, kind: DeviceKind, accessor: Box<dyn PropertyAccessor>) -> Self {
        self.table.insert(kind, accessor);
        self
    }

    /// Resolve the accessor serving `kind`.
    pub fn resolve(&self, kind: DeviceKind) -> Option<&dyn PropertyAccessor> {
        kind.resolution_chain()
            .find_map(|k| self.table.get(&k))
            .map(Box::as_ref)
    }
}

impl Default for AccessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard wiring: electromagnets (and their whole subtype
/// family), permanent-magnet quadrupoles, and RF cavities. Diagnostics
/// stay unregistered — tracked structurally, never resynchronized.
pub fn standard_registries() -> (SynchronizerRegistry, AccessorRegistry) {
    let synchronizers = SynchronizerRegistry::new()
        .with(DeviceKind::Electromagnet, Box::new(ElectromagnetSynchronizer))
        .with(DeviceKind::PermanentQuad, Box::new(PermanentQuadSynchronizer))
        .with(DeviceKind::RfCavity, Box::new(RfCavitySynchronizer));
    let accessors = AccessorRegistry::new()
        .with(DeviceKind::Electromagnet, Box::new(ElectromagnetAccessor))
        .with(DeviceKind::PermanentQuad, Box::new(PermanentQuadAccessor))
        .with(DeviceKind::RfCavity, Box::new(RfCavityAccessor));
    (synchronizers, accessors)
}
