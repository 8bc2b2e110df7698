//! The synchronization manager: mode, entries, model inputs, cache,
//! and resync orchestration.
//!
//! One manager instance owns its override table and property cache
//! exclusively. There is no internal locking — callers sharing a
//! manager across scenarios serialize their own resync calls; the
//! bounded batch read is the only blocking operation.

use std::time::Duration;

use beamline_core::{HardwareId, HardwareNode, NodeId, PropertyKey, SyncError};
use beamline_lattice::{Lattice, SyncRegistrar};
use indexmap::{IndexMap, IndexSet};
use tracing::info;

use crate::batch::{batch_read, BatchReport, ChannelHandle, ChannelSource, DEFAULT_TIMEOUT};
use crate::registry::{standard_registries, AccessorRegistry, SynchronizerRegistry};
use crate::SyncMode;

/// Handle to a registered model-input override; pass it back to
/// [`SynchronizationManager::remove_model_input`] to retire the
/// override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelInput {
    /// The overridden node.
    pub node: HardwareId,
    /// The overridden property.
    pub property: PropertyKey,
}

/// One element/hardware association.
#[derive(Clone, Debug)]
pub struct SyncEntry {
    /// Lattice node of the element.
    pub element: NodeId,
    /// Originating hardware node.
    pub hardware: HardwareId,
    /// Whether both a synchronizer and an accessor resolve for the
    /// node's kind. Non-resyncable entries are tracked for lookup
    /// only.
    pub resyncable: bool,
}

/// Outcome of one resync pass.
///
/// Synchronization errors are recoverable and reported per element;
/// the caller decides whether to skip, abort, or retry in another
/// mode. Partial I/O shows up in `io`, not in `errors`.
#[derive(Debug, Default)]
pub struct ResyncReport {
    /// Batch-read summary, when the pass performed I/O.
    pub io: Option<BatchReport>,
    /// Per-element synchronization failures.
    pub errors: Vec<SyncError>,
}

impl ResyncReport {
    /// Whether every element synchronized cleanly.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Registry-driven synchronization of lattice elements against
/// hardware, cache, or design values.
pub struct SynchronizationManager {
    mode: SyncMode,
    timeout: Duration,
    synchronizers: SynchronizerRegistry,
    accessors: AccessorRegistry,
    nodes: IndexMap<HardwareId, HardwareNode>,
    entries: Vec<SyncEntry>,
    overrides: IndexMap<(HardwareId, PropertyKey), f64>,
    cache: IndexMap<HardwareId, IndexMap<PropertyKey, f64>>,
}

impl SynchronizationManager {
    /// Create a manager with explicit registries.
    pub fn new(
        mode: SyncMode,
        synchronizers: SynchronizerRegistry,
        accessors: AccessorRegistry,
    ) -> Self {
        Self {
            mode,
            timeout: DEFAULT_TIMEOUT,
            synchronizers,
            accessors,
            nodes: IndexMap::new(),
            entries: Vec::new(),
            overrides: IndexMap::new(),
            cache: IndexMap::new(),
        }
    }

    /// Create a manager wired with the standard registries.
    pub fn standard(mode: SyncMode) -> Self {
        let (synchronizers, accessors) = standard_registries();
        Self::new(mode, synchronizers, accessors)
    }

    /// The manager's synchronization mode.
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Adjust the batch-read timeout budget.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// The registered element/hardware associations.
    pub fn entries(&self) -> &[SyncEntry] {
        &self.entries
    }

    /// Register a model-input override for (node, property). The
    /// override takes precedence over any live, cached, or design
    /// value until removed.
    pub fn set_model_input(
        &mut self,
        node: HardwareId,
        property: PropertyKey,
        value: f64,
    ) -> ModelInput {
        self.overrides.insert((node.clone(), property), value);
        ModelInput { node, property }
    }

    /// Remove a model-input override, returning its value if one was
    /// registered.
    pub fn remove_model_input(&mut self, node: &HardwareId, property: PropertyKey) -> Option<f64> {
        self.overrides.shift_remove(&(node.clone(), property))
    }

    /// Resynchronize every resyncable element from the mode's source
    /// tier, then apply model-input overrides.
    ///
    /// Live modes issue exactly one batched read for the union of all
    /// needed channels and cache each node's pre-override snapshot.
    /// Design mode performs no I/O and caches nothing.
    pub fn resync(&mut self, lattice: &mut Lattice, source: &dyn ChannelSource) -> ResyncReport {
        let mut report = ResyncReport::default();

        let raw = if self.mode.reads_hardware() {
            let mut union: IndexSet<ChannelHandle> = IndexSet::new();
            for entry in self.entries.iter().filter(|e| e.resyncable) {
                if let Some(node) = self.nodes.get(&entry.hardware) {
                    if let Some(accessor) = self.accessors.resolve(node.kind) {
                        union.extend(accessor.channels(node, self.mode));
                    }
                }
            }
            let handles: Vec<ChannelHandle> = union.into_iter().collect();
            let (raw, io) = batch_read(source, &handles, self.timeout);
            info!(
                requested = io.requested,
                resolved = io.resolved,
                "hardware resync batch"
            );
            report.io = Some(io);
            raw
        } else {
            IndexMap::new()
        };

        for idx in 0..self.entries.len() {
            let entry = self.entries[idx].clone();
            if !entry.resyncable {
                continue;
            }
            let Some(node) = self.nodes.get(&entry.hardware) else {
                continue;
            };
            let Some(accessor) = self.accessors.resolve(node.kind) else {
                continue;
            };
            let mut values = accessor.resolve(node, &raw, self.mode);
            if self.mode.reads_hardware() {
                self.cache.insert(entry.hardware.clone(), values.clone());
            }
            self.apply_overrides(&entry.hardware, &mut values);
            self.synchronize_entry(lattice, &entry, &values, &mut report);
        }
        report
    }

    /// Re-apply the override step against the last cached snapshots,
    /// with no I/O.
    ///
    /// Useful for exploring model-input changes without touching
    /// hardware. Entries whose node has no snapshot resolve an empty
    /// base map, so their required properties surface as
    /// synchronization errors unless overridden.
    pub fn resync_from_cache(&mut self, lattice: &mut Lattice) -> ResyncReport {
        let mut report = ResyncReport::default();
        for idx in 0..self.entries.len() {
            let entry = self.entries[idx].clone();
            if !entry.resyncable {
                continue;
            }
            let mut values = self.cache.get(&entry.hardware).cloned().unwrap_or_default();
            self.apply_overrides(&entry.hardware, &mut values);
            self.synchronize_entry(lattice, &entry, &values, &mut report);
        }
        report
    }

    /// Verify, without mutating anything, that every resyncable
    /// element holds its expected values: the cached snapshot when one
    /// exists, the design resolution otherwise, with overrides on top.
    pub fn check_synchronization(&self, lattice: &Lattice) -> Vec<SyncError> {
        let mut errors = Vec::new();
        for entry in self.entries.iter().filter(|e| e.resyncable) {
            let Some(node) = self.nodes.get(&entry.hardware) else {
                continue;
            };
            let Some(synchronizer) = self.synchronizers.resolve(node.kind) else {
                continue;
            };
            let Some(element) = lattice.element(entry.element) else {
                continue;
            };
            let Ok(values) = self.properties_for_node(&entry.hardware) else {
                continue;
            };
            if let Err(err) = synchronizer.check(element, &values) {
                errors.push(err);
            }
        }
        errors
    }

    /// Diagnostic value map for one node: the cached snapshot (or
    /// design resolution when nothing is cached) with overrides
    /// applied. Mutates no element.
    pub fn properties_for_node(
        &self,
        node_id: &HardwareId,
    ) -> Result<IndexMap<PropertyKey, f64>, SyncError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| SyncError::UnknownNode {
                node: node_id.clone(),
            })?;
        let accessor =
            self.accessors
                .resolve(node.kind)
                .ok_or_else(|| SyncError::NoAccessor {
                    node: node_id.clone(),
                    kind: node.kind,
                })?;
        let mut values = match self.cache.get(node_id) {
            Some(snapshot) => snapshot.clone(),
            None => accessor.resolve(node, &IndexMap::new(), SyncMode::Design),
        };
        self.apply_overrides(node_id, &mut values);
        Ok(values)
    }

    fn apply_overrides(&self, node: &HardwareId, values: &mut IndexMap<PropertyKey, f64>) {
        for ((n, property), value) in &self.overrides {
            if n == node {
                values.insert(property, *value);
            }
        }
    }

    fn synchronize_entry(
        &self,
        lattice: &mut Lattice,
        entry: &SyncEntry,
        values: &IndexMap<PropertyKey, f64>,
        report: &mut ResyncReport,
    ) {
        let Some(node) = self.nodes.get(&entry.hardware) else {
            return;
        };
        let Some(synchronizer) = self.synchronizers.resolve(node.kind) else {
            return;
        };
        let Some(element) = lattice.element_mut(entry.element) else {
            return;
        };
        if let Err(err) = synchronizer.resync(element, values) {
            report.errors.push(err);
        }
    }
}

impl SyncRegistrar for SynchronizationManager {
    fn register(&mut self, element: NodeId, node: &HardwareNode) {
        let resyncable = self.synchronizers.resolve(node.kind).is_some()
            && self.accessors.resolve(node.kind).is_some();
        self.nodes.insert(node.id.clone(), node.clone());
        self.entries.push(SyncEntry {
            element,
            hardware: node.id.clone(),
            resyncable,
        });
    }
}
