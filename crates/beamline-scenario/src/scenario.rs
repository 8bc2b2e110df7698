//! The scenario object and whole-lattice map composition.

use std::f64::consts::TAU;

use beamline_core::{
    GenerationError, HardwareId, HardwareNode, ModelError, NodeId, Probe, PropertyKey, SyncError,
};
use beamline_lattice::{ContainerKind, IntermediateElement, Lattice, LatticeGenerator};
use beamline_math::PhaseMatrix;
use beamline_sync::{
    ChannelSource, ModelInput, ResyncReport, SyncMode, SynchronizationManager,
};
use indexmap::IndexMap;
use tracing::debug;

/// Top-level model run: the generated lattice, its synchronization
/// manager, and the probe the maps are evaluated at.
///
/// The scenario exclusively owns all three; discarding it discards the
/// lattice and every cache the manager holds.
pub struct Scenario {
    lattice: Lattice,
    manager: SynchronizationManager,
    probe: Probe,
}

impl Scenario {
    /// Assemble a scenario from parts already built elsewhere.
    pub fn new(lattice: Lattice, manager: SynchronizationManager, probe: Probe) -> Self {
        Self {
            lattice,
            manager,
            probe,
        }
    }

    /// Generate a lattice from an intermediate-element stream and wire
    /// it to a standard-registry manager in the given mode.
    ///
    /// Every hardware-backed element is registered with the manager as
    /// it is constructed; the caller still triggers the first
    /// [`resync`](Scenario::resync) explicitly.
    pub fn generate(
        label: &str,
        kind: ContainerKind,
        stream: &[IntermediateElement],
        nodes: &IndexMap<HardwareId, HardwareNode>,
        mode: SyncMode,
        probe: Probe,
    ) -> Result<Self, GenerationError> {
        let mut manager = SynchronizationManager::standard(mode);
        let lattice = LatticeGenerator::new(nodes).generate(label, kind, stream, &mut manager)?;
        Ok(Self::new(lattice, manager, probe))
    }

    /// Read-only view of the lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// The scenario probe.
    pub fn probe(&self) -> Probe {
        self.probe
    }

    /// Replace the scenario probe.
    pub fn set_probe(&mut self, probe: Probe) {
        self.probe = probe;
    }

    /// Resynchronize every element from the manager's mode tier.
    pub fn resync(&mut self, source: &dyn ChannelSource) -> ResyncReport {
        self.manager.resync(&mut self.lattice, source)
    }

    /// Re-apply overrides against the last cached snapshots, no I/O.
    pub fn resync_from_cache(&mut self) -> ResyncReport {
        self.manager.resync_from_cache(&mut self.lattice)
    }

    /// Verify element values against their expected tier without
    /// mutating anything.
    pub fn check_synchronization(&self) -> Vec<SyncError> {
        self.manager.check_synchronization(&self.lattice)
    }

    /// Register a model-input override; takes effect on the next
    /// resync.
    pub fn set_model_input(
        &mut self,
        node: HardwareId,
        property: PropertyKey,
        value: f64,
    ) -> ModelInput {
        self.manager.set_model_input(node, property, value)
    }

    /// Remove a model-input override.
    pub fn remove_model_input(&mut self, node: &HardwareId, property: PropertyKey) -> Option<f64> {
        self.manager.remove_model_input(node, property)
    }

    /// Diagnostic property map for one hardware node.
    pub fn properties_for_node(
        &self,
        node: &HardwareId,
    ) -> Result<IndexMap<PropertyKey, f64>, SyncError> {
        self.manager.properties_for_node(node)
    }

    /// Run a tracker over the lattice, advancing the scenario probe.
    pub fn track(&mut self, tracker: &mut dyn crate::Tracker) -> Result<(), ModelError> {
        let mut probe = self.probe;
        tracker.propagate(&self.lattice, &mut probe)?;
        self.probe = probe;
        Ok(())
    }

    /// Composite transfer map of the whole lattice, with no
    /// sub-slicing: each element contributes its full-length map with
    /// container and element misalignment folded in, and the working
    /// probe picks up each RF gap's energy gain before the next
    /// element is evaluated.
    pub fn full_map(&self) -> Result<PhaseMatrix, ModelError> {
        let mut probe = self.probe;
        let mut composite = PhaseMatrix::identity();
        let order = self.lattice.ordered_elements();
        for &id in &order {
            // ordered_elements only yields element nodes.
            let Some(element) = self.lattice.element(id) else {
                continue;
            };
            probe.position = element.start();
            let ancestor = self.lattice.composed_alignment(id);
            let map = element.transfer_map_aligned(&probe, element.length, &ancestor)?;
            composite = composite.then(&map);
            probe.kinetic_energy += element.energy_gain(&probe, element.length);
            probe.position = element.end();
        }
        debug!(elements = order.len(), "composed full-lattice map");
        Ok(composite)
    }

    /// RF phase advance of the probe across `sub_length` of the
    /// element at `id`: 2π·f·t for the nearest RF-bearing ancestor's
    /// frequency f, zero when no ancestor carries one.
    pub fn phase_advance(&self, id: NodeId, probe: &Probe, sub_length: f64) -> f64 {
        let Some(frequency) = self.lattice.rf_frequency_for(id) else {
            return 0.0;
        };
        let Some(element) = self.lattice.element(id) else {
            return 0.0;
        };
        TAU * frequency * element.elapsed_time(probe, sub_length)
    }
}
