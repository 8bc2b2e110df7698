//! Test utilities and mock types for beamline development.
//!
//! Provides a scriptable [`MockChannelSource`] implementing
//! [`ChannelSource`] plus probe and hardware-node fixtures shared by
//! the integration tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;

use beamline_core::{keys, BendGeometry, DeviceKind, HardwareNode, Probe};
use beamline_sync::{ChannelHandle, ChannelSource};
use crossbeam_channel::{unbounded, Receiver};

/// Mock control system backed by a scripted value table.
///
/// Pre-populate channels with [`set`](MockChannelSource::set) before
/// passing to code under test. Replies to a request arrive immediately
/// and the reply channel hangs up afterwards, so batch reads never sit
/// out their timeout in tests. Channels placed in the holdback set via
/// [`hold_back`](MockChannelSource::hold_back) are never answered even
/// when a value is scripted, which simulates a device that stopped
/// responding.
pub struct MockChannelSource {
    values: Vec<(ChannelHandle, f64)>,
    held: HashSet<ChannelHandle>,
}

impl MockChannelSource {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            held: HashSet::new(),
        }
    }

    /// Script a value for one channel.
    pub fn set(&mut self, handle: ChannelHandle, value: f64) -> &mut Self {
        self.values.push((handle, value));
        self
    }

    /// Stop answering one channel.
    pub fn hold_back(&mut self, handle: ChannelHandle) -> &mut Self {
        self.held.insert(handle);
        self
    }
}

impl Default for MockChannelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSource for MockChannelSource {
    fn request(&self, handles: &[ChannelHandle]) -> Receiver<(ChannelHandle, f64)> {
        let (tx, rx) = unbounded();
        for (handle, value) in &self.values {
            if handles.contains(handle) && !self.held.contains(handle) {
                // The receiver outlives us; a send failure means the
                // test dropped it early, which is fine.
                let _ = tx.send((handle.clone(), *value));
            }
        }
        rx
    }
}

/// A 2.5 MeV proton probe at position 0, the standard low-energy
/// transport fixture.
pub fn proton_probe() -> Probe {
    Probe::new(1.0, 938.272e6, 2.5e6)
}

/// A quadrupole hardware node with the given design gradient (T/m).
pub fn quad_node(id: &str, gradient: f64) -> HardwareNode {
    HardwareNode::new(id, DeviceKind::QuadMagnet).with_design(keys::FIELD, gradient)
}

/// An RF cavity node with design amplitude (V), phase (rad), and
/// frequency (Hz).
pub fn cavity_node(id: &str, amplitude: f64, phase: f64, frequency: f64) -> HardwareNode {
    HardwareNode::new(id, DeviceKind::RfCavity)
        .with_design(keys::AMPLITUDE, amplitude)
        .with_design(keys::PHASE, phase)
        .with_design(keys::FREQUENCY, frequency)
}

/// A 90° sector bend node with flat pole faces and no gradient error.
pub fn bend_node(id: &str, field: f64, path_length: f64) -> HardwareNode {
    HardwareNode::new(id, DeviceKind::BendMagnet)
        .with_design(keys::FIELD, field)
        .with_bend(BendGeometry {
            design_field: field,
            design_path_length: path_length,
            design_bend_angle_deg: 90.0,
            entrance_angle_deg: 0.0,
            exit_angle_deg: 0.0,
            quad_component: 0.0,
        })
}
