//! The propagation seam.

use beamline_core::{ModelError, Probe};
use beamline_lattice::Lattice;

/// A beam-dynamics tracker.
///
/// Propagation algorithms live outside the core; a tracker receives
/// the synchronized lattice and the probe and advances the probe
/// however it sees fit. Propagation through one lattice must be
/// sequential and strictly position-ordered — the first/last sub-slice
/// classification inside each element depends on it.
pub trait Tracker {
    /// Propagate `probe` through `lattice`.
    fn propagate(&mut self, lattice: &Lattice, probe: &mut Probe) -> Result<(), ModelError>;
}
