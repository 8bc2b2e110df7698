//! Field-free drift.

use beamline_math::PhaseMatrix;

/// Drift map over `len`: unit diagonal with x ← x + L·x′ in each of
/// the three planes. Independent of probe energy.
pub(crate) fn map(len: f64) -> PhaseMatrix {
    let mut m = PhaseMatrix::identity();
    m.set(0, 1, len);
    m.set(2, 3, len);
    m.set(4, 5, len);
    m
}
