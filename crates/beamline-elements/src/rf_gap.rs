//! Thin RF accelerating gap.
//!
//! The gap is a zero-length element: the whole energy gain
//! q·ETL·cos φ lands on its single evaluation, together with the
//! standard thin-gap transverse defocusing and longitudinal focusing
//! kicks. Amplitude and phase are synchronized properties.

use beamline_core::{Probe, LIGHT_SPEED};
use beamline_math::PhaseMatrix;

/// Physical parameters of an RF gap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RfGapParams {
    /// Effective gap voltage E0·T·L, V.
    pub etl: f64,
    /// Synchronous phase, rad.
    pub phase: f64,
    /// RF frequency, Hz.
    pub frequency: f64,
}

impl RfGapParams {
    /// RF wavelength λ = c / f, m.
    pub fn wavelength(&self) -> f64 {
        LIGHT_SPEED / self.frequency
    }
}

/// Kinetic-energy gain across the gap, eV.
pub(crate) fn energy_gain(params: &RfGapParams, probe: &Probe) -> f64 {
    probe.charge * params.etl * params.phase.cos()
}

/// Thin-gap transverse focal constant, 1/m.
///
/// kₜ = −π·q·ETL·sin φ / (E_rest·β²·γ³·λ); positive (an outward kick
/// Δx′ = kₜ·x) at the usual negative synchronous phase.
fn transverse_constant(params: &RfGapParams, probe: &Probe) -> f64 {
    let beta = probe.beta();
    let gamma = probe.gamma();
    -std::f64::consts::PI * probe.charge * params.etl * params.phase.sin()
        / (probe.rest_energy * beta * beta * gamma.powi(3) * params.wavelength())
}

/// Thin-gap map: identity plus transverse and longitudinal focal
/// kicks. `sub_length` is ignored beyond validation — the element is
/// thin.
pub(crate) fn map(params: &RfGapParams, probe: &Probe) -> PhaseMatrix {
    let kt = transverse_constant(params, probe);
    let kz = -2.0 * probe.gamma().powi(2) * kt;
    let mut m = PhaseMatrix::identity();
    m.set(1, 0, kt);
    m.set(3, 2, kt);
    m.set(5, 4, kz);
    m
}
