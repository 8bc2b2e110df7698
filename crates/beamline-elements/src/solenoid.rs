//! Solenoid magnet.
//!
//! The hard-edge solenoid decomposes into a thin entrance coupling
//! kick, a body map, and a thin exit decoupling kick. The body map is
//! the exponential of the interior equations of motion, so interior
//! sub-slices compose exactly; the end kicks carry the fringe physics
//! and are applied once each, on the first and last sub-slice.

use beamline_core::Probe;
use beamline_math::PhaseMatrix;

use crate::magnetic_scale;
use crate::slice::SliceSpan;

/// Physical parameters of a solenoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolenoidParams {
    /// Axial field, T.
    pub field: f64,
}

/// Larmor focusing constant k = q·c·B / (2·E_rest·β·γ), 1/m.
pub(crate) fn focusing_constant(params: &SolenoidParams, probe: &Probe) -> f64 {
    0.5 * magnetic_scale(probe) * params.field
}

/// Thin entrance kick: x′ += k·y, y′ −= k·x.
fn entrance(k: f64) -> PhaseMatrix {
    let mut m = PhaseMatrix::identity();
    m.set(1, 2, k);
    m.set(3, 0, -k);
    m
}

/// Thin exit kick: the inverse coupling, x′ −= k·y, y′ += k·x.
fn exit(k: f64) -> PhaseMatrix {
    entrance(-k)
}

/// Interior body map over `s`, with ψ = 2k·s.
fn body(k: f64, s: f64) -> PhaseMatrix {
    let mut m = PhaseMatrix::identity();
    m.set(4, 5, s);

    if k.abs() < 1e-14 {
        m.set(0, 1, s);
        m.set(2, 3, s);
        return m;
    }

    let psi = 2.0 * k * s;
    let (sin, cos) = psi.sin_cos();
    let a = sin / (2.0 * k);
    let b = (1.0 - cos) / (2.0 * k);

    m.set_block2(0, 0, [[1.0, a], [0.0, cos]]);
    m.set_block2(0, 2, [[0.0, b], [0.0, sin]]);
    m.set_block2(2, 0, [[0.0, -b], [0.0, -sin]]);
    m.set_block2(2, 2, [[1.0, a], [0.0, cos]]);
    m
}

/// Solenoid map over `sub_length`, with end kicks gated by the slice
/// position.
pub(crate) fn map(
    params: &SolenoidParams,
    probe: &Probe,
    sub_length: f64,
    span: SliceSpan,
) -> PhaseMatrix {
    let k = focusing_constant(params, probe);
    let mut m = body(k, sub_length);
    if span.first {
        m = entrance(k).then(&m);
    }
    if span.last {
        m = m.then(&exit(k));
    }
    m
}
