//! Ideal bending dipole (sector bend with field index).
//!
//! The body map covers both transverse planes plus the dispersion
//! column and its symplectic-conjugate path-length row. Pole-face
//! rotations are thin wedge kicks, gated onto the first and last
//! sub-slice only — a hardware node split across several sections
//! carries each face's angle on the section that physically includes
//! that face.

use beamline_core::Probe;
use beamline_math::PhaseMatrix;

use crate::magnetic_scale;
use crate::quadrupole::focusing_block;
use crate::slice::SliceSpan;

/// Physical parameters of a bend section, resolved by the lattice
/// generator from the hardware node's design geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DipoleParams {
    /// Bending field, T.
    pub field: f64,
    /// Field index n = −(quad component)·R²; n ∈ (0, 1) focuses both
    /// planes.
    pub field_index: f64,
    /// Entrance pole-face rotation, rad; zero on sections not
    /// containing the entrance face.
    pub entrance_angle: f64,
    /// Exit pole-face rotation, rad; zero on sections not containing
    /// the exit face.
    pub exit_angle: f64,
}

/// Thin pole-face wedge with rotation angle `beta`: horizontally
/// focusing, vertically defocusing by h·tan β.
fn wedge(h: f64, beta: f64) -> PhaseMatrix {
    let mut m = PhaseMatrix::identity();
    let strength = h * beta.tan();
    m.set(1, 0, strength);
    m.set(3, 2, -strength);
    m
}

/// Dipole body over `s` with curvature `h` and field index `n`.
fn body(h: f64, n: f64, s: f64) -> PhaseMatrix {
    const K2_MIN: f64 = 1e-14;
    let kx2 = (1.0 - n) * h * h;
    let ky2 = n * h * h;

    let bx = focusing_block(kx2, s);
    let mut m = PhaseMatrix::identity();
    m.set_block2(0, 0, bx);
    m.set_block2(2, 2, focusing_block(ky2, s));

    // Dispersion column and its conjugate path-length row. The
    // uniform forms h·(1 − bx00)/kx² and h·bx01 cover the focusing,
    // defocusing, and straight cases alike.
    let (d16, d26, m45) = if kx2.abs() > K2_MIN {
        (
            h * (1.0 - bx[0][0]) / kx2,
            h * bx[0][1],
            s - h * h * (s - bx[0][1]) / kx2,
        )
    } else {
        (h * s * s / 2.0, h * s, s - h * h * s.powi(3) / 6.0)
    };
    m.set(0, 5, d16);
    m.set(1, 5, d26);
    m.set(4, 0, -d26);
    m.set(4, 1, -d16);
    m.set(4, 5, m45);
    m
}

/// Dipole map over `sub_length`, with pole-face wedges gated by the
/// slice position. Curvature h = q·c·B / (βγ·E_rest).
pub(crate) fn map(
    params: &DipoleParams,
    probe: &Probe,
    sub_length: f64,
    span: SliceSpan,
) -> PhaseMatrix {
    let h = magnetic_scale(probe) * params.field;
    let mut m = body(h, params.field_index, sub_length);
    if span.first && params.entrance_angle != 0.0 {
        m = wedge(h, params.entrance_angle).then(&m);
    }
    if span.last && params.exit_angle != 0.0 {
        m = m.then(&wedge(h, params.exit_angle));
    }
    m
}
