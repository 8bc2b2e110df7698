//! Normal and skew quadrupoles.

use beamline_core::{Orientation, Probe};
use beamline_math::PhaseMatrix;

use crate::magnetic_scale;

/// Physical parameters of a quadrupole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadParams {
    /// Field gradient, T/m. Sign selects the focusing plane together
    /// with the probe charge.
    pub field: f64,
    /// Focusing-plane orientation resolved from the hardware node.
    /// `Unknown` elements behave as horizontal.
    pub orientation: Orientation,
}

/// 2×2 transverse block for focusing strength `k2` (1/m²) over `s`.
///
/// `k2 > 0` focuses (trigonometric), `k2 < 0` defocuses (hyperbolic),
/// and the `k2 → 0` limit is a drift.
pub(crate) fn focusing_block(k2: f64, s: f64) -> [[f64; 2]; 2] {
    const K2_MIN: f64 = 1e-14;
    if k2 > K2_MIN {
        let k = k2.sqrt();
        let (sin, cos) = (k * s).sin_cos();
        [[cos, sin / k], [-k * sin, cos]]
    } else if k2 < -K2_MIN {
        let k = (-k2).sqrt();
        let (sinh, cosh) = ((k * s).sinh(), (k * s).cosh());
        [[cosh, sinh / k], [k * sinh, cosh]]
    } else {
        [[1.0, s], [0.0, 1.0]]
    }
}

/// Ideal quadrupole map over `sub_length`.
///
/// Focusing strength k² = q·c·G / (βγ·E_rest). A horizontal (or
/// unoriented) quad with k² > 0 focuses in x and defocuses in y; a
/// vertical quad swaps the planes.
pub(crate) fn map(params: &QuadParams, probe: &Probe, sub_length: f64) -> PhaseMatrix {
    let k2 = magnetic_scale(probe) * params.field;
    let (kx2, ky2) = match params.orientation {
        Orientation::Horizontal | Orientation::Unknown => (k2, -k2),
        Orientation::Vertical => (-k2, k2),
    };

    let mut m = PhaseMatrix::identity();
    m.set_block2(0, 0, focusing_block(kx2, sub_length));
    m.set_block2(2, 2, focusing_block(ky2, sub_length));
    m.set(4, 5, sub_length);
    m
}

/// Skew quadrupole: the normal quad map conjugated by a 45° rotation
/// of the transverse plane.
pub(crate) fn skew_map(params: &QuadParams, probe: &Probe, sub_length: f64) -> PhaseMatrix {
    map(params, probe, sub_length).conjugate(&PhaseMatrix::rotation_z(std::f64::consts::FRAC_PI_4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn probe() -> Probe {
        Probe::new(1.0, 938.272e6, 2.5e6)
    }

    #[test]
    fn focusing_block_reduces_to_drift_at_zero_strength() {
        assert_eq!(focusing_block(0.0, 1.5), [[1.0, 1.5], [0.0, 1.0]]);
    }

    #[test]
    fn focusing_blocks_have_unit_determinant() {
        for k2 in [-4.0, -0.3, 0.0, 0.3, 4.0] {
            let b = focusing_block(k2, 0.7);
            let det = b[0][0] * b[1][1] - b[0][1] * b[1][0];
            assert_abs_diff_eq!(det, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn horizontal_quad_focuses_x_and_defocuses_y() {
        let params = QuadParams {
            field: 5.0,
            orientation: Orientation::Horizontal,
        };
        let m = map(&params, &probe(), 0.4);
        // Focusing: cos < 1 and negative lower-left entry.
        assert!(m.get(0, 0) < 1.0);
        assert!(m.get(1, 0) < 0.0);
        // Defocusing: cosh > 1 and positive lower-left entry.
        assert!(m.get(2, 2) > 1.0);
        assert!(m.get(3, 2) > 0.0);
    }

    #[test]
    fn vertical_quad_swaps_the_planes() {
        let h = QuadParams {
            field: 5.0,
            orientation: Orientation::Horizontal,
        };
        let v = QuadParams {
            field: 5.0,
            orientation: Orientation::Vertical,
        };
        let mh = map(&h, &probe(), 0.4);
        let mv = map(&v, &probe(), 0.4);
        assert_abs_diff_eq!(mh.get(0, 0), mv.get(2, 2), epsilon = 1e-12);
        assert_abs_diff_eq!(mh.get(2, 2), mv.get(0, 0), epsilon = 1e-12);
    }

    #[test]
    fn skew_map_couples_the_transverse_planes() {
        let params = QuadParams {
            field: 5.0,
            orientation: Orientation::Horizontal,
        };
        let m = skew_map(&params, &probe(), 0.4);
        assert!(m.get(0, 2).abs() > 0.0);
        assert!(m.is_homogeneous());
    }

    #[test]
    fn unoriented_quad_behaves_as_horizontal() {
        let h = QuadParams {
            field: 3.0,
            orientation: Orientation::Horizontal,
        };
        let u = QuadParams {
            field: 3.0,
            orientation: Orientation::Unknown,
        };
        assert_eq!(map(&h, &probe(), 0.25), map(&u, &probe(), 0.25));
    }
}
