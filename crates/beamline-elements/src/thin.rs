//! Thin and force-free elements: markers, steering correctors, and
//! the deliberately zero-force sextupole.

use beamline_core::{Orientation, Probe};
use beamline_math::PhaseMatrix;

use crate::magnetic_scale;

/// Physical parameters of a thin steering corrector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrectorParams {
    /// Integrated dipole field B·L, T·m.
    pub field: f64,
    /// Kick plane. `Unknown` behaves as horizontal.
    pub orientation: Orientation,
}

/// Thin steering kick: a pure momentum offset in the corrector's
/// plane, encoded in the affine column.
pub(crate) fn corrector_map(params: &CorrectorParams, probe: &Probe) -> PhaseMatrix {
    let kick = magnetic_scale(probe) * params.field;
    match params.orientation {
        Orientation::Horizontal | Orientation::Unknown => {
            PhaseMatrix::translation([0.0, kick, 0.0, 0.0, 0.0, 0.0])
        }
        Orientation::Vertical => PhaseMatrix::translation([0.0, 0.0, 0.0, kick, 0.0, 0.0]),
    }
}

/// Sextupoles are represented as zero-force elements: their map is
/// the drift over the sub-length.
pub(crate) fn sextupole_map(sub_length: f64) -> PhaseMatrix {
    crate::drift::map(sub_length)
}

/// Markers are zero-length identities.
pub(crate) fn marker_map() -> PhaseMatrix {
    PhaseMatrix::identity()
}
