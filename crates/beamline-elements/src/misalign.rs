//! Rigid-body alignment errors and their injection into a transfer map.
//!
//! An element (or a whole container) may be displaced by (dx, dy, dz)
//! and rotated by small angles (pitch about x, yaw about y, roll about
//! z). Container errors propagate down to the elements they hold:
//! rotations compose additively and displacements add, in the
//! small-angle regime the model works in.

use beamline_math::{PhaseMatrix, R3};

/// Rigid-body alignment error of an element or container.
///
/// `displacement` holds (dx, dy, dz) in metres; `rotation` holds
/// (pitch φx, yaw φy, roll φz) in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Alignment {
    /// Lateral and longitudinal offsets (dx, dy, dz), m.
    pub displacement: R3,
    /// Small-angle rotations (pitch, yaw, roll), rad.
    pub rotation: R3,
}

impl Alignment {
    /// No error.
    pub fn ideal() -> Self {
        Self::default()
    }

    /// Build from offsets and angles.
    pub fn new(dx: f64, dy: f64, dz: f64, pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            displacement: R3::new(dx, dy, dz),
            rotation: R3::new(pitch, yaw, roll),
        }
    }

    /// Whether any component is non-zero.
    pub fn is_ideal(&self) -> bool {
        self.displacement == R3::zero() && self.rotation == R3::zero()
    }

    /// Fold an outer (container) error on top of this one:
    /// displacements add, rotations add.
    pub fn composed_with(&self, outer: &Alignment) -> Self {
        Self {
            displacement: self.displacement + outer.displacement,
            rotation: self.rotation + outer.rotation,
        }
    }

    fn pitch(&self) -> f64 {
        self.rotation.x()
    }

    fn yaw(&self) -> f64 {
        self.rotation.y()
    }

    fn roll(&self) -> f64 {
        self.rotation.z()
    }

    /// Frame-offset phase translation at longitudinal offset `s` from
    /// the element center.
    ///
    /// A rigid rotation about the center makes the transverse offset
    /// grow linearly along the element; the momentum components carry
    /// the frame's slope so adjacent sub-slices telescope exactly.
    fn frame_offset(&self, s: f64) -> [f64; 6] {
        [
            self.displacement.x() + self.yaw() * s,
            self.yaw(),
            self.displacement.y() - self.pitch() * s,
            -self.pitch(),
            self.displacement.z(),
            0.0,
        ]
    }
}

/// Inject `align` into the ideal map of a sub-slice spanning
/// longitudinal offsets `[s_in, s_out]` measured from the element
/// center.
///
/// Roll conjugates the map (`Rᵀ·M·R`); displacement and pitch/yaw
/// become a pre-translation into the element frame and a
/// post-translation back out, each evaluated at its own end of the
/// slice.
pub fn apply(ideal: PhaseMatrix, align: &Alignment, s_in: f64, s_out: f64) -> PhaseMatrix {
    if align.is_ideal() {
        return ideal;
    }

    let mut map = ideal;
    if align.roll() != 0.0 {
        map = map.conjugate(&PhaseMatrix::rotation_z(align.roll()));
    }

    let into = align.frame_offset(s_in).map(|v| -v);
    let back = align.frame_offset(s_out);
    PhaseMatrix::translation(into)
        .then(&map)
        .then(&PhaseMatrix::translation(back))
}
