//! Augmented phase-space vector and homogeneous transfer-map matrix.

use std::fmt;
use std::ops::Mul;

use nalgebra::{SMatrix, SVector};

use crate::R3x3;

/// Index of a phase-space coordinate.
///
/// Coordinates 0–5 are the linear block (x, x′, y, y′, z, z′); index 6
/// is the homogeneous coordinate carrying the affine part of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PhaseIndex {
    X = 0,
    Xp = 1,
    Y = 2,
    Yp = 3,
    Z = 4,
    Zp = 5,
    Hom = 6,
}

impl PhaseIndex {
    /// The index as a usize.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// An augmented 6-D phase-space vector (x, x′, y, y′, z, z′; 1).
///
/// The seventh (homogeneous) component is fixed at 1 so that affine
/// maps — translations encoded in column 6 of a [`PhaseMatrix`] — act
/// by plain matrix multiplication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseVector(SVector<f64, 7>);

impl PhaseVector {
    /// The zero phase vector (homogeneous coordinate still 1).
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Build from the six phase coordinates.
    pub fn new(x: f64, xp: f64, y: f64, yp: f64, z: f64, zp: f64) -> Self {
        Self(SVector::<f64, 7>::from_column_slice(&[
            x, xp, y, yp, z, zp, 1.0,
        ]))
    }

    /// Coordinate at `idx`.
    pub fn get(&self, idx: PhaseIndex) -> f64 {
        self.0[idx.index()]
    }

    /// Set coordinate `idx`. Setting the homogeneous coordinate is a
    /// programming error.
    pub fn set(&mut self, idx: PhaseIndex, value: f64) {
        debug_assert!(idx != PhaseIndex::Hom, "homogeneous coordinate is fixed");
        self.0[idx.index()] = value;
    }

    /// The six phase coordinates as an array.
    pub fn coords(&self) -> [f64; 6] {
        [
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5],
        ]
    }
}

impl fmt::Display for PhaseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.coords();
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            c[0], c[1], c[2], c[3], c[4], c[5]
        )
    }
}

/// A 7×7 homogeneous matrix representing a linear beam-transport map.
///
/// Rows/columns 0–5 are the linear phase-space block; row/column 6 is
/// the homogeneous coordinate. Every valid map keeps row 6 equal to
/// `(0, 0, 0, 0, 0, 0, 1)`; all factories here preserve that, and
/// [`is_homogeneous`](Self::is_homogeneous) checks it.
///
/// Composition is matrix multiplication. In propagation order, the
/// earliest map is the right-most operand; [`then`](Self::then) spells
/// that out at call sites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseMatrix(SMatrix<f64, 7, 7>);

impl PhaseMatrix {
    /// The identity map.
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Matrix element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// Set matrix element at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < 6 || col == 6, "row 6 of a transfer map is fixed");
        self.0[(row, col)] = value;
    }

    /// Assign a 2×2 block with upper-left corner at `(row, col)`.
    pub fn set_block2(&mut self, row: usize, col: usize, block: [[f64; 2]; 2]) {
        for (r, row_vals) in block.iter().enumerate() {
            for (c, v) in row_vals.iter().enumerate() {
                self.set(row + r, col + c, *v);
            }
        }
    }

    /// Translation map: identity with the six displacement components
    /// in the affine column.
    pub fn translation(dv: [f64; 6]) -> Self {
        let mut m = Self::identity();
        for (i, d) in dv.iter().enumerate() {
            m.set(i, 6, *d);
        }
        m
    }

    /// Embed a spatial 3×3 rotation into phase space.
    ///
    /// The rotation acts identically on the coordinate triplet
    /// (x, y, z) and the momentum triplet (x′, y′, z′).
    pub fn spatial_rotation(rot: &R3x3) -> Self {
        let mut m = Self::identity();
        for i in 0..3 {
            for j in 0..3 {
                m.set(2 * i, 2 * j, rot.get(i, j));
                m.set(2 * i + 1, 2 * j + 1, rot.get(i, j));
            }
        }
        m
    }

    /// Rotation of the transverse plane about the beam (z) axis.
    pub fn rotation_z(angle: f64) -> Self {
        Self::spatial_rotation(&R3x3::rotation_z(angle))
    }

    /// Conjugation `rᵀ · self · r`, used to express this map in a
    /// frame rotated by `r`.
    pub fn conjugate(&self, r: &PhaseMatrix) -> Self {
        Self(r.transpose().0 * self.0 * r.0)
    }

    /// Compose in propagation order: apply `self` first, then `later`.
    pub fn then(&self, later: &PhaseMatrix) -> Self {
        Self(later.0 * self.0)
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Apply the map to a phase vector.
    pub fn transform(&self, v: &PhaseVector) -> PhaseVector {
        PhaseVector(self.0 * v.0)
    }

    /// Determinant of the 6×6 linear block.
    pub fn linear_determinant(&self) -> f64 {
        self.0.fixed_view::<6, 6>(0, 0).clone_owned().determinant()
    }

    /// Whether row 6 is exactly `(0, 0, 0, 0, 0, 0, 1)`.
    pub fn is_homogeneous(&self) -> bool {
        (0..6).all(|c| self.0[(6, c)] == 0.0) && self.0[(6, 6)] == 1.0
    }
}

impl Mul for PhaseMatrix {
    type Output = PhaseMatrix;
    fn mul(self, rhs: PhaseMatrix) -> PhaseMatrix {
        PhaseMatrix(self.0 * rhs.0)
    }
}
