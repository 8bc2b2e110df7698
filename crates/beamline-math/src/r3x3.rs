//! Real 3×3 matrix with rotation factories and symmetric utilities.

use std::ops::{Add, Index, Mul, Sub};

use nalgebra::Matrix3;

use crate::R3;

/// A real 3×3 matrix.
///
/// Rotation factories follow the right-hand convention: a positive
/// angle rotates counter-clockwise when looking down the named axis
/// toward the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct R3x3(pub(crate) Matrix3<f64>);

/// Eigendecomposition of a symmetric 3×3 matrix: `m = q · diag(λ) · qᵀ`.
#[derive(Clone, Debug)]
pub struct SymmetricEigen3 {
    /// Eigenvalues, in the order matching the columns of `vectors`.
    pub values: [f64; 3],
    /// Orthonormal eigenvectors as matrix columns.
    pub vectors: R3x3,
}

impl R3x3 {
    /// The zero matrix.
    pub fn zero() -> Self {
        Self(Matrix3::zeros())
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Build from rows.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    /// Rotation about the x axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Rotation about the y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Rotation about the z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Matrix element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Determinant.
    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Whether the matrix is symmetric to within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..3).all(|r| (r + 1..3).all(|c| (self.0[(r, c)] - self.0[(c, r)]).abs() <= tol))
    }

    /// Eigendecomposition, valid for symmetric matrices.
    ///
    /// The caller is responsible for symmetry; for non-symmetric input
    /// the result is the decomposition of the symmetric part.
    pub fn symmetric_eigen(&self) -> SymmetricEigen3 {
        let sym = (self.0 + self.0.transpose()) * 0.5;
        let eig = nalgebra::SymmetricEigen::new(sym);
        SymmetricEigen3 {
            values: [eig.eigenvalues[0], eig.eigenvalues[1], eig.eigenvalues[2]],
            vectors: R3x3(eig.eigenvectors),
        }
    }
}

impl Add for R3x3 {
    type Output = R3x3;
    fn add(self, rhs: R3x3) -> R3x3 {
        R3x3(self.0 + rhs.0)
    }
}

impl Sub for R3x3 {
    type Output = R3x3;
    fn sub(self, rhs: R3x3) -> R3x3 {
        R3x3(self.0 - rhs.0)
    }
}

impl Mul for R3x3 {
    type Output = R3x3;
    fn mul(self, rhs: R3x3) -> R3x3 {
        R3x3(self.0 * rhs.0)
    }
}

impl Mul<R3> for R3x3 {
    type Output = R3;
    fn mul(self, rhs: R3) -> R3 {
        R3(self.0 * rhs.0)
    }
}

impl Index<(usize, usize)> for R3x3 {
    type Output = f64;
    fn index(&self, idx: (usize, usize)) -> &f64 {
        &self.0[idx]
    }
}
