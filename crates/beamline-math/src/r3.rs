//! Real 3-vector.

use std::ops::{Add, Index, Mul, Neg, Sub};

use nalgebra::Vector3;

/// A real 3-vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct R3(pub(crate) Vector3<f64>);

impl R3 {
    /// The zero vector.
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    /// Build from components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// First component.
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Second component.
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Third component.
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    /// Dot product.
    pub fn dot(&self, rhs: &R3) -> f64 {
        self.0.dot(&rhs.0)
    }

    /// Cross product.
    pub fn cross(&self, rhs: &R3) -> R3 {
        R3(self.0.cross(&rhs.0))
    }
}

impl Add for R3 {
    type Output = R3;
    fn add(self, rhs: R3) -> R3 {
        R3(self.0 + rhs.0)
    }
}

impl Sub for R3 {
    type Output = R3;
    fn sub(self, rhs: R3) -> R3 {
        R3(self.0 - rhs.0)
    }
}

impl Neg for R3 {
    type Output = R3;
    fn neg(self) -> R3 {
        R3(-self.0)
    }
}

impl Mul<f64> for R3 {
    type Output = R3;
    fn mul(self, rhs: f64) -> R3 {
        R3(self.0 * rhs)
    }
}

impl Index<usize> for R3 {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}
