//! Linear-algebra kernel and phase-space primitives.
//!
//! Two layers live here. The kernel ([`R3`], [`R3x3`]) is pure math:
//! fixed-size real vectors and matrices with rotation factories and
//! symmetric-matrix utilities, no physics semantics. On top of it sit
//! the phase-space primitives ([`PhaseVector`], [`PhaseMatrix`]): an
//! augmented 6-D phase vector and the 7×7 homogeneous matrix
//! representing a linear beam-transport map.
//!
//! Numerics are delegated to `nalgebra`; the types here own the domain
//! invariants (the homogeneous row, propagation-order composition).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod phase;
mod r3;
mod r3x3;

pub use phase::{PhaseIndex, PhaseMatrix, PhaseVector};
pub use r3::R3;
pub use r3x3::{R3x3, SymmetricEigen3};
