//! Transport-element hierarchy and per-element transfer-map physics.
//!
//! Each beamline element exposes the same contract: a linear transfer
//! map over a sub-length of the element, evaluated at the probe's
//! charge, rest energy, and relativistic β/γ; an energy-gain figure
//! (zero for purely magnetic elements); and a time-of-flight figure.
//!
//! Elements may be evaluated piecewise to interleave interior physics
//! (space-charge kicks) between thin entrance/exit corrections; the
//! [`slice`] module classifies a sub-slice as first/last against the
//! element's bounds, and [`misalign`] injects rigid-body alignment
//! errors into the ideal map.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod dipole;
mod drift;
mod element;
pub mod misalign;
mod quadrupole;
mod rf_gap;
pub mod slice;
mod solenoid;
mod thin;

pub use dipole::DipoleParams;
pub use element::{ElementKind, TransportElement};
pub use misalign::Alignment;
pub use quadrupole::QuadParams;
pub use rf_gap::RfGapParams;
pub use slice::{SliceSpan, SLICE_TOL};
pub use solenoid::SolenoidParams;
pub use thin::CorrectorParams;

/// Rigidity-like focusing scale: `q·c / (βγ·E_rest)`, 1/(T·m).
///
/// Multiplying by a field (T) gives a bending curvature, by a gradient
/// (T/m) a focusing strength k². Shared by every magnetic element.
pub(crate) fn magnetic_scale(probe: &beamline_core::Probe) -> f64 {
    probe.charge * beamline_core::LIGHT_SPEED / (probe.beta_gamma() * probe.rest_energy)
}
