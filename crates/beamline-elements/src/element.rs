//! The transport element: shared attributes plus a typed physics
//! variant, dispatching the transfer-map contract.

use beamline_core::{ModelError, Probe};
use beamline_math::PhaseMatrix;

use crate::misalign::{self, Alignment};
use crate::slice::{SliceSpan, SLICE_TOL};
use crate::{dipole, drift, quadrupole, rf_gap, solenoid, thin};
use crate::{CorrectorParams, DipoleParams, QuadParams, RfGapParams, SolenoidParams};

/// The physics variant of a transport element.
///
/// One construction rule per intermediate-element type produces one of
/// these; synchronizers match on the variant to write resolved
/// property values into it.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    /// Field-free drift.
    Drift,
    /// Zero-length identity, kept for lookup and diagnostics.
    Marker,
    /// Bending dipole section.
    Dipole(DipoleParams),
    /// Normal quadrupole.
    Quadrupole(QuadParams),
    /// Quadrupole rotated 45° about the beam axis.
    SkewQuadrupole(QuadParams),
    /// Solenoid magnet.
    Solenoid(SolenoidParams),
    /// Thin RF accelerating gap.
    RfGap(RfGapParams),
    /// Thin steering corrector.
    Corrector(CorrectorParams),
    /// Zero-force sextupole, modelled as a drift.
    Sextupole,
}

impl ElementKind {
    /// Short type tag used in ids, logs, and diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Drift => "drift",
            Self::Marker => "marker",
            Self::Dipole(_) => "dipole",
            Self::Quadrupole(_) => "quad",
            Self::SkewQuadrupole(_) => "skewquad",
            Self::Solenoid(_) => "solenoid",
            Self::RfGap(_) => "rfgap",
            Self::Corrector(_) => "corrector",
            Self::Sextupole => "sextupole",
        }
    }

    /// The required physical parameter that is absent or non-finite,
    /// if any.
    fn missing_parameter(&self) -> Option<&'static str> {
        let bad = |v: f64| !v.is_finite();
        match self {
            Self::Dipole(p) if bad(p.field) => Some("field"),
            Self::Quadrupole(p) | Self::SkewQuadrupole(p) if bad(p.field) => Some("field"),
            Self::Solenoid(p) if bad(p.field) => Some("field"),
            Self::Corrector(p) if bad(p.field) => Some("field"),
            Self::RfGap(p) if bad(p.etl) => Some("amplitude"),
            Self::RfGap(p) if bad(p.phase) => Some("phase"),
            Self::RfGap(p) if bad(p.frequency) || p.frequency <= 0.0 => Some("frequency"),
            _ => None,
        }
    }
}

/// A beamline element at a fixed longitudinal position.
///
/// Created once by the lattice generator; its physical parameters are
/// mutated only through a synchronizer. `length == 0` marks a thin
/// element, which is never sliced.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportElement {
    /// Element id (synthetic for drifts, hardware-derived otherwise).
    pub id: String,
    /// Physical length, m. Never negative.
    pub length: f64,
    /// s-position of the element's longitudinal center, m.
    pub center: f64,
    /// The element's own rigid-body alignment error.
    pub align: Alignment,
    /// Physics variant and parameters.
    pub kind: ElementKind,
}

impl TransportElement {
    /// Create an element with ideal alignment.
    pub fn new(id: impl Into<String>, kind: ElementKind, length: f64, center: f64) -> Self {
        debug_assert!(length >= 0.0, "element length must be non-negative");
        Self {
            id: id.into(),
            length,
            center,
            align: Alignment::ideal(),
            kind,
        }
    }

    /// s-position of the element entrance.
    pub fn start(&self) -> f64 {
        self.center - self.length / 2.0
    }

    /// s-position of the element exit.
    pub fn end(&self) -> f64 {
        self.center + self.length / 2.0
    }

    /// Whether the element is thin (zero length).
    pub fn is_thin(&self) -> bool {
        self.length <= SLICE_TOL
    }

    /// Transfer map over `sub_length`, with no container misalignment.
    pub fn transfer_map(&self, probe: &Probe, sub_length: f64) -> Result<PhaseMatrix, ModelError> {
        self.transfer_map_aligned(probe, sub_length, &Alignment::ideal())
    }

    /// Transfer map over `sub_length` with an ancestor (container)
    /// alignment folded in before the element's own error.
    ///
    /// The probe's position locates the sub-slice within the element;
    /// entrance-only and exit-only corrections fire on the first and
    /// last slice respectively.
    pub fn transfer_map_aligned(
        &self,
        probe: &Probe,
        sub_length: f64,
        ancestor: &Alignment,
    ) -> Result<PhaseMatrix, ModelError> {
        if sub_length < -SLICE_TOL || sub_length > self.length + SLICE_TOL {
            return Err(ModelError::InvalidSubLength {
                element: self.id.clone(),
                requested: sub_length,
                length: self.length,
            });
        }
        if let Some(parameter) = self.kind.missing_parameter() {
            return Err(ModelError::MissingParameter {
                element: self.id.clone(),
                parameter,
            });
        }

        let span = SliceSpan::locate(probe.position, sub_length, self.start(), self.length);
        let ideal = match &self.kind {
            ElementKind::Drift => drift::map(sub_length),
            ElementKind::Marker => thin::marker_map(),
            ElementKind::Dipole(p) => dipole::map(p, probe, sub_length, span),
            ElementKind::Quadrupole(p) => quadrupole::map(p, probe, sub_length),
            ElementKind::SkewQuadrupole(p) => quadrupole::skew_map(p, probe, sub_length),
            ElementKind::Solenoid(p) => solenoid::map(p, probe, sub_length, span),
            ElementKind::RfGap(p) => rf_gap::map(p, probe),
            ElementKind::Corrector(p) => thin::corrector_map(p, probe),
            ElementKind::Sextupole => thin::sextupole_map(sub_length),
        };

        let align = self.align.composed_with(ancestor);
        let (s_in, s_out) = self.slice_offsets(probe, sub_length, span);
        Ok(misalign::apply(ideal, &align, s_in, s_out))
    }

    /// Kinetic-energy change over `sub_length`, eV. Zero for purely
    /// magnetic elements.
    pub fn energy_gain(&self, probe: &Probe, _sub_length: f64) -> f64 {
        match &self.kind {
            ElementKind::RfGap(p) => rf_gap::energy_gain(p, probe),
            _ => 0.0,
        }
    }

    /// Time of flight over `sub_length`, s. Zero for thin elements.
    pub fn elapsed_time(&self, probe: &Probe, sub_length: f64) -> f64 {
        if self.is_thin() {
            0.0
        } else {
            sub_length / probe.velocity()
        }
    }

    /// Longitudinal offsets of the slice ends from the element center.
    ///
    /// A solenoid's zero-length exit evaluation anchors at the
    /// half-length instead of the slice offset, so the exit kick picks
    /// up the misalignment of the downstream face.
    fn slice_offsets(&self, probe: &Probe, sub_length: f64, span: SliceSpan) -> (f64, f64) {
        if matches!(self.kind, ElementKind::Solenoid(_)) && sub_length == 0.0 && span.last {
            let half = self.length / 2.0;
            return (half, half);
        }
        let s_in = probe.position - self.center;
        (s_in, s_in + sub_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use beamline_core::Orientation;

    fn probe_at(s: f64) -> Probe {
        let mut p = Probe::new(1.0, 938.272e6, 2.5e6);
        p.position = s;
        p
    }

    fn drift_elem(len: f64, center: f64) -> TransportElement {
        TransportElement::new("DR1", ElementKind::Drift, len, center)
    }

    #[test]
    fn negative_sub_length_is_a_contract_violation() {
        let e = drift_elem(1.0, 0.5);
        let err = e.transfer_map(&probe_at(0.0), -0.1).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSubLength { .. }));
    }

    #[test]
    fn sub_length_beyond_the_element_is_rejected() {
        let e = drift_elem(1.0, 0.5);
        let err = e.transfer_map(&probe_at(0.0), 1.5).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSubLength { .. }));
    }

    #[test]
    fn unsynchronized_field_is_a_missing_parameter() {
        let e = TransportElement::new(
            "QH01",
            ElementKind::Quadrupole(QuadParams {
                field: f64::NAN,
                orientation: Orientation::Horizontal,
            }),
            0.5,
            0.25,
        );
        let err = e.transfer_map(&probe_at(0.0), 0.5).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingParameter {
                element: "QH01".into(),
                parameter: "field",
            }
        );
    }

    #[test]
    fn drift_map_matches_the_analytic_form_for_any_energy() {
        let e = drift_elem(2.0, 1.0);
        let cold = e.transfer_map(&probe_at(0.0), 2.0).unwrap();
        let mut hot = probe_at(0.0);
        hot.kinetic_energy = 1.0e9;
        let fast = e.transfer_map(&hot, 2.0).unwrap();
        assert_eq!(cold, fast);
        assert_abs_diff_eq!(cold.get(0, 1), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn solenoid_end_kicks_follow_the_probe_position() {
        let e = TransportElement::new(
            "SOL1",
            ElementKind::Solenoid(SolenoidParams { field: 0.3 }),
            0.8,
            0.4,
        );
        // First slice (entrance at s = 0) carries the entrance kick;
        // an interior slice does not.
        let first = e.transfer_map(&probe_at(0.0), 0.2).unwrap();
        let interior = e.transfer_map(&probe_at(0.2), 0.3).unwrap();
        assert!(first != interior);
        // Composing first + interior slices + last reproduces the
        // whole element.
        let last = e.transfer_map(&probe_at(0.5), 0.3).unwrap();
        let whole = e.transfer_map(&probe_at(0.0), 0.8).unwrap();
        let composed = first.then(&interior).then(&last);
        for r in 0..7 {
            for c in 0..7 {
                assert_abs_diff_eq!(composed.get(r, c), whole.get(r, c), epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn solenoid_zero_length_exit_anchors_at_the_downstream_face() {
        let params = SolenoidParams { field: 0.3 };
        let mut e = TransportElement::new("SOL1", ElementKind::Solenoid(params), 0.8, 0.4);
        e.align = Alignment::new(2e-3, -1e-3, 0.0, 5e-4, 0.0, 0.0);
        // Zero-length exit evaluation: the misalignment anchors at the
        // half-length, picking up the downstream face exactly.
        let at_end = e.transfer_map(&probe_at(0.8), 0.0).unwrap();
        let ideal = solenoid::map(
            &params,
            &probe_at(0.8),
            0.0,
            SliceSpan {
                first: false,
                last: true,
            },
        );
        assert_eq!(at_end, misalign::apply(ideal, &e.align, 0.4, 0.4));
        // A probe within the boundary tolerance gets the same anchor.
        let near_end = e.transfer_map(&probe_at(0.8 - 5e-7), 0.0).unwrap();
        assert_eq!(at_end, near_end);
    }

    #[test]
    fn energy_gain_is_zero_for_magnetic_elements() {
        let e = TransportElement::new(
            "QV02",
            ElementKind::Quadrupole(QuadParams {
                field: 4.0,
                orientation: Orientation::Vertical,
            }),
            0.5,
            0.25,
        );
        assert_eq!(e.energy_gain(&probe_at(0.0), 0.5), 0.0);
    }

    #[test]
    fn rf_gap_gains_the_cosine_energy() {
        let e = TransportElement::new(
            "RG1",
            ElementKind::RfGap(RfGapParams {
                etl: 1.0e6,
                phase: 0.0,
                frequency: 402.5e6,
            }),
            0.0,
            1.0,
        );
        assert_abs_diff_eq!(e.energy_gain(&probe_at(1.0), 0.0), 1.0e6, epsilon = 1e-9);
        assert_eq!(e.elapsed_time(&probe_at(1.0), 0.0), 0.0);
    }

    #[test]
    fn elapsed_time_is_length_over_velocity() {
        let e = drift_elem(1.0, 0.5);
        let p = probe_at(0.0);
        let t = e.elapsed_time(&p, 1.0);
        assert_abs_diff_eq!(t, 1.0 / p.velocity(), epsilon = 1e-18);
    }

    #[test]
    fn homogeneous_row_survives_misalignment() {
        let mut e = drift_elem(1.0, 0.5);
        e.align = Alignment::new(1e-3, -2e-3, 0.0, 1e-4, 2e-4, 0.01);
        let m = e.transfer_map(&probe_at(0.0), 1.0).unwrap();
        assert!(m.is_homogeneous());
    }
}
