//! Synchronizers: per-element-family application of resolved property
//! values.
//!
//! `resync` writes resolved values onto the element; `check` verifies
//! the element already holds them. For both, a value map missing a
//! required property is a hard failure — there is no defaulting at
//! this layer.

use beamline_core::{keys, PropertyKey, SyncError};
use beamline_elements::{ElementKind, TransportElement};
use indexmap::IndexMap;

/// Verification tolerance for `check`, absolute.
const CHECK_TOL: f64 = 1e-9;

/// Applies a resolved value map to one family of element types.
pub trait Synchronizer {
    /// Write the resolved values onto the element.
    fn resync(
        &self,
        element: &mut TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError>;

    /// Verify the element already holds the resolved values.
    fn check(
        &self,
        element: &TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError>;
}

fn require(
    element: &TransportElement,
    values: &IndexMap<PropertyKey, f64>,
    property: PropertyKey,
) -> Result<f64, SyncError> {
    values
        .get(property)
        .copied()
        .ok_or_else(|| SyncError::MissingProperty {
            element: element.id.clone(),
            property,
        })
}

fn verify(
    element: &TransportElement,
    property: PropertyKey,
    expected: f64,
    actual: f64,
) -> Result<(), SyncError> {
    if (expected - actual).abs() <= CHECK_TOL {
        Ok(())
    } else {
        Err(SyncError::Mismatch {
            element: element.id.clone(),
            property,
            expected,
            actual,
        })
    }
}

/// Synchronizer for powered electromagnets: writes the field strength
/// into whichever magnet variant the element is.
pub struct ElectromagnetSynchronizer;

impl ElectromagnetSynchronizer {
    fn stored_field(element: &TransportElement) -> Option<f64> {
        match &element.kind {
            ElementKind::Dipole(p) => Some(p.field),
            ElementKind::Quadrupole(p) | ElementKind::SkewQuadrupole(p) => Some(p.field),
            ElementKind::Solenoid(p) => Some(p.field),
            ElementKind::Corrector(p) => Some(p.field),
            _ => None,
        }
    }
}

impl Synchronizer for ElectromagnetSynchronizer {
    fn resync(
        &self,
        element: &mut TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError> {
        let field = require(element, values, keys::FIELD)?;
        match &mut element.kind {
            ElementKind::Dipole(p) => p.field = field,
            ElementKind::Quadrupole(p) | ElementKind::SkewQuadrupole(p) => p.field = field,
            ElementKind::Solenoid(p) => p.field = field,
            ElementKind::Corrector(p) => p.field = field,
            // Sextupoles carry no first-order force; the value
            // resolves but lands nowhere.
            ElementKind::Sextupole => {}
            _ => {}
        }
        Ok(())
    }

    fn check(
        &self,
        element: &TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError> {
        let expected = require(element, values, keys::FIELD)?;
        match Self::stored_field(element) {
            Some(actual) => verify(element, keys::FIELD, expected, actual),
            None => Ok(()),
        }
    }
}

/// Synchronizer for permanent-magnet quadrupoles. Identical write
/// path to the electromagnet case; the difference is upstream, in the
/// accessor that only ever resolves design values.
pub struct PermanentQuadSynchronizer;

impl Synchronizer for PermanentQuadSynchronizer {
    fn resync(
        &self,
        element: &mut TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError> {
        let field = require(element, values, keys::FIELD)?;
        if let ElementKind::Quadrupole(p) = &mut element.kind {
            p.field = field;
        }
        Ok(())
    }

    fn check(
        &self,
        element: &TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError> {
        let expected = require(element, values, keys::FIELD)?;
        if let ElementKind::Quadrupole(p) = &element.kind {
            verify(element, keys::FIELD, expected, p.field)?;
        }
        Ok(())
    }
}

/// Synchronizer for RF cavities: amplitude and phase are both
/// required.
pub struct RfCavitySynchronizer;

impl Synchronizer for RfCavitySynchronizer {
    fn resync(
        &self,
        element: &mut TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError> {
        let amplitude = require(element, values, keys::AMPLITUDE)?;
        let phase = require(element, values, keys::PHASE)?;
        if let ElementKind::RfGap(p) = &mut element.kind {
            p.etl = amplitude;
            p.phase = phase;
        }
        Ok(())
    }

    fn check(
        &self,
        element: &TransportElement,
        values: &IndexMap<PropertyKey, f64>,
    ) -> Result<(), SyncError> {
        let amplitude = require(element, values, keys::AMPLITUDE)?;
        let phase = require(element, values, keys::PHASE)?;
        if let ElementKind::RfGap(p) = &element.kind {
            verify(element, keys::AMPLITUDE, amplitude, p.etl)?;
            verify(element, keys::PHASE, phase, p.phase)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_core::Orientation;
    use beamline_elements::QuadParams;

    fn quad_element() -> TransportElement {
        TransportElement::new(
            "QH01",
            ElementKind::Quadrupole(QuadParams {
                field: f64::NAN,
                orientation: Orientation::Horizontal,
            }),
            0.5,
            0.25,
        )
    }

    #[test]
    fn resync_writes_the_field() {
        let mut e = quad_element();
        let mut values = IndexMap::new();
        values.insert(keys::FIELD, 3.3);
        ElectromagnetSynchronizer.resync(&mut e, &values).unwrap();
        match &e.kind {
            ElementKind::Quadrupole(p) => assert_eq!(p.field, 3.3),
            other => panic!("unexpected kind {other:?}"),
        }
        ElectromagnetSynchronizer.check(&e, &values).unwrap();
    }

    #[test]
    fn missing_required_property_is_a_hard_failure() {
        let mut e = quad_element();
        let empty = IndexMap::new();
        let err = ElectromagnetSynchronizer.resync(&mut e, &empty).unwrap_err();
        assert_eq!(
            err,
            SyncError::MissingProperty {
                element: "QH01".into(),
                property: keys::FIELD,
            }
        );
        let err = ElectromagnetSynchronizer.check(&e, &empty).unwrap_err();
        assert!(matches!(err, SyncError::MissingProperty { .. }));
    }

    #[test]
    fn check_flags_a_stale_element() {
        let mut e = quad_element();
        let mut values = IndexMap::new();
        values.insert(keys::FIELD, 3.3);
        ElectromagnetSynchronizer.resync(&mut e, &values).unwrap();
        values.insert(keys::FIELD, 4.0);
        let err = ElectromagnetSynchronizer.check(&e, &values).unwrap_err();
        assert!(matches!(err, SyncError::Mismatch { .. }));
    }

    #[test]
    fn rf_synchronizer_requires_both_amplitude_and_phase() {
        use beamline_elements::RfGapParams;
        let mut e = TransportElement::new(
            "RG1",
            ElementKind::RfGap(RfGapParams {
                etl: f64::NAN,
                phase: f64::NAN,
                frequency: 402.5e6,
            }),
            0.0,
            0.0,
        );
        let mut values = IndexMap::new();
        values.insert(keys::AMPLITUDE, 1.0e6);
        let err = RfCavitySynchronizer.resync(&mut e, &values).unwrap_err();
        assert_eq!(
            err,
            SyncError::MissingProperty {
                element: "RG1".into(),
                property: keys::PHASE,
            }
        );
        values.insert(keys::PHASE, -0.4);
        RfCavitySynchronizer.resync(&mut e, &values).unwrap();
        RfCavitySynchronizer.check(&e, &values).unwrap();
    }
}
