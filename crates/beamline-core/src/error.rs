//! Error types for the beamline model, organized by subsystem:
//! lattice generation, transfer-map evaluation, and synchronization.

use std::error::Error;
use std::fmt;

use crate::{DeviceKind, HardwareId, PropertyKey};

/// Fatal errors from lattice generation.
///
/// Generation is all-or-nothing: any of these aborts the pass and no
/// partial lattice is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationError {
    /// The intermediate lattice could not be built by the
    /// lattice-construction collaborator (malformed hardware
    /// description).
    IntermediateLattice {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// An intermediate element referenced a hardware node that is not
    /// in the supplied node table.
    UnknownHardware {
        /// The unresolvable node id.
        node: HardwareId,
    },
    /// A bend magnet's geometry is unusable (zero design bend angle or
    /// path length, missing geometry record).
    BadBendGeometry {
        /// The offending node id.
        node: HardwareId,
        /// What was wrong with the geometry.
        reason: String,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntermediateLattice { reason } => {
                write!(f, "intermediate lattice construction failed: {reason}")
            }
            Self::UnknownHardware { node } => {
                write!(f, "unknown hardware node '{node}'")
            }
            Self::BadBendGeometry { node, reason } => {
                write!(f, "bad bend geometry on '{node}': {reason}")
            }
        }
    }
}

impl Error for GenerationError {}

/// Per-call contract violations during transfer-map evaluation.
///
/// These stop the enclosing propagation; they are never retried.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// A transfer map was requested for a negative sub-length or one
    /// exceeding the element's declared length.
    InvalidSubLength {
        /// Id of the element evaluated.
        element: String,
        /// The requested sub-length, m.
        requested: f64,
        /// The element's declared length, m.
        length: f64,
    },
    /// A required physical parameter is absent or non-finite on the
    /// element.
    MissingParameter {
        /// Id of the element evaluated.
        element: String,
        /// Name of the absent parameter.
        parameter: &'static str,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSubLength {
                element,
                requested,
                length,
            } => write!(
                f,
                "invalid sub-length {requested} for element '{element}' of length {length}"
            ),
            Self::MissingParameter { element, parameter } => {
                write!(f, "element '{element}' is missing parameter '{parameter}'")
            }
        }
    }
}

impl Error for ModelError {}

/// Recoverable synchronization failures, reported per element and
/// property. The caller decides whether to skip, abort, or retry in a
/// different mode.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncError {
    /// A required property was absent from the resolved value map.
    MissingProperty {
        /// Id of the element being synchronized.
        element: String,
        /// The absent property.
        property: PropertyKey,
    },
    /// Post-resync verification found a value differing from the
    /// resolved one.
    Mismatch {
        /// Id of the element checked.
        element: String,
        /// The mismatched property.
        property: PropertyKey,
        /// Value the element was expected to hold.
        expected: f64,
        /// Value the element actually holds.
        actual: f64,
    },
    /// A diagnostic query was made for a device kind with no
    /// registered property accessor.
    NoAccessor {
        /// The queried node.
        node: HardwareId,
        /// The node's device kind.
        kind: DeviceKind,
    },
    /// A query named a hardware node no element was registered
    /// against.
    UnknownNode {
        /// The unknown node id.
        node: HardwareId,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProperty { element, property } => {
                write!(f, "property '{property}' unresolved for element '{element}'")
            }
            Self::Mismatch {
                element,
                property,
                expected,
                actual,
            } => write!(
                f,
                "element '{element}' holds {actual} for '{property}', expected {expected}"
            ),
            Self::NoAccessor { node, kind } => {
                write!(f, "no property accessor registered for '{node}' ({kind})")
            }
            Self::UnknownNode { node } => {
                write!(f, "no element registered against hardware node '{node}'")
            }
        }
    }
}

impl Error for SyncError {}
