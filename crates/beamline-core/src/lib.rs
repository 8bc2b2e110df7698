//! Core types for the beamline accelerator model.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the beamline workspace:
//! typed identifiers, the read-only hardware-node view, the probe
//! state, well-known property keys, and all subsystem error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod hardware;
mod id;
mod probe;
mod property;

pub use error::{GenerationError, ModelError, SyncError};
pub use hardware::{BendGeometry, DeviceKind, HardwareNode, Orientation};
pub use id::{HardwareId, NodeId};
pub use probe::Probe;
pub use property::{keys, PropertyKey};

/// Speed of light in vacuum, m/s.
pub const LIGHT_SPEED: f64 = 2.997_924_58e8;
