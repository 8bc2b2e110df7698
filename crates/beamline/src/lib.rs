//! Beamline: an online accelerator model.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all beamline sub-crates. For most users, adding `beamline` as
//! a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use beamline::prelude::*;
//!
//! // Describe the hardware: one quadrupole with a design gradient.
//! let mut nodes = indexmap::IndexMap::new();
//! let quad = HardwareNode::new("Q1", DeviceKind::QuadMagnet)
//!     .with_design(beamline::types::keys::FIELD, 4.2);
//! nodes.insert(quad.id.clone(), quad);
//!
//! // The intermediate lattice: drift, quad, drift.
//! let stream = beamline::lattice::normalize(vec![
//!     IntermediateElement::drift(1.0, 0.5),
//!     IntermediateElement::device(
//!         IntermediateKind::Quad,
//!         "QH01",
//!         HardwareId::new("Q1"),
//!         0.5,
//!         1.25,
//!     ),
//!     IntermediateElement::drift(1.0, 2.0),
//! ]);
//!
//! // Generate, synchronize from design values, compose the map.
//! let probe = Probe::new(1.0, 938.272e6, 2.5e6);
//! let mut scenario = Scenario::generate(
//!     "CELL",
//!     ContainerKind::Linear,
//!     &stream,
//!     &nodes,
//!     SyncMode::Design,
//!     probe,
//! )
//! .unwrap();
//! assert!(scenario.resync(&NoChannels).is_clean());
//! let map = scenario.full_map().unwrap();
//! assert!((map.linear_determinant() - 1.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `beamline-core` | IDs, hardware view, probe, property keys, error types |
//! | [`math`] | `beamline-math` | `R3`/`R3x3` kernel and the phase-space primitives |
//! | [`elements`] | `beamline-elements` | Transport elements and transfer-map physics |
//! | [`lattice`] | `beamline-lattice` | Lattice arena and the hardware-to-model generator |
//! | [`sync`] | `beamline-sync` | Synchronization manager, accessors, batch read |
//! | [`scenario`] | `beamline-scenario` | Scenario runtime and the tracker seam |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers, hardware view, probe state, and error types
/// (`beamline-core`).
pub use beamline_core as types;

/// Linear-algebra kernel and phase-space primitives (`beamline-math`).
///
/// [`math::PhaseMatrix`] is the 7×7 homogeneous transfer map every
/// element produces.
pub use beamline_math as math;

/// Transport-element hierarchy and per-element physics
/// (`beamline-elements`).
pub use beamline_elements as elements;

/// Lattice structure and the hardware-to-model generator
/// (`beamline-lattice`).
pub use beamline_lattice as lattice;

/// Hardware/model synchronization layer (`beamline-sync`).
///
/// The [`sync::SynchronizationManager`] owns the mode, registries,
/// model-input overrides, and the property cache.
pub use beamline_sync as sync;

/// Scenario runtime tying everything together (`beamline-scenario`).
pub use beamline_scenario as scenario;

/// Common imports for typical beamline usage.
///
/// ```rust
/// use beamline::prelude::*;
/// ```
pub mod prelude {
    // Identity and hardware view
    pub use beamline_core::{
        DeviceKind, HardwareId, HardwareNode, NodeId, Orientation, Probe, PropertyKey,
    };

    // Errors
    pub use beamline_core::{GenerationError, ModelError, SyncError};

    // Phase space
    pub use beamline_math::{PhaseIndex, PhaseMatrix, PhaseVector};

    // Elements
    pub use beamline_elements::{Alignment, ElementKind, TransportElement};

    // Lattice
    pub use beamline_lattice::{
        Container, ContainerKind, IntermediateElement, IntermediateKind, Lattice,
        LatticeGenerator,
    };

    // Synchronization
    pub use beamline_sync::{
        BatchReport, ChannelHandle, ChannelSource, NoChannels, ResyncReport, SyncMode,
        SynchronizationManager,
    };

    // Scenario
    pub use beamline_scenario::{Scenario, Tracker};
}
