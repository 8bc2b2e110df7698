//! Scenario runtime: one lattice, one synchronization manager, one
//! probe.
//!
//! A [`Scenario`] owns everything a model run needs and orchestrates
//! the two halves of the core: resynchronization (delegated to the
//! manager) and propagation (delegated to an external [`Tracker`]
//! collaborator). The scenario itself only walks the lattice for the
//! whole-machine composite map used by diagnostics and tests.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod scenario;
mod tracker;

pub use scenario::Scenario;
pub use tracker::Tracker;
