//! Lattice structure and the hardware-to-model generator.
//!
//! A [`Lattice`] is a flat arena of nodes — transport elements and the
//! containers (linear sequences or rings) that hold them — with plain
//! index back-references instead of owning parent pointers. The
//! [`LatticeGenerator`] converts an ordered stream of intermediate
//! elements into exactly one lattice, one transport element per
//! intermediate record, registering each with the synchronization
//! layer as it goes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod arena;
mod generator;
mod intermediate;

pub use arena::{Container, ContainerKind, Lattice, Node};
pub use generator::{LatticeGenerator, SyncRegistrar};
pub use intermediate::{normalize, IntermediateElement, IntermediateKind, SectionFraction};
