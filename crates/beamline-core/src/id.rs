//! Strongly-typed identifiers.

use std::fmt;
use std::sync::Arc;

/// Identifies a hardware node (physical device) in the machine
/// description.
///
/// The node itself is owned by the hardware/control collaborator; the
/// model refers to it only by id. Cheap to clone — the string is
/// reference-counted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HardwareId(Arc<str>);

impl HardwareId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HardwareId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

/// Index of a node (element or container) within a lattice arena.
///
/// `NodeId(n)` refers to the n-th node allocated by the lattice that
/// issued it. Ids are only meaningful against the lattice they came
/// from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The id as a usize index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
