//! Read-only view of hardware nodes.
//!
//! The machine description is owned by an external collaborator; this
//! module defines the slice of it the model consumes: a device-kind
//! capability tag, design-default property values, and (for bend
//! magnets) the static geometry the generator needs to resolve
//! fractional bend quantities.

use std::fmt;

use indexmap::IndexMap;

use crate::{HardwareId, PropertyKey};

/// Capability tag of a hardware node's device family.
///
/// Registries resolve synchronizers and property accessors by walking
/// a kind's [supertag chain](DeviceKind::supertags): a handler
/// registered for `Electromagnet` serves every electromagnet subtype
/// unless a more specific handler is registered first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Generic iron-dominated electromagnet (supertag of the magnet
    /// kinds below).
    Electromagnet,
    /// Bending dipole magnet.
    BendMagnet,
    /// Quadrupole magnet.
    QuadMagnet,
    /// Quadrupole rotated 45° about the beam axis.
    SkewQuadMagnet,
    /// Solenoid magnet.
    SolenoidMagnet,
    /// Steering (corrector) dipole.
    CorrectorMagnet,
    /// Sextupole magnet.
    SextupoleMagnet,
    /// Permanent-magnet quadrupole; has no live channels.
    PermanentQuad,
    /// RF accelerating cavity or gap.
    RfCavity,
    /// Beam diagnostic (monitor, marker); never resynchronized.
    Diagnostic,
}

impl DeviceKind {
    /// The kind's supertags, most specific first, not including the
    /// kind itself.
    pub fn supertags(self) -> &'static [DeviceKind] {
        match self {
            Self::BendMagnet
            | Self::QuadMagnet
            | Self::SkewQuadMagnet
            | Self::SolenoidMagnet
            | Self::CorrectorMagnet
            | Self::SextupoleMagnet => &[Self::Electromagnet],
            Self::Electromagnet
            | Self::PermanentQuad
            | Self::RfCavity
            | Self::Diagnostic => &[],
        }
    }

    /// The kind itself followed by its supertag chain; the order a
    /// registry probes for a handler.
    pub fn resolution_chain(self) -> impl Iterator<Item = DeviceKind> {
        std::iter::once(self).chain(self.supertags().iter().copied())
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Electromagnet => "electromagnet",
            Self::BendMagnet => "bend magnet",
            Self::QuadMagnet => "quadrupole magnet",
            Self::SkewQuadMagnet => "skew quadrupole magnet",
            Self::SolenoidMagnet => "solenoid magnet",
            Self::CorrectorMagnet => "corrector magnet",
            Self::SextupoleMagnet => "sextupole magnet",
            Self::PermanentQuad => "permanent-magnet quadrupole",
            Self::RfCavity => "rf cavity",
            Self::Diagnostic => "diagnostic",
        };
        write!(f, "{name}")
    }
}

/// Transverse orientation of a magnet.
///
/// `Unknown` is a recoverable condition: the generator logs a warning
/// and constructs the element anyway, treating it as horizontal for
/// optics purposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Focusing in the horizontal plane.
    #[default]
    Horizontal,
    /// Focusing in the vertical plane.
    Vertical,
    /// Orientation could not be resolved from the hardware node.
    Unknown,
}

/// Static geometry of a bend magnet, as designed.
///
/// All angles are stored in degrees, exactly as the hardware
/// description carries them; the lattice generator is the only place
/// that converts to radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BendGeometry {
    /// Design bending field, T.
    pub design_field: f64,
    /// Design arc path length through the magnet, m.
    pub design_path_length: f64,
    /// Design bend angle, degrees.
    pub design_bend_angle_deg: f64,
    /// Entrance pole-face rotation, degrees.
    pub entrance_angle_deg: f64,
    /// Exit pole-face rotation, degrees.
    pub exit_angle_deg: f64,
    /// Quadrupole-error component of the field, T/m.
    pub quad_component: f64,
}

/// The model's read-only view of one physical device.
#[derive(Clone, Debug)]
pub struct HardwareNode {
    /// Device id in the machine description.
    pub id: HardwareId,
    /// Capability tag used for registry resolution.
    pub kind: DeviceKind,
    /// Transverse orientation, where applicable.
    pub orientation: Orientation,
    /// Design-default property values.
    pub design: IndexMap<PropertyKey, f64>,
    /// Bend geometry; present for bend magnets only.
    pub bend: Option<BendGeometry>,
}

impl HardwareNode {
    /// Create a node with no design defaults and no bend geometry.
    pub fn new(id: impl Into<HardwareId>, kind: DeviceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            orientation: Orientation::default(),
            design: IndexMap::new(),
            bend: None,
        }
    }

    /// Set the node's orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Add a design-default property value.
    pub fn with_design(mut self, key: PropertyKey, value: f64) -> Self {
        self.design.insert(key, value);
        self
    }

    /// Attach bend geometry.
    pub fn with_bend(mut self, bend: BendGeometry) -> Self {
        self.bend = Some(bend);
        self
    }

    /// Look up a design default.
    pub fn design_value(&self, key: PropertyKey) -> Option<f64> {
        self.design.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnet_kinds_resolve_through_electromagnet() {
        for kind in [
            DeviceKind::BendMagnet,
            DeviceKind::QuadMagnet,
            DeviceKind::SkewQuadMagnet,
            DeviceKind::SolenoidMagnet,
            DeviceKind::CorrectorMagnet,
            DeviceKind::SextupoleMagnet,
        ] {
            let chain: Vec<_> = kind.resolution_chain().collect();
            assert_eq!(chain, vec![kind, DeviceKind::Electromagnet]);
        }
    }

    #[test]
    fn leaf_kinds_have_single_entry_chains() {
        for kind in [
            DeviceKind::PermanentQuad,
            DeviceKind::RfCavity,
            DeviceKind::Diagnostic,
        ] {
            assert_eq!(kind.resolution_chain().count(), 1);
        }
    }
}
