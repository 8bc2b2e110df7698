//! Intermediate-element records: the hardware-oriented input stream
//! consumed exactly once by the generator, plus the pre-generation
//! normalization pass.

use beamline_core::HardwareId;

/// Type tag of an intermediate element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntermediateKind {
    /// Field-free gap; carries no hardware node.
    Drift,
    /// Section of a bending dipole.
    Bend,
    /// Quadrupole section.
    Quad,
    /// Skew quadrupole section.
    SkewQuad,
    /// Solenoid section.
    Solenoid,
    /// RF gap.
    RfGap,
    /// Steering corrector.
    Corrector,
    /// Sextupole section.
    Sextupole,
    /// Structural marker; removed by normalization.
    Marker,
    /// Beam monitor; kept as a marker element for lookup.
    Monitor,
}

/// Which part of its hardware node a section covers.
///
/// A node split into sections carries its entrance pole face only on
/// the upstream section and its exit pole face only on the downstream
/// section; an unsplit node carries both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectionFraction {
    /// The whole node in one section.
    #[default]
    Entire,
    /// Upstream part, containing the entrance face.
    Upstream,
    /// Interior part, containing neither face.
    Interior,
    /// Downstream part, containing the exit face.
    Downstream,
}

impl SectionFraction {
    /// Whether this section physically includes the entrance face.
    pub fn has_entrance(self) -> bool {
        matches!(self, Self::Entire | Self::Upstream)
    }

    /// Whether this section physically includes the exit face.
    pub fn has_exit(self) -> bool {
        matches!(self, Self::Entire | Self::Downstream)
    }
}

/// One record of the intermediate lattice.
#[derive(Clone, Debug)]
pub struct IntermediateElement {
    /// Type tag driving the construction rule.
    pub kind: IntermediateKind,
    /// Record id; becomes the element id (except for drifts, which get
    /// synthetic ids).
    pub id: String,
    /// Originating hardware node; `None` for drifts and structural
    /// markers.
    pub hardware: Option<HardwareId>,
    /// Section length, m.
    pub length: f64,
    /// s-position of the section center, m.
    pub center: f64,
    /// Which part of the node this section covers.
    pub fraction: SectionFraction,
}

impl IntermediateElement {
    /// A drift record.
    pub fn drift(length: f64, center: f64) -> Self {
        Self {
            kind: IntermediateKind::Drift,
            id: String::new(),
            hardware: None,
            length,
            center,
            fraction: SectionFraction::Entire,
        }
    }

    /// A record backed by a hardware node.
    pub fn device(
        kind: IntermediateKind,
        id: impl Into<String>,
        hardware: HardwareId,
        length: f64,
        center: f64,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            hardware: Some(hardware),
            length,
            center,
            fraction: SectionFraction::Entire,
        }
    }

    /// Set the section fraction.
    pub fn with_fraction(mut self, fraction: SectionFraction) -> Self {
        self.fraction = fraction;
        self
    }
}

/// Pre-generation cleanup: drop structural markers and join runs of
/// adjacent drifts into single records.
///
/// Monitors survive — they become marker elements the model keeps for
/// lookup. Joined drifts span from the start of the first to the end
/// of the last drift in the run.
pub fn normalize(stream: Vec<IntermediateElement>) -> Vec<IntermediateElement> {
    let mut out: Vec<IntermediateElement> = Vec::with_capacity(stream.len());
    for rec in stream {
        if rec.kind == IntermediateKind::Marker && rec.hardware.is_none() {
            continue;
        }
        if rec.kind == IntermediateKind::Drift {
            if let Some(prev) = out.last_mut() {
                if prev.kind == IntermediateKind::Drift {
                    let start = prev.center - prev.length / 2.0;
                    let end = rec.center + rec.length / 2.0;
                    prev.length = end - start;
                    prev.center = (start + end) / 2.0;
                    continue;
                }
            }
        }
        out.push(rec);
    }
    out
}
