//! One-shot translator from an intermediate-element stream to a
//! lattice of transport elements.
//!
//! Each generation pass owns its own drift counter and output
//! container; nothing is shared across passes. Generation is
//! all-or-nothing: the first hard failure aborts and no partial
//! lattice is returned.

use beamline_core::{
    keys, GenerationError, HardwareId, HardwareNode, NodeId, Orientation,
};
use beamline_elements::{
    CorrectorParams, DipoleParams, ElementKind, QuadParams, RfGapParams, SolenoidParams,
    TransportElement,
};
use indexmap::IndexMap;
use tracing::warn;

use crate::arena::{Container, ContainerKind, Lattice};
use crate::intermediate::{IntermediateElement, IntermediateKind};

/// Sink for element/hardware associations, implemented by the
/// synchronization manager.
///
/// Every constructed element backed by a hardware node is registered,
/// whether or not a synchronizer exists for its type — unregistered
/// types are tracked for lookup, never resynchronized.
pub trait SyncRegistrar {
    /// Record that lattice node `element` originates from `node`.
    fn register(&mut self, element: NodeId, node: &HardwareNode);
}

/// A registrar that keeps nothing; for lattices built without a
/// synchronization layer.
impl SyncRegistrar for () {
    fn register(&mut self, _element: NodeId, _node: &HardwareNode) {}
}

/// The lattice generator: a table of construction rules keyed by
/// intermediate-element kind.
pub struct LatticeGenerator<'a> {
    nodes: &'a IndexMap<HardwareId, HardwareNode>,
}

impl<'a> LatticeGenerator<'a> {
    /// Create a generator resolving hardware ids against `nodes`.
    pub fn new(nodes: &'a IndexMap<HardwareId, HardwareNode>) -> Self {
        Self { nodes }
    }

    /// Translate `stream` into a lattice under a root container of
    /// the given kind, registering every hardware-backed element with
    /// `registrar`.
    pub fn generate(
        &self,
        label: &str,
        kind: ContainerKind,
        stream: &[IntermediateElement],
        registrar: &mut dyn SyncRegistrar,
    ) -> Result<Lattice, GenerationError> {
        let mut lattice = Lattice::new(Container::new(label, kind));
        let root = lattice.root();
        let mut drift_counter = 0u32;
        let mut rf_frequency = None;

        for rec in stream {
            let (element, node) = self.construct(rec, &mut drift_counter)?;
            if let ElementKind::RfGap(p) = &element.kind {
                // A gap without a design frequency must not mark the
                // container RF-bearing with NaN.
                if p.frequency.is_finite() {
                    rf_frequency.get_or_insert(p.frequency);
                }
            }
            let id = lattice.add_element(root, element);
            if let Some(node) = node {
                registrar.register(id, node);
            }
        }

        lattice.container_mut(root).expect("root is a container").rf_frequency = rf_frequency;
        Ok(lattice)
    }

    /// Apply the construction rule for one record.
    fn construct(
        &self,
        rec: &IntermediateElement,
        drift_counter: &mut u32,
    ) -> Result<(TransportElement, Option<&'a HardwareNode>), GenerationError> {
        if rec.kind == IntermediateKind::Drift {
            *drift_counter += 1;
            let id = format!("DR{drift_counter}");
            let element = TransportElement::new(id, ElementKind::Drift, rec.length, rec.center);
            return Ok((element, None));
        }

        let node = self.resolve_node(rec)?;
        let kind = match rec.kind {
            IntermediateKind::Drift => unreachable!("handled above"),
            IntermediateKind::Bend => self.bend_kind(rec, node)?,
            IntermediateKind::Quad => {
                ElementKind::Quadrupole(self.quad_params(node))
            }
            IntermediateKind::SkewQuad => ElementKind::SkewQuadrupole(self.quad_params(node)),
            IntermediateKind::Solenoid => ElementKind::Solenoid(SolenoidParams { field: f64::NAN }),
            IntermediateKind::RfGap => ElementKind::RfGap(RfGapParams {
                etl: f64::NAN,
                phase: f64::NAN,
                frequency: node.design_value(keys::FREQUENCY).unwrap_or(f64::NAN),
            }),
            IntermediateKind::Corrector => ElementKind::Corrector(CorrectorParams {
                field: f64::NAN,
                orientation: self.orientation_of(node),
            }),
            IntermediateKind::Sextupole => ElementKind::Sextupole,
            IntermediateKind::Marker | IntermediateKind::Monitor => ElementKind::Marker,
        };

        let element = TransportElement::new(rec.id.clone(), kind, rec.length, rec.center);
        Ok((element, Some(node)))
    }

    fn resolve_node(&self, rec: &IntermediateElement) -> Result<&'a HardwareNode, GenerationError> {
        let id = rec
            .hardware
            .as_ref()
            .ok_or_else(|| GenerationError::IntermediateLattice {
                reason: format!("record '{}' carries no hardware reference", rec.id),
            })?;
        self.nodes
            .get(id)
            .ok_or_else(|| GenerationError::UnknownHardware { node: id.clone() })
    }

    fn orientation_of(&self, node: &HardwareNode) -> Orientation {
        if node.orientation == Orientation::Unknown {
            warn!(node = %node.id, "orientation unresolved; constructing unoriented element");
        }
        node.orientation
    }

    fn quad_params(&self, node: &HardwareNode) -> QuadParams {
        QuadParams {
            field: f64::NAN,
            orientation: self.orientation_of(node),
        }
    }

    /// Resolve the fractional bend quantities for one section of a
    /// bend magnet.
    ///
    /// The hardware carries whole-magnet design values; a section of
    /// fractional length gets the proportional share of the bend
    /// angle, and the pole-face rotations only on the sections that
    /// physically include the corresponding face. Degrees convert to
    /// radians here and nowhere else.
    fn bend_kind(
        &self,
        rec: &IntermediateElement,
        node: &HardwareNode,
    ) -> Result<ElementKind, GenerationError> {
        let geom = node.bend.ok_or_else(|| GenerationError::BadBendGeometry {
            node: node.id.clone(),
            reason: "no bend geometry on node".into(),
        })?;

        let bend_angle = geom.design_bend_angle_deg.to_radians();
        if bend_angle.abs() < 1e-12 || geom.design_path_length <= 0.0 {
            return Err(GenerationError::BadBendGeometry {
                node: node.id.clone(),
                reason: format!(
                    "degenerate design (angle {} deg, path {} m)",
                    geom.design_bend_angle_deg, geom.design_path_length
                ),
            });
        }

        let radius = geom.design_path_length / bend_angle;
        let field_index = -geom.quad_component * radius * radius;

        let entrance_angle = if rec.fraction.has_entrance() {
            geom.entrance_angle_deg.to_radians()
        } else {
            0.0
        };
        let exit_angle = if rec.fraction.has_exit() {
            geom.exit_angle_deg.to_radians()
        } else {
            0.0
        };

        Ok(ElementKind::Dipole(DipoleParams {
            field: f64::NAN,
            field_index,
            entrance_angle,
            exit_angle,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_core::{BendGeometry, DeviceKind};
    use crate::intermediate::SectionFraction;

    struct Recording(Vec<(NodeId, HardwareId)>);

    impl SyncRegistrar for Recording {
        fn register(&mut self, element: NodeId, node: &HardwareNode) {
            self.0.push((element, node.id.clone()));
        }
    }

    fn bend_node(id: &str) -> HardwareNode {
        HardwareNode::new(id, DeviceKind::BendMagnet).with_bend(BendGeometry {
            design_field: 1.2,
            design_path_length: 2.0,
            design_bend_angle_deg: 20.0,
            entrance_angle_deg: 5.0,
            exit_angle_deg: 7.0,
            quad_component: 0.05,
        })
    }

    fn node_table(nodes: Vec<HardwareNode>) -> IndexMap<HardwareId, HardwareNode> {
        nodes.into_iter().map(|n| (n.id.clone(), n)).collect()
    }

    #[test]
    fn one_element_per_record_in_stream_order() {
        let nodes = node_table(vec![
            HardwareNode::new("Q1", DeviceKind::QuadMagnet)
                .with_orientation(Orientation::Horizontal),
        ]);
        let stream = vec![
            IntermediateElement::drift(1.0, 0.5),
            IntermediateElement::device(
                IntermediateKind::Quad,
                "QH01",
                HardwareId::new("Q1"),
                0.5,
                1.25,
            ),
            IntermediateElement::drift(1.0, 2.0),
        ];
        let gen = LatticeGenerator::new(&nodes);
        let mut reg = Recording(Vec::new());
        let lat = gen
            .generate("seq", ContainerKind::Linear, &stream, &mut reg)
            .unwrap();

        let ids: Vec<_> = lat
            .ordered_elements()
            .iter()
            .map(|&n| lat.element(n).unwrap().id.clone())
            .collect();
        assert_eq!(ids, vec!["DR1", "QH01", "DR2"]);
        // Only the hardware-backed element registers.
        assert_eq!(reg.0.len(), 1);
        assert_eq!(reg.0[0].1, HardwareId::new("Q1"));
    }

    #[test]
    fn drift_counter_is_scoped_per_run() {
        let nodes = node_table(vec![]);
        let stream = vec![IntermediateElement::drift(1.0, 0.5)];
        let gen = LatticeGenerator::new(&nodes);
        for _ in 0..2 {
            let lat = gen
                .generate("seq", ContainerKind::Linear, &stream, &mut ())
                .unwrap();
            let first = lat.ordered_elements()[0];
            assert_eq!(lat.element(first).unwrap().id, "DR1");
        }
    }

    #[test]
    fn split_bend_sections_carry_only_their_face() {
        let nodes = node_table(vec![bend_node("BM1")]);
        let gen = LatticeGenerator::new(&nodes);
        let upstream = IntermediateElement::device(
            IntermediateKind::Bend,
            "BM1a",
            HardwareId::new("BM1"),
            1.0,
            0.5,
        )
        .with_fraction(SectionFraction::Upstream);
        let downstream = IntermediateElement::device(
            IntermediateKind::Bend,
            "BM1b",
            HardwareId::new("BM1"),
            1.0,
            1.5,
        )
        .with_fraction(SectionFraction::Downstream);

        let lat = gen
            .generate(
                "seq",
                ContainerKind::Linear,
                &[upstream, downstream],
                &mut (),
            )
            .unwrap();
        let elems = lat.ordered_elements();
        let up = lat.element(elems[0]).unwrap();
        let down = lat.element(elems[1]).unwrap();

        let (up_params, down_params) = match (&up.kind, &down.kind) {
            (ElementKind::Dipole(a), ElementKind::Dipole(b)) => (a, b),
            other => panic!("expected dipoles, got {other:?}"),
        };
        assert!((up_params.entrance_angle - 5.0_f64.to_radians()).abs() < 1e-12);
        assert_eq!(up_params.exit_angle, 0.0);
        assert_eq!(down_params.entrance_angle, 0.0);
        assert!((down_params.exit_angle - 7.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn unsplit_bend_carries_both_faces_and_the_field_index() {
        let nodes = node_table(vec![bend_node("BM1")]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::Bend,
            "BM1",
            HardwareId::new("BM1"),
            2.0,
            1.0,
        );
        let lat = gen
            .generate("seq", ContainerKind::Linear, &[rec], &mut ())
            .unwrap();
        let elem = lat.element(lat.ordered_elements()[0]).unwrap();
        let params = match &elem.kind {
            ElementKind::Dipole(p) => p,
            other => panic!("expected dipole, got {other:?}"),
        };
        assert!(params.entrance_angle != 0.0 && params.exit_angle != 0.0);
        // radius = path / angle(rad); n = -quad·radius².
        let radius = 2.0 / 20.0_f64.to_radians();
        assert!((params.field_index - (-0.05 * radius * radius)).abs() < 1e-9);
    }

    #[test]
    fn unknown_hardware_aborts_generation() {
        let nodes = node_table(vec![]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::Quad,
            "QH01",
            HardwareId::new("missing"),
            0.5,
            0.25,
        );
        let err = gen
            .generate("seq", ContainerKind::Linear, &[rec], &mut ())
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::UnknownHardware {
                node: HardwareId::new("missing"),
            }
        );
    }

    #[test]
    fn degenerate_bend_geometry_is_fatal() {
        let mut node = bend_node("BM1");
        node.bend = Some(BendGeometry {
            design_bend_angle_deg: 0.0,
            ..node.bend.unwrap()
        });
        let nodes = node_table(vec![node]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::Bend,
            "BM1",
            HardwareId::new("BM1"),
            2.0,
            1.0,
        );
        let err = gen
            .generate("seq", ContainerKind::Linear, &[rec], &mut ())
            .unwrap_err();
        assert!(matches!(err, GenerationError::BadBendGeometry { .. }));
    }

    #[test]
    fn unoriented_quad_is_constructed_not_rejected() {
        let nodes = node_table(vec![
            HardwareNode::new("Q1", DeviceKind::QuadMagnet).with_orientation(Orientation::Unknown),
        ]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::Quad,
            "Q1",
            HardwareId::new("Q1"),
            0.5,
            0.25,
        );
        let lat = gen
            .generate("seq", ContainerKind::Linear, &[rec], &mut ())
            .unwrap();
        let elem = lat.element(lat.ordered_elements()[0]).unwrap();
        match &elem.kind {
            ElementKind::Quadrupole(p) => assert_eq!(p.orientation, Orientation::Unknown),
            other => panic!("expected quadrupole, got {other:?}"),
        }
    }

    #[test]
    fn skew_quad_records_construct_skew_elements() {
        let nodes = node_table(vec![
            HardwareNode::new("SQ1", DeviceKind::SkewQuadMagnet)
                .with_orientation(Orientation::Horizontal),
        ]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::SkewQuad,
            "SQ01",
            HardwareId::new("SQ1"),
            0.5,
            0.25,
        );
        let mut reg = Recording(Vec::new());
        let lat = gen
            .generate("seq", ContainerKind::Linear, &[rec], &mut reg)
            .unwrap();
        let elem = lat.element(lat.ordered_elements()[0]).unwrap();
        match &elem.kind {
            ElementKind::SkewQuadrupole(p) => assert!(p.field.is_nan()),
            other => panic!("expected skew quadrupole, got {other:?}"),
        }
        assert_eq!(reg.0[0].1, HardwareId::new("SQ1"));
    }

    #[test]
    fn rf_gap_marks_the_container_rf_bearing() {
        let nodes = node_table(vec![
            HardwareNode::new("RG1", DeviceKind::RfCavity).with_design(keys::FREQUENCY, 402.5e6),
        ]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::RfGap,
            "RG1",
            HardwareId::new("RG1"),
            0.0,
            0.0,
        );
        let lat = gen
            .generate("linac", ContainerKind::Linear, &[rec], &mut ())
            .unwrap();
        let gap = lat.ordered_elements()[0];
        assert_eq!(lat.rf_frequency_for(gap), Some(402.5e6));
    }

    #[test]
    fn rf_gap_without_a_design_frequency_leaves_the_container_unmarked() {
        let nodes = node_table(vec![HardwareNode::new("RG1", DeviceKind::RfCavity)]);
        let gen = LatticeGenerator::new(&nodes);
        let rec = IntermediateElement::device(
            IntermediateKind::RfGap,
            "RG1",
            HardwareId::new("RG1"),
            0.0,
            0.0,
        );
        let lat = gen
            .generate("linac", ContainerKind::Linear, &[rec], &mut ())
            .unwrap();
        let gap = lat.ordered_elements()[0];
        assert_eq!(lat.rf_frequency_for(gap), None);
    }
}
