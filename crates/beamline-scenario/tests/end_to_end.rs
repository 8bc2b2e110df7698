//! End-to-end scenario tests: generation from an intermediate stream,
//! the synchronization tiers, and whole-lattice map composition.

use beamline_core::{keys, HardwareId, HardwareNode, SyncError};
use beamline_elements::ElementKind;
use beamline_lattice::{normalize, ContainerKind, IntermediateElement, IntermediateKind};
use beamline_scenario::Scenario;
use beamline_sync::{ChannelHandle, NoChannels, SyncMode};
use beamline_test_utils::{proton_probe, quad_node, MockChannelSource};
use indexmap::IndexMap;

fn field_handle(node: &str) -> ChannelHandle {
    ChannelHandle::new(HardwareId::new(node), "fieldRB")
}

fn node_map(nodes: Vec<HardwareNode>) -> IndexMap<HardwareId, HardwareNode> {
    nodes.into_iter().map(|n| (n.id.clone(), n)).collect()
}

/// [drift 1.0 m][quad 0.5 m][drift 1.0 m], one hardware quad "Q1".
fn fodo_cell() -> (Vec<IntermediateElement>, IndexMap<HardwareId, HardwareNode>) {
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
    (stream, node_map(vec![quad_node("Q1", 4.2)]))
}

fn quad_field(scenario: &Scenario, element_id: &str) -> f64 {
    let id = scenario.lattice().find_element(element_id).unwrap();
    match &scenario.lattice().element(id).unwrap().kind {
        ElementKind::Quadrupole(p) => p.field,
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn design_mode_drift_quad_drift_is_symplectic() {
    let (stream, nodes) = fodo_cell();
    let mut scenario = Scenario::generate(
        "CELL",
        ContainerKind::Linear,
        &normalize(stream),
        &nodes,
        SyncMode::Design,
        proton_probe(),
    )
    .unwrap();

    let report = scenario.resync(&NoChannels);
    assert!(report.is_clean());
    assert!(report.io.is_none());
    assert_eq!(quad_field(&scenario, "QH01"), 4.2);

    let map = scenario.full_map().unwrap();
    assert!(map.is_homogeneous());
    assert!((map.linear_determinant() - 1.0).abs() < 1e-9);
}

#[test]
fn model_input_overrides_live_and_removal_restores_it() {
    let (stream, nodes) = fodo_cell();
    let mut scenario = Scenario::generate(
        "CELL",
        ContainerKind::Linear,
        &normalize(stream),
        &nodes,
        SyncMode::Live,
        proton_probe(),
    )
    .unwrap();

    let mut source = MockChannelSource::new();
    source.set(field_handle("Q1"), 3.7);

    let q1 = HardwareId::new("Q1");
    scenario.set_model_input(q1.clone(), keys::FIELD, 9.9);
    assert!(scenario.resync(&source).is_clean());
    assert_eq!(quad_field(&scenario, "QH01"), 9.9);

    assert_eq!(scenario.remove_model_input(&q1, keys::FIELD), Some(9.9));
    assert!(scenario.resync_from_cache().is_clean());
    assert_eq!(quad_field(&scenario, "QH01"), 3.7);
}

#[test]
fn model_input_removal_restores_design_in_design_mode() {
    let (stream, nodes) = fodo_cell();
    let mut scenario = Scenario::generate(
        "CELL",
        ContainerKind::Linear,
        &normalize(stream),
        &nodes,
        SyncMode::Design,
        proton_probe(),
    )
    .unwrap();

    let q1 = HardwareId::new("Q1");
    scenario.set_model_input(q1.clone(), keys::FIELD, 9.9);
    scenario.resync(&NoChannels);
    assert_eq!(quad_field(&scenario, "QH01"), 9.9);

    scenario.remove_model_input(&q1, keys::FIELD);
    scenario.resync(&NoChannels);
    assert_eq!(quad_field(&scenario, "QH01"), 4.2);
}

#[test]
fn cache_resync_reproduces_a_live_resync() {
    let (stream, nodes) = fodo_cell();
    let mut scenario = Scenario::generate(
        "CELL",
        ContainerKind::Linear,
        &normalize(stream),
        &nodes,
        SyncMode::Live,
        proton_probe(),
    )
    .unwrap();

    let mut source = MockChannelSource::new();
    source.set(field_handle("Q1"), 3.7);
    assert!(scenario.resync(&source).is_clean());
    let live_map = scenario.full_map().unwrap();

    assert!(scenario.resync_from_cache().is_clean());
    assert_eq!(quad_field(&scenario, "QH01"), 3.7);
    let cached_map = scenario.full_map().unwrap();
    assert_eq!(live_map, cached_map);
}

#[test]
fn partial_batch_read_synchronizes_the_resolved_subset() {
    let stream: Vec<IntermediateElement> = (1..=5)
        .map(|i| {
            IntermediateElement::device(
                IntermediateKind::Quad,
                format!("QH{i:02}"),
                HardwareId::new(format!("Q{i}")),
                0.5,
                i as f64,
            )
        })
        .collect();
    let nodes = node_map(
        (1..=5)
            .map(|i| quad_node(&format!("Q{i}"), i as f64))
            .collect(),
    );
    let mut scenario = Scenario::generate(
        "LINE",
        ContainerKind::Linear,
        &stream,
        &nodes,
        SyncMode::Live,
        proton_probe(),
    )
    .unwrap();

    // Q2 and Q4 stop answering; the other three resolve.
    let mut source = MockChannelSource::new();
    for i in 1..=5 {
        source.set(field_handle(&format!("Q{i}")), 10.0 + i as f64);
    }
    source.hold_back(field_handle("Q2"));
    source.hold_back(field_handle("Q4"));

    let report = scenario.resync(&source);
    let io = report.io.unwrap();
    assert_eq!(io.requested, 5);
    assert_eq!(io.resolved, 3);
    assert_eq!(quad_field(&scenario, "QH01"), 11.0);
    assert_eq!(quad_field(&scenario, "QH05"), 15.0);

    // Exactly the two unresolved required fields fail.
    assert_eq!(report.errors.len(), 2);
    for err in &report.errors {
        match err {
            SyncError::MissingProperty { element, property } => {
                assert_eq!(*property, keys::FIELD);
                assert!(element == "QH02" || element == "QH04");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    // Resolved entries stay queryable; an override fills the gap for
    // one of the silent nodes.
    let values = scenario.properties_for_node(&HardwareId::new("Q1")).unwrap();
    assert_eq!(values[keys::FIELD], 11.0);

    scenario.set_model_input(HardwareId::new("Q2"), keys::FIELD, 2.5);
    let values = scenario.properties_for_node(&HardwareId::new("Q2")).unwrap();
    assert_eq!(values[keys::FIELD], 2.5);

    let report = scenario.resync_from_cache();
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        &report.errors[0],
        SyncError::MissingProperty { element, .. } if element == "QH04"
    ));
    assert_eq!(quad_field(&scenario, "QH02"), 2.5);
}
