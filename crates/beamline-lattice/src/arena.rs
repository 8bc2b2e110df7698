//! Flat node arena for the generated lattice.
//!
//! The arena exclusively owns every node; structure is expressed by
//! child-id lists on containers and non-owning parent back-links.
//! Nothing here is reclaimed individually — a lattice is built once by
//! the generator and dropped whole with its scenario.

use beamline_core::NodeId;
use beamline_elements::{Alignment, TransportElement};

/// Container kind. Rings differ from linear sequences only in
/// boundary handling during propagation; structurally they are
/// identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainerKind {
    /// Open sequence.
    #[default]
    Linear,
    /// Periodic (closed) sequence.
    Ring,
}

/// An ordered container of elements and nested containers.
#[derive(Clone, Debug)]
pub struct Container {
    /// Display label.
    pub label: String,
    /// Linear or ring.
    pub kind: ContainerKind,
    /// The container's own rigid-body alignment error, propagated down
    /// to everything it holds.
    pub align: Alignment,
    /// RF frequency carried by this container, if it is RF-bearing.
    /// Elements anywhere below an RF-bearing container accumulate RF
    /// phase advance from their time of flight.
    pub rf_frequency: Option<f64>,
    children: Vec<NodeId>,
}

impl Container {
    /// Create an empty container.
    pub fn new(label: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            label: label.into(),
            kind,
            align: Alignment::ideal(),
            rf_frequency: None,
            children: Vec::new(),
        }
    }

    /// Child node ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// One arena slot: an element or a container.
#[derive(Clone, Debug)]
pub enum Node {
    /// A transport element.
    Element(TransportElement),
    /// A container of further nodes.
    Container(Container),
}

/// The generated lattice: an arena of nodes rooted at one container.
#[derive(Clone, Debug)]
pub struct Lattice {
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
    root: NodeId,
}

impl Lattice {
    /// Create a lattice holding only the given root container.
    pub fn new(root: Container) -> Self {
        Self {
            nodes: vec![Node::Container(root)],
            parents: vec![None],
            root: NodeId(0),
        }
    }

    /// Id of the root container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, containers included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds only the empty root.
    pub fn is_empty(&self) -> bool {
        self.ordered_elements().is_empty()
    }

    fn push(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.parents.push(Some(parent));
        match &mut self.nodes[parent.index()] {
            Node::Container(c) => c.children.push(id),
            Node::Element(_) => panic!("parent {parent} is not a container"),
        }
        id
    }

    /// Append a container under `parent`.
    pub fn add_container(&mut self, parent: NodeId, container: Container) -> NodeId {
        self.push(parent, Node::Container(container))
    }

    /// Append an element under `parent`.
    pub fn add_element(&mut self, parent: NodeId, element: TransportElement) -> NodeId {
        self.push(parent, Node::Element(element))
    }

    /// The node at `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The element at `id`, if that node is an element.
    pub fn element(&self, id: NodeId) -> Option<&TransportElement> {
        match self.node(id) {
            Node::Element(e) => Some(e),
            Node::Container(_) => None,
        }
    }

    /// Mutable access to the element at `id`.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut TransportElement> {
        match &mut self.nodes[id.index()] {
            Node::Element(e) => Some(e),
            Node::Container(_) => None,
        }
    }

    /// The container at `id`, if that node is a container.
    pub fn container(&self, id: NodeId) -> Option<&Container> {
        match self.node(id) {
            Node::Container(c) => Some(c),
            Node::Element(_) => None,
        }
    }

    /// Mutable access to the container at `id`.
    pub fn container_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        match &mut self.nodes[id.index()] {
            Node::Container(c) => Some(c),
            Node::Element(_) => None,
        }
    }

    /// Non-owning parent link of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }

    /// Walk from `id` up to the root, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&n| self.parent(n))
    }

    /// All element ids in beamline order (depth-first through nested
    /// containers).
    pub fn ordered_elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::Element(_) => out.push(id),
                Node::Container(c) => stack.extend(c.children().iter().rev()),
            }
        }
        out
    }

    /// Fold the alignment errors of every container above `id` (the
    /// element's own error is not included).
    pub fn composed_alignment(&self, id: NodeId) -> Alignment {
        self.ancestors(id)
            .filter_map(|n| self.container(n))
            .fold(Alignment::ideal(), |acc, c| acc.composed_with(&c.align))
    }

    /// RF frequency of the nearest RF-bearing container above `id`,
    /// if any. No such container means zero phase advance.
    pub fn rf_frequency_for(&self, id: NodeId) -> Option<f64> {
        self.ancestors(id)
            .filter_map(|n| self.container(n))
            .find_map(|c| c.rf_frequency)
    }

    /// Find an element by id string.
    pub fn find_element(&self, element_id: &str) -> Option<NodeId> {
        self.ordered_elements()
            .into_iter()
            .find(|&n| self.element(n).map(|e| e.id.as_str()) == Some(element_id))
    }
}
