//! Neuron Capability Traits

use crate::value::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Single skeleton node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: i64,
    /// `None` for root nodes
    pub parent_id: Option<i64>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    /// SWC structure label (1 = soma)
    pub label: i32,
}

impl Node {
    /// Create a node with zero radius and undefined label
    pub fn new(node_id: i64, parent_id: Option<i64>, position: [f64; 3]) -> Self {
        Self {
            node_id,
            parent_id,
            x: position[0],
            y: position[1],
            z: position[2],
            radius: 0.0,
            label: 0,
        }
    }

    /// Set the node radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the SWC label
    pub fn with_label(mut self, label: i32) -> Self {
        self.label = label;
        self
    }

    /// Euclidean distance to another node
    pub fn distance(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Topological role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Slab,
    Branch,
    End,
}

/// Synaptic connector attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub connector_id: i64,
    pub node_id: i64,
    pub kind: ConnectorKind,
}

/// Connector polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    Presynapse,
    Postsynapse,
}

/// Anything that can be described by named attributes and a summary row.
///
/// `attribute` returns `None` when the neuron has no attribute of that name
/// and `Some(AttrValue::Missing)` when the attribute exists but is unset.
pub trait Neuron {
    /// Neuron name, if it has one
    fn name(&self) -> Option<&str>;

    /// Look up a named attribute
    fn attribute(&self, name: &str) -> Option<AttrValue>;

    /// Ordered (column, value) pairs contributed to a collection summary table
    fn summary_row(&self) -> Vec<(String, AttrValue)>;
}

/// Ordered path of nodes cut out of a neuron
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neurite {
    pub nodes: Vec<Node>,
}

impl Neurite {
    /// Summed length between consecutive nodes
    pub fn cable_length(&self) -> f64 {
        self.nodes.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// Mean node radius, NaN for an empty neurite
    pub fn mean_radius(&self) -> f64 {
        mean(self.nodes.iter().map(|n| n.radius))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Geometric measurements over a node skeleton.
///
/// Implementors only expose their nodes; every measurement is derived from
/// them. Nodes whose parent is absent from the skeleton are treated as roots.
pub trait Morphology: Neuron {
    /// All skeleton nodes
    fn nodes(&self) -> &[Node];

    /// Soma node id, if one is known
    fn soma(&self) -> Option<i64> {
        self.nodes().iter().find(|n| n.label == 1).map(|n| n.node_id)
    }

    /// Indices of the children of every node, keyed by parent node id
    fn children(&self) -> HashMap<i64, Vec<usize>> {
        let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
        for (idx, node) in self.nodes().iter().enumerate() {
            if let Some(parent) = node.parent_id {
                children.entry(parent).or_default().push(idx);
            }
        }
        children
    }

    /// Indices of root nodes
    fn roots(&self) -> Vec<usize> {
        let ids: HashMap<i64, usize> = node_index(self.nodes());
        self.nodes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent_id.map_or(true, |p| !ids.contains_key(&p)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Topological type of every node, in node order
    fn node_types(&self) -> Vec<NodeType> {
        let children = self.children();
        let roots = self.roots();
        self.nodes()
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let n_children = children.get(&node.node_id).map_or(0, Vec::len);
                if roots.contains(&idx) {
                    NodeType::Root
                } else if n_children == 0 {
                    NodeType::End
                } else if n_children > 1 {
                    NodeType::Branch
                } else {
                    NodeType::Slab
                }
            })
            .collect()
    }

    /// Number of leaf nodes
    fn n_leafs(&self) -> usize {
        self.node_types().iter().filter(|t| **t == NodeType::End).count()
    }

    /// Number of branch points
    fn n_branches(&self) -> usize {
        let children = self.children();
        children.values().filter(|c| c.len() > 1).count()
    }

    /// Total length of all parent-child edges
    fn cable_length(&self) -> f64 {
        let nodes = self.nodes();
        let ids = node_index(nodes);
        nodes
            .iter()
            .filter_map(|n| {
                let parent = ids.get(&n.parent_id?)?;
                Some(n.distance(&nodes[*parent]))
            })
            .sum()
    }

    /// Longest root-to-leaf path, measured along the cable
    fn longest_neurite(&self) -> Neurite {
        let nodes = self.nodes();
        let children = self.children();
        let mut prev: Vec<Option<usize>> = vec![None; nodes.len()];
        let mut best: Option<(f64, usize)> = None;

        for root in self.roots() {
            // Depth-first walk carrying the distance from the root
            let mut stack = vec![(root, 0.0f64)];
            while let Some((idx, dist)) = stack.pop() {
                match children.get(&nodes[idx].node_id) {
                    Some(kids) if !kids.is_empty() => {
                        for &child in kids {
                            prev[child] = Some(idx);
                            stack.push((child, dist + nodes[idx].distance(&nodes[child])));
                        }
                    }
                    _ => {
                        if best.map_or(true, |(d, _)| dist > d) {
                            best = Some((dist, idx));
                        }
                    }
                }
            }
        }

        let mut path = Vec::new();
        let mut current = best.map(|(_, leaf)| leaf);
        while let Some(idx) = current {
            path.push(nodes[idx].clone());
            current = prev[idx];
        }
        path.reverse();
        Neurite { nodes: path }
    }

    /// Unbranched fiber leaving the soma (or the first root without a soma),
    /// up to and including the first branch point
    fn cell_body_fiber(&self) -> Neurite {
        let nodes = self.nodes();
        let ids = node_index(nodes);
        let start = self
            .soma()
            .and_then(|id| ids.get(&id).copied())
            .or_else(|| self.roots().first().copied());
        let Some(mut current) = start else {
            return Neurite::default();
        };

        let children = self.children();
        let mut path = vec![nodes[current].clone()];
        while let Some(kids) = children.get(&nodes[current].node_id) {
            if kids.len() != 1 || path.len() > nodes.len() {
                break;
            }
            current = kids[0];
            path.push(nodes[current].clone());
        }
        Neurite { nodes: path }
    }
}

/// Map node id -> position in the node slice
pub(crate) fn node_index(nodes: &[Node]) -> HashMap<i64, usize> {
    nodes.iter().enumerate().map(|(idx, n)| (n.node_id, idx)).collect()
}
