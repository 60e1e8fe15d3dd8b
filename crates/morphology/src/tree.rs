//! Skeleton (tree-structured) neuron

use crate::error::MorphologyError;
use crate::neuron::{node_index, Connector, Morphology, Neuron, Node};
use crate::value::AttrValue;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Neuron represented as a tree of nodes
#[derive(Debug, Clone, Default)]
pub struct TreeNeuron {
    name: Option<String>,
    nodes: Vec<Node>,
    connectors: Vec<Connector>,
    soma: Option<i64>,
    units: Option<String>,
    /// Free-form metadata (e.g. from an SWC header), exposed as attributes
    meta: BTreeMap<String, AttrValue>,
}

impl TreeNeuron {
    /// Create a neuron from its nodes.
    ///
    /// Node ids must be unique and every parent must be part of the skeleton.
    pub fn new(nodes: Vec<Node>) -> Result<Self, MorphologyError> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.node_id) {
                return Err(MorphologyError::DuplicateNode(node.node_id));
            }
        }
        for node in &nodes {
            if let Some(parent) = node.parent_id {
                if !seen.contains(&parent) {
                    return Err(MorphologyError::UnknownParent {
                        node: node.node_id,
                        parent,
                    });
                }
            }
        }
        check_acyclic(&nodes)?;

        let soma = nodes.iter().find(|n| n.label == 1).map(|n| n.node_id);
        Ok(Self {
            nodes,
            soma,
            ..Default::default()
        })
    }

    /// Set the neuron name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the soma node explicitly
    pub fn with_soma(mut self, soma: Option<i64>) -> Self {
        self.soma = soma;
        self
    }

    /// Set spatial units (e.g. "8 nanometer")
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Attach connectors
    pub fn with_connectors(mut self, connectors: Vec<Connector>) -> Self {
        self.connectors = connectors;
        self
    }

    /// Attach a metadata attribute
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Connectors of this neuron
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Metadata attributes
    pub fn meta(&self) -> &BTreeMap<String, AttrValue> {
        &self.meta
    }

    /// Number of nodes
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of connectors
    pub fn n_connectors(&self) -> usize {
        self.connectors.len()
    }

    /// Whether a soma node is set and present in the skeleton
    pub fn has_soma(&self) -> bool {
        self.soma
            .map_or(false, |id| node_index(&self.nodes).contains_key(&id))
    }
}

impl Neuron for TreeNeuron {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn attribute(&self, name: &str) -> Option<AttrValue> {
        let value = match name {
            "type" => AttrValue::from("TreeNeuron"),
            "name" => self.name.clone().into(),
            "n_nodes" => self.n_nodes().into(),
            "n_connectors" => self.n_connectors().into(),
            "n_branches" => self.n_branches().into(),
            "n_leafs" => self.n_leafs().into(),
            "n_roots" => self.roots().len().into(),
            "cable_length" => self.cable_length().into(),
            "has_soma" => self.has_soma().into(),
            "soma" => self.soma.into(),
            "units" => self.units.clone().into(),
            other => return self.meta.get(other).cloned(),
        };
        Some(value)
    }

    fn summary_row(&self) -> Vec<(String, AttrValue)> {
        ["type", "name", "n_nodes", "n_connectors", "n_branches", "n_leafs", "cable_length", "soma", "units"]
            .iter()
            .filter_map(|key| Some((key.to_string(), self.attribute(key)?)))
            .collect()
    }
}

impl Morphology for TreeNeuron {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn soma(&self) -> Option<i64> {
        self.soma
    }
}

/// Every parent chain must end at a root
fn check_acyclic(nodes: &[Node]) -> Result<(), MorphologyError> {
    let parents: HashMap<i64, Option<i64>> =
        nodes.iter().map(|n| (n.node_id, n.parent_id)).collect();
    let mut rooted: HashSet<i64> = HashSet::with_capacity(nodes.len());

    for node in nodes {
        let mut chain = Vec::new();
        let mut on_chain = HashSet::new();
        let mut current = Some(node.node_id);
        while let Some(id) = current {
            if rooted.contains(&id) {
                break;
            }
            if !on_chain.insert(id) {
                return Err(MorphologyError::Cycle(id));
            }
            chain.push(id);
            current = parents.get(&id).copied().flatten();
        }
        rooted.extend(chain);
    }
    Ok(())
}
