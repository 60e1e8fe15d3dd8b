//! Neuron Morphology
//!
//! Neuron collaborator for feature extraction: attribute values, the
//! `Neuron`/`Morphology` capability traits, skeleton neurons, collections with
//! summary tables, and SWC loading.

mod error;
mod list;
mod neuron;
pub mod swc;
mod tree;
mod value;

pub use error::MorphologyError;
pub use list::{NeuronList, SummaryColumn, SummaryTable};
pub use neuron::{Connector, ConnectorKind, Morphology, Neurite, Neuron, Node, NodeType};
pub use tree::TreeNeuron;
pub use value::{column_dtype, AttrValue, DType};
