//! SWC Reader
//!
//! Parses SWC skeletons (`id label x y z radius parent`, parent `-1` for
//! roots). Header comments of the form `# key: value` become neuron metadata;
//! `name` and `units` are lifted onto the neuron itself.

use crate::error::MorphologyError;
use crate::list::NeuronList;
use crate::neuron::{Neuron, Node};
use crate::tree::TreeNeuron;
use crate::value::AttrValue;
use std::path::Path;
use tracing::{debug, info};

/// Parse SWC text into a neuron
pub fn read_swc_str(text: &str) -> Result<TreeNeuron, MorphologyError> {
    let mut nodes = Vec::new();
    let mut meta: Vec<(String, AttrValue)> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some((key, value)) = comment.split_once(':') {
                let key = key.trim();
                if !key.is_empty() && !key.contains(char::is_whitespace) {
                    meta.push((key.to_string(), AttrValue::parse(value)));
                }
            }
            continue;
        }
        nodes.push(parse_node(line, line_no + 1)?);
    }

    let mut neuron = TreeNeuron::new(nodes)?;
    for (key, value) in meta {
        neuron = match (key.as_str(), value) {
            ("name", AttrValue::Missing) => neuron,
            ("name", value) => neuron.with_name(value.to_string()),
            ("units", AttrValue::Missing) => neuron,
            ("units", value) => neuron.with_units(value.to_string()),
            (_, value) => neuron.with_meta(key.clone(), value),
        };
    }
    Ok(neuron)
}

fn parse_node(line: &str, line_no: usize) -> Result<Node, MorphologyError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(MorphologyError::Parse {
            line: line_no,
            message: format!("expected 7 columns, found {}", fields.len()),
        });
    }

    let int = |idx: usize| -> Result<i64, MorphologyError> {
        fields[idx].parse::<i64>().map_err(|e| MorphologyError::Parse {
            line: line_no,
            message: format!("column {}: {}", idx + 1, e),
        })
    };
    let float = |idx: usize| -> Result<f64, MorphologyError> {
        fields[idx].parse::<f64>().map_err(|e| MorphologyError::Parse {
            line: line_no,
            message: format!("column {}: {}", idx + 1, e),
        })
    };

    let parent = int(6)?;
    let label = i32::try_from(int(1)?).map_err(|e| MorphologyError::Parse {
        line: line_no,
        message: format!("column 2: {}", e),
    })?;
    Ok(Node {
        node_id: int(0)?,
        parent_id: if parent < 0 { None } else { Some(parent) },
        x: float(2)?,
        y: float(3)?,
        z: float(4)?,
        radius: float(5)?,
        label,
    })
}

/// Read a single SWC file; the file stem names the neuron unless the header does
pub fn read_swc(path: impl AsRef<Path>) -> Result<TreeNeuron, MorphologyError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let neuron = read_swc_str(&text)?;
    debug!("Read {} ({} nodes)", path.display(), neuron.n_nodes());

    if neuron.name().is_none() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            return Ok(neuron.with_name(stem));
        }
    }
    Ok(neuron)
}

/// Read every `.swc` file of a directory, ordered by file name
pub fn read_dir(dir: impl AsRef<Path>) -> Result<NeuronList<TreeNeuron>, MorphologyError> {
    let dir = dir.as_ref();
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| {
        p.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("swc"))
    });
    paths.sort();

    if paths.is_empty() {
        return Err(MorphologyError::EmptyDirectory(dir.to_path_buf()));
    }

    let neurons = paths
        .iter()
        .map(|p| read_swc(p))
        .collect::<Result<NeuronList<_>, _>>()?;
    info!("Loaded {} neurons from {}", neurons.len(), dir.display());
    Ok(neurons)
}
