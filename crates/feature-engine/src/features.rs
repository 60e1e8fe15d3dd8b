//! Morphological Feature Library
//!
//! Ready-made feature functions over skeleton neurons. Each returns NaN for a
//! neuron without nodes.

use crate::spec::{FeatureInput, FeatureSource};
use crate::statistics::StatisticalFeatures;
use morphology::Morphology;

/// Names of the library functions, in the order `library()` lists them
pub const LIBRARY: [&str; 5] = [
    "cbf_length",
    "root_radius",
    "average_radius",
    "spine_radius",
    "spine_length",
];

/// Cable length of the cell body fiber
pub fn cbf_length<M: Morphology>(neuron: &M) -> f64 {
    let cbf = neuron.cell_body_fiber();
    if cbf.is_empty() {
        return f64::NAN;
    }
    cbf.cable_length()
}

/// Radius of the root node. This is not always the soma.
pub fn root_radius<M: Morphology>(neuron: &M) -> f64 {
    neuron
        .roots()
        .first()
        .map_or(f64::NAN, |&idx| neuron.nodes()[idx].radius)
}

/// Mean radius over all nodes
pub fn average_radius<M: Morphology>(neuron: &M) -> f64 {
    StatisticalFeatures::of_radii(neuron.nodes()).mean
}

/// Mean radius along the longest neurite
pub fn spine_radius<M: Morphology>(neuron: &M) -> f64 {
    StatisticalFeatures::of_radii(&neuron.longest_neurite().nodes).mean
}

/// Cable length of the longest neurite
pub fn spine_length<M: Morphology>(neuron: &M) -> f64 {
    let spine = neuron.longest_neurite();
    if spine.is_empty() {
        return f64::NAN;
    }
    spine.cable_length()
}

/// Library function by name
pub fn lookup<M: Morphology + 'static>(name: &str) -> Option<FeatureSource<M>> {
    let f: fn(&M) -> f64 = match name {
        "cbf_length" => cbf_length::<M>,
        "root_radius" => root_radius::<M>,
        "average_radius" => average_radius::<M>,
        "spine_radius" => spine_radius::<M>,
        "spine_length" => spine_length::<M>,
        _ => return None,
    };
    Some(FeatureSource::function(f))
}

/// Every library function as a named specification
pub fn library<M: Morphology + 'static>() -> FeatureInput<M> {
    FeatureInput::Named(
        LIBRARY
            .iter()
            .filter_map(|name| Some((name.to_string(), lookup::<M>(name)?)))
            .collect(),
    )
}
