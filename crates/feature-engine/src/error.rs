//! Feature Extraction Error Types

use morphology::DType;
use thiserror::Error;

/// Errors raised while configuring, fitting or applying a feature extractor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Malformed feature specification
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Feature source is neither an attribute name nor a function
    #[error("Wrong feature type for {feature}: {found}. Allowed types: attribute name, function")]
    AttributeType { feature: String, found: String },

    /// Observed values of one feature span incompatible types
    #[error("Inconsistent feature types in {feature}: {dtypes:?}")]
    TypeConsistency { feature: String, dtypes: Vec<DType> },

    /// Operation needs state that only `fit` creates
    #[error("Feature extractor is not fitted: {0}")]
    NotFitted(String),

    /// Decoding requested for a feature that was never encoded
    #[error("Feature {0} wasn't encoded. Is it numeric?")]
    NotCategorical(String),

    /// Neuron lacks the attribute a feature reads
    #[error("Neuron {neuron} has no attribute {attribute} (feature {feature})")]
    UnknownAttribute {
        feature: String,
        attribute: String,
        neuron: String,
    },

    /// Category not seen when the encoder was fitted
    #[error("Unknown category {value} in feature {feature}")]
    UnknownCategory { feature: String, value: String },

    /// Code outside the encoder's range
    #[error("Invalid code {code} for feature {feature}: expected an integer in 0..{n_classes}")]
    InvalidCode {
        feature: String,
        code: f64,
        n_classes: usize,
    },

    /// Feature table could not be written
    #[error("Failed to write feature table: {0}")]
    Output(String),

    /// Summary column present at fit time is absent from a later collection
    #[error("Summary column {0} is missing from the neuron collection")]
    MissingColumn(String),
}
