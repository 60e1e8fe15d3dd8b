//! Neuron Feature Engine
//!
//! Fit/transform feature extraction over neuron collections: feature
//! specifications, per-feature type checks, label encoding of categorical
//! features, and a library of morphological feature functions.

mod config;
mod dtype;
mod encoder;
mod error;
mod extractor;
pub mod features;
mod spec;
mod statistics;
mod table;

pub use config::{EncodingMode, ExtractorConfig, HandleUnknown, UnfittedPolicy};
pub use dtype::{FeatureKind, FeatureType, FeatureTypes};
pub use encoder::{Category, EncoderRegistry, FittedLabelEncoder, LabelEncoder};
pub use error::FeatureError;
pub use extractor::NeuralFeatures;
pub use features::library;
pub use spec::{FeatureFn, FeatureInput, FeatureSource, FeatureSpec};
pub use statistics::StatisticalFeatures;
pub use table::{Diagnostic, DiagnosticKind, FeatureTable};
