//! Neural Feature Extractor
//!
//! Turns a collection of neurons into a numeric feature table. `fit` checks
//! that every feature is readable and type consistent, and prepares label
//! encoders for categorical features; `transform` evaluates the features and
//! encodes categorical columns.

use crate::config::{EncodingMode, ExtractorConfig, UnfittedPolicy};
use crate::dtype::{FeatureKind, FeatureTypes, TypeChecker};
use crate::encoder::EncoderRegistry;
use crate::error::FeatureError;
use crate::spec::{FeatureInput, FeatureSource, FeatureSpec};
use crate::table::{Diagnostic, DiagnosticKind, FeatureTable};
use morphology::{AttrValue, Neuron, NeuronList, SummaryTable};
use ndarray::Array2;
use tracing::{debug, info, warn};

/// Feature source as settled by `fit`
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolvedSource {
    /// Column of the collection's summary table
    SummaryColumn(String),
    /// Attribute read from each neuron
    NamedAttribute(String),
    /// Function of the neuron, taken from the specification
    Function,
}

#[derive(Debug, Clone)]
struct FittedState {
    sources: Vec<ResolvedSource>,
    types: FeatureTypes,
}

/// Feature extractor over neuron collections
pub struct NeuralFeatures<N> {
    spec: FeatureSpec<N>,
    config: ExtractorConfig,
    state: Option<FittedState>,
    encoders: EncoderRegistry,
}

impl<N: Neuron> NeuralFeatures<N> {
    /// Create an extractor from a feature specification.
    ///
    /// `names` may only accompany an unnamed (list) specification and must
    /// match its length.
    pub fn new(input: FeatureInput<N>, names: Option<Vec<String>>) -> Result<Self, FeatureError> {
        let spec = FeatureSpec::normalize(input, names)?;
        let config = ExtractorConfig::default();
        debug!("Created extractor with {} features", spec.len());
        Ok(Self {
            spec,
            encoders: EncoderRegistry::new(config.handle_unknown),
            config,
            state: None,
        })
    }

    /// Replace the configuration. Encoders that are already fitted keep
    /// their classes but follow the new unknown-category strategy.
    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.encoders.set_handle_unknown(config.handle_unknown);
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Normalized feature specification
    pub fn spec(&self) -> &FeatureSpec<N> {
        &self.spec
    }

    /// Feature names in output column order
    pub fn feature_names(&self) -> Vec<String> {
        self.spec.names().map(str::to_string).collect()
    }

    /// Per-feature classification, available after `fit`
    pub fn feature_types(&self) -> Option<&FeatureTypes> {
        self.state.as_ref().map(|s| &s.types)
    }

    /// Label encoders of categorical features
    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Check every feature against a collection and prepare encoders.
    ///
    /// On error the extractor keeps whatever state it had before the call.
    pub fn fit(&mut self, neurons: &NeuronList<N>) -> Result<&mut Self, FeatureError> {
        info!(
            "Fitting {} features on {} neurons",
            self.spec.len(),
            neurons.len()
        );
        let summary = neurons.summary();
        let mut checker = TypeChecker::new();
        let mut sources = Vec::with_capacity(self.spec.len());
        let mut fit_values: Vec<Option<Vec<AttrValue>>> = Vec::with_capacity(self.spec.len());

        for (name, source) in self.spec.iter() {
            match source {
                FeatureSource::Attribute(attr) => {
                    if let Some(column) = summary.column(attr) {
                        // Summary columns are typed as a whole
                        match column.dtype() {
                            Some(dtype) => checker.observe_dtype(name, dtype)?,
                            None => checker.observe(name, &AttrValue::Missing)?,
                        }
                        sources.push(ResolvedSource::SummaryColumn(attr.clone()));
                        fit_values.push(Some(column.values.clone()));
                    } else {
                        let values = read_attribute(neurons, name, attr)?;
                        for value in &values {
                            checker.observe(name, value)?;
                        }
                        sources.push(ResolvedSource::NamedAttribute(attr.clone()));
                        fit_values.push(Some(values));
                    }
                }
                FeatureSource::Function(_) => {
                    checker.defer(name);
                    sources.push(ResolvedSource::Function);
                    fit_values.push(None);
                }
                FeatureSource::Unsupported(found) => {
                    return Err(FeatureError::AttributeType {
                        feature: name.to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        let types = checker.finish();
        let mut encoders = EncoderRegistry::new(self.config.handle_unknown);
        for (ty, values) in types.iter().zip(&fit_values) {
            if !ty.is_categorical() {
                continue;
            }
            encoders.register(&ty.name);
            if let (EncodingMode::FitOnce, Some(values)) = (self.config.encoding, values) {
                encoders.fit(&ty.name, values)?;
            }
        }

        info!(
            "Fitted {} features ({} categorical, {} deferred)",
            types.len(),
            encoders.len(),
            types.iter().filter(|t| t.kind == FeatureKind::Deferred).count()
        );
        self.state = Some(FittedState { sources, types });
        self.encoders = encoders;
        Ok(self)
    }

    /// Evaluate the features on a collection.
    ///
    /// Returns a table with one row per neuron and one column per feature,
    /// in specification order. Categorical columns hold label codes; missing
    /// values and unknown categories hold NaN and are listed as diagnostics.
    pub fn transform(&mut self, neurons: &NeuronList<N>) -> Result<FeatureTable, FeatureError> {
        if self.state.is_none() {
            match self.config.unfitted_policy {
                UnfittedPolicy::FitFirst => {
                    warn!("Fitting features first");
                    self.fit(neurons)?;
                }
                UnfittedPolicy::Error => {
                    return Err(FeatureError::NotFitted(
                        "call fit before transform".to_string(),
                    ));
                }
            }
        }
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| FeatureError::NotFitted("call fit before transform".to_string()))?;

        debug!("Transforming {} neurons", neurons.len());
        let needs_summary = state
            .sources
            .iter()
            .any(|s| matches!(s, ResolvedSource::SummaryColumn(_)));
        let summary = if needs_summary {
            neurons.summary()
        } else {
            SummaryTable::default()
        };

        // Raw values, one column per feature
        let mut raw: Vec<Vec<AttrValue>> = Vec::with_capacity(self.spec.len());
        for ((name, source), resolved) in self.spec.iter().zip(&state.sources) {
            let column = match (resolved, source) {
                (ResolvedSource::SummaryColumn(attr), _) => summary
                    .column(attr)
                    .map(|c| c.values.clone())
                    .ok_or_else(|| FeatureError::MissingColumn(attr.clone()))?,
                (ResolvedSource::NamedAttribute(attr), _) => read_attribute(neurons, name, attr)?,
                (ResolvedSource::Function, FeatureSource::Function(f)) => {
                    neurons.iter().map(|n| f(n)).collect()
                }
                (ResolvedSource::Function, other) => {
                    return Err(FeatureError::AttributeType {
                        feature: name.to_string(),
                        found: other.kind_name().to_string(),
                    });
                }
            };
            raw.push(column);
        }

        let mut diagnostics = Vec::new();
        for (name, column) in self.spec.names().zip(&raw) {
            for (row, value) in column.iter().enumerate() {
                if value.is_missing() {
                    warn!(feature = name, row, "Missing feature value");
                    diagnostics.push(Diagnostic {
                        feature: name.to_string(),
                        row,
                        kind: DiagnosticKind::MissingValue,
                    });
                }
            }
        }

        // Settle function features and encode, on working copies so a
        // failing batch leaves the extractor untouched
        let mut types = state.types.clone();
        let mut encoders = self.encoders.clone();
        let mut encoded: Vec<Vec<f64>> = Vec::with_capacity(raw.len());

        for (idx, (name, column)) in self.spec.names().zip(&raw).enumerate() {
            let refs: Vec<&AttrValue> = column.iter().collect();
            let was_deferred = types.at(idx).map(|t| t.kind) == Some(FeatureKind::Deferred);
            let kind = types.settle(idx, &refs)?;
            if was_deferred {
                debug!("Feature {} settled as {:?}", name, kind);
            }

            let cells = match kind {
                FeatureKind::Categorical => {
                    if was_deferred {
                        encoders.register(name);
                    }
                    let refit = self.config.encoding == EncodingMode::RefitPerBatch
                        || !encoders.is_fitted(name);
                    let encoder = if refit {
                        encoders.fit(name, column)?
                    } else {
                        encoders.get(name)?
                    };
                    encoder.transform(name, &refs, &mut diagnostics)?
                }
                _ => numeric_column(name, column, &types, idx)?,
            };
            encoded.push(cells);
        }

        let n_rows = neurons.len();
        let values = Array2::from_shape_fn((n_rows, encoded.len()), |(r, c)| encoded[c][r]);
        let table = FeatureTable::new(self.feature_names(), neurons.names(), values, diagnostics);

        if let Some(state) = self.state.as_mut() {
            state.types = types;
        }
        self.encoders = encoders;
        info!(
            "Transformed {} neurons into {} features ({} diagnostics)",
            table.n_rows(),
            table.n_cols(),
            table.diagnostics().len()
        );
        Ok(table)
    }

    /// `fit` followed by `transform` on the same collection
    pub fn fit_transform(&mut self, neurons: &NeuronList<N>) -> Result<FeatureTable, FeatureError> {
        self.fit(neurons)?;
        self.transform(neurons)
    }

    /// Map label codes of a categorical feature back to the original values.
    /// NaN codes decode to missing values.
    pub fn decode_feature(&self, feature: &str, codes: &[f64]) -> Result<Vec<AttrValue>, FeatureError> {
        let state = self.state.as_ref().ok_or_else(|| {
            FeatureError::NotFitted(format!("fit before decoding feature {}", feature))
        })?;
        if state.types.get(feature).map(|t| t.kind) == Some(FeatureKind::Deferred) {
            return Err(FeatureError::NotFitted(format!(
                "feature {} has not been typed yet; transform a collection first",
                feature
            )));
        }
        self.encoders.decode(feature, codes)
    }
}

impl<N> std::fmt::Debug for NeuralFeatures<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeuralFeatures")
            .field("spec", &self.spec)
            .field("config", &self.config)
            .field("fitted", &self.state.is_some())
            .field("encoders", &self.encoders)
            .finish()
    }
}

/// Read one attribute from every neuron
fn read_attribute<N: Neuron>(
    neurons: &NeuronList<N>,
    feature: &str,
    attribute: &str,
) -> Result<Vec<AttrValue>, FeatureError> {
    neurons
        .iter()
        .enumerate()
        .map(|(idx, neuron)| {
            neuron
                .attribute(attribute)
                .ok_or_else(|| FeatureError::UnknownAttribute {
                    feature: feature.to_string(),
                    attribute: attribute.to_string(),
                    neuron: neuron
                        .name()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("#{}", idx)),
                })
        })
        .collect()
}

/// Copy a numeric column; missing values become NaN
fn numeric_column(
    feature: &str,
    column: &[AttrValue],
    types: &FeatureTypes,
    idx: usize,
) -> Result<Vec<f64>, FeatureError> {
    column
        .iter()
        .map(|value| match value {
            AttrValue::Missing => Ok(f64::NAN),
            other => other.as_f64().ok_or_else(|| {
                let mut dtypes: Vec<_> = types
                    .at(idx)
                    .map(|t| t.dtypes.iter().copied().collect())
                    .unwrap_or_default();
                dtypes.extend(other.dtype());
                FeatureError::TypeConsistency {
                    feature: feature.to_string(),
                    dtypes,
                }
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandleUnknown;
    use morphology::{Morphology, Node, TreeNeuron};

    /// Unbranched neuron of `len` nodes spaced one unit apart
    fn stick(name: &str, len: usize) -> TreeNeuron {
        let nodes = (0..len as i64)
            .map(|i| Node::new(i, if i == 0 { None } else { Some(i - 1) }, [i as f64, 0.0, 0.0]))
            .collect();
        TreeNeuron::new(nodes).unwrap().with_name(name)
    }

    fn tract(name: &str, len: usize, tract: &str) -> TreeNeuron {
        stick(name, len).with_meta("tract", tract)
    }

    fn collection() -> NeuronList<TreeNeuron> {
        NeuronList::new(vec![
            tract("n1", 3, "PDL21"),
            tract("n2", 5, "AVM01"),
            tract("n3", 4, "PDL21"),
        ])
    }

    fn extractor(input: FeatureInput<TreeNeuron>) -> NeuralFeatures<TreeNeuron> {
        NeuralFeatures::new(input, None).unwrap()
    }

    #[test]
    fn test_constructor_rejects_names_with_mapping() {
        let result = NeuralFeatures::<TreeNeuron>::new(
            FeatureInput::named([("a", "n_nodes")]),
            Some(vec!["a".to_string()]),
        );
        assert!(matches!(result, Err(FeatureError::Configuration(_))));
    }

    #[test]
    fn test_fit_classifies_features() {
        let mut features = extractor(FeatureInput::named([
            ("nodes", "n_nodes"),
            ("cable", "cable_length"),
            ("tract", "tract"),
        ]));
        features.fit(&collection()).unwrap();

        let types = features.feature_types().unwrap();
        assert_eq!(types.len(), 3);
        assert_eq!(types.is_numeric("nodes"), Some(true));
        assert_eq!(types.is_numeric("cable"), Some(true));
        assert_eq!(types.is_numeric("tract"), Some(false));
        assert_eq!(features.encoders().features().collect::<Vec<_>>(), vec!["tract"]);
        assert!(features.encoders().is_fitted("tract"));
    }

    #[test]
    fn test_fit_is_chainable() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::list(["n_nodes"]));
        let table = features.fit(&neurons).unwrap().transform(&neurons).unwrap();
        assert_eq!(table.columns(), &["X0".to_string()]);
    }

    #[test]
    fn test_transform_numeric_and_categorical() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([("nodes", "n_nodes"), ("tract", "tract")]));
        let table = features.fit_transform(&neurons).unwrap();

        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.column("nodes").unwrap().to_vec(), vec![3.0, 5.0, 4.0]);
        // AVM01 < PDL21
        assert_eq!(table.column("tract").unwrap().to_vec(), vec![1.0, 0.0, 1.0]);
        assert_eq!(
            table.index().unwrap(),
            &["n1".to_string(), "n2".to_string(), "n3".to_string()]
        );
        assert!(table.diagnostics().is_empty());
    }

    #[test]
    fn test_decode_round_trip() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([("tract", "tract")]));
        let table = features.fit_transform(&neurons).unwrap();

        let codes = table.column("tract").unwrap().to_vec();
        let decoded = features.decode_feature("tract", &codes).unwrap();
        let expected: Vec<AttrValue> = neurons.iter().map(|n| n.attribute("tract").unwrap()).collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_errors() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([("nodes", "n_nodes"), ("tract", "tract")]));
        assert!(matches!(
            features.decode_feature("tract", &[0.0]),
            Err(FeatureError::NotFitted(_))
        ));

        features.fit(&neurons).unwrap();
        assert!(matches!(
            features.decode_feature("nodes", &[0.0]),
            Err(FeatureError::NotCategorical(_))
        ));
        assert!(matches!(
            features.decode_feature("unknown", &[0.0]),
            Err(FeatureError::NotCategorical(_))
        ));
        assert!(matches!(
            features.decode_feature("tract", &[7.0]),
            Err(FeatureError::InvalidCode { .. })
        ));
    }

    #[test]
    fn test_unknown_attribute_fails_fit() {
        let mut features = extractor(FeatureInput::named([("x", "no_such_attribute")]));
        let err = features.fit(&collection()).unwrap_err();
        assert!(matches!(err, FeatureError::UnknownAttribute { ref attribute, .. } if attribute == "no_such_attribute"));
        assert!(!features.is_fitted());
    }

    #[test]
    fn test_unsupported_source_fails_fit() {
        let mut features = extractor(FeatureInput::Named(vec![(
            "x".to_string(),
            FeatureSource::Unsupported("integer".to_string()),
        )]));
        let err = features.fit(&collection()).unwrap_err();
        assert_eq!(
            err,
            FeatureError::AttributeType {
                feature: "x".to_string(),
                found: "integer".to_string()
            }
        );
    }

    #[test]
    fn test_inconsistent_attribute_fails_fit() {
        let neurons = NeuronList::new(vec![
            stick("a", 2).with_meta("mixed", 1i64),
            stick("b", 2).with_meta("mixed", "one"),
        ]);
        let mut features = extractor(FeatureInput::named([("m", "mixed")]));
        let err = features.fit(&neurons).unwrap_err();
        assert!(matches!(err, FeatureError::TypeConsistency { ref feature, .. } if feature == "m"));
    }

    #[test]
    fn test_failed_fit_keeps_previous_state() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([("tract", "tract")]));
        features.fit(&neurons).unwrap();

        let broken = NeuronList::new(vec![stick("plain", 2)]);
        assert!(features.fit(&broken).is_err());
        assert!(features.is_fitted());
        assert!(features.encoders().is_fitted("tract"));
    }

    #[test]
    fn test_mixed_numeric_is_consistent() {
        let neurons = NeuronList::new(vec![
            stick("a", 2).with_meta("depth", 1i64),
            stick("b", 2).with_meta("depth", 2.5),
        ]);
        let mut features = extractor(FeatureInput::named([("d", "depth")]));
        let table = features.fit_transform(&neurons).unwrap();
        assert_eq!(table.column("d").unwrap().to_vec(), vec![1.0, 2.5]);
    }

    #[test]
    fn test_unfitted_policy_fit_first() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([("tract", "tract")]));
        let table = features.transform(&neurons).unwrap();
        assert!(features.is_fitted());
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn test_unfitted_policy_error() {
        let mut features =
            extractor(FeatureInput::named([("tract", "tract")])).with_config(ExtractorConfig::strict());
        assert!(matches!(
            features.transform(&collection()),
            Err(FeatureError::NotFitted(_))
        ));
        assert!(!features.is_fitted());
    }

    #[test]
    fn test_fit_once_codes_are_stable_across_batches() {
        let mut features = extractor(FeatureInput::named([("tract", "tract")]));
        features.fit(&collection()).unwrap();

        // PDL21 alone would be code 0 if the encoder were refit
        let batch = NeuronList::new(vec![tract("x", 2, "PDL21")]);
        let table = features.transform(&batch).unwrap();
        assert_eq!(table.get(0, "tract"), Some(1.0));
    }

    #[test]
    fn test_refit_per_batch() {
        let mut features = extractor(FeatureInput::named([("tract", "tract")]))
            .with_config(ExtractorConfig::per_batch());
        features.fit(&collection()).unwrap();
        assert!(!features.encoders().is_fitted("tract"));

        let batch = NeuronList::new(vec![tract("x", 2, "PDL21"), tract("y", 2, "ZZZ99")]);
        let table = features.transform(&batch).unwrap();
        assert_eq!(table.column("tract").unwrap().to_vec(), vec![0.0, 1.0]);
        assert_eq!(
            features.decode_feature("tract", &[1.0]).unwrap(),
            vec![AttrValue::from("ZZZ99")]
        );
    }

    #[test]
    fn test_unknown_category_ignored() {
        let mut features = extractor(FeatureInput::named([("tract", "tract")]));
        features.fit(&collection()).unwrap();

        let batch = NeuronList::new(vec![tract("x", 2, "NEW01")]);
        let table = features.transform(&batch).unwrap();
        assert!(table.get(0, "tract").unwrap().is_nan());
        assert_eq!(
            table.diagnostics()[0].kind,
            DiagnosticKind::UnknownCategory("NEW01".to_string())
        );
    }

    #[test]
    fn test_unknown_category_error() {
        let config = ExtractorConfig {
            handle_unknown: HandleUnknown::Error,
            ..ExtractorConfig::default()
        };
        let mut features = extractor(FeatureInput::named([("tract", "tract")])).with_config(config);
        features.fit(&collection()).unwrap();

        let batch = NeuronList::new(vec![tract("x", 2, "NEW01")]);
        assert!(matches!(
            features.transform(&batch),
            Err(FeatureError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_config_change_after_fit_applies_to_fitted_encoders() {
        let mut features = extractor(FeatureInput::named([("tract", "tract")]));
        features.fit(&collection()).unwrap();
        let mut features = features.with_config(ExtractorConfig {
            handle_unknown: HandleUnknown::Error,
            ..ExtractorConfig::default()
        });

        let batch = NeuronList::new(vec![tract("x", 2, "NEW01")]);
        assert!(matches!(
            features.transform(&batch),
            Err(FeatureError::UnknownCategory { .. })
        ));

        let known = NeuronList::new(vec![tract("y", 2, "PDL21")]);
        assert_eq!(features.transform(&known).unwrap().get(0, "tract"), Some(1.0));
    }

    #[test]
    fn test_missing_values_become_nan_with_diagnostic() {
        let neurons = NeuronList::new(vec![
            stick("a", 2).with_meta("depth", 1.5),
            stick("b", 2).with_meta("depth", AttrValue::Missing),
        ]);
        let mut features = extractor(FeatureInput::named([("d", "depth")]));
        let table = features.fit_transform(&neurons).unwrap();

        assert_eq!(table.get(0, "d"), Some(1.5));
        assert!(table.get(1, "d").unwrap().is_nan());
        assert_eq!(
            table.diagnostics(),
            &[Diagnostic {
                feature: "d".to_string(),
                row: 1,
                kind: DiagnosticKind::MissingValue
            }]
        );
    }

    #[test]
    fn test_function_feature_numeric() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([(
            "cable",
            FeatureSource::function(|n: &TreeNeuron| n.cable_length()),
        )]));
        features.fit(&neurons).unwrap();
        assert_eq!(
            features.feature_types().unwrap().get("cable").unwrap().kind,
            FeatureKind::Deferred
        );

        let table = features.transform(&neurons).unwrap();
        assert_eq!(table.column("cable").unwrap().to_vec(), vec![2.0, 4.0, 3.0]);
        assert_eq!(features.feature_types().unwrap().is_numeric("cable"), Some(true));
    }

    #[test]
    fn test_function_feature_categorical_is_decodable() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([(
            "long",
            FeatureSource::function(|n: &TreeNeuron| if n.n_nodes() > 3 { "long" } else { "short" }),
        )]));
        features.fit(&neurons).unwrap();
        assert!(matches!(
            features.decode_feature("long", &[0.0]),
            Err(FeatureError::NotFitted(_))
        ));

        let table = features.transform(&neurons).unwrap();
        let codes = table.column("long").unwrap().to_vec();
        assert_eq!(codes, vec![1.0, 0.0, 0.0]);
        assert_eq!(
            features.decode_feature("long", &codes).unwrap(),
            vec![AttrValue::from("short"), AttrValue::from("long"), AttrValue::from("long")]
        );
    }

    #[test]
    fn test_function_feature_inconsistent_fails_transform() {
        let neurons = collection();
        let mut features = extractor(FeatureInput::named([(
            "odd",
            FeatureSource::function(|n: &TreeNeuron| -> AttrValue {
                if n.n_nodes() == 3 {
                    AttrValue::from("three")
                } else {
                    AttrValue::from(n.n_nodes())
                }
            }),
        )]));
        features.fit(&neurons).unwrap();
        assert!(matches!(
            features.transform(&neurons),
            Err(FeatureError::TypeConsistency { .. })
        ));
        // Still deferred after the failed batch
        assert_eq!(
            features.feature_types().unwrap().get("odd").unwrap().kind,
            FeatureKind::Deferred
        );
    }

    #[test]
    fn test_missing_summary_column_at_transform() {
        #[derive(Clone)]
        struct Bare(Option<i64>);
        impl Neuron for Bare {
            fn name(&self) -> Option<&str> {
                None
            }
            fn attribute(&self, name: &str) -> Option<AttrValue> {
                (name == "score").then(|| self.0.into())
            }
            fn summary_row(&self) -> Vec<(String, AttrValue)> {
                self.0
                    .map(|v| vec![("score".to_string(), AttrValue::Int(v))])
                    .unwrap_or_default()
            }
        }

        let mut features = NeuralFeatures::new(FeatureInput::list(["score"]), None).unwrap();
        features.fit(&NeuronList::new(vec![Bare(Some(1))])).unwrap();
        let err = features.transform(&NeuronList::new(vec![Bare(None)])).unwrap_err();
        assert_eq!(err, FeatureError::MissingColumn("score".to_string()));
    }

    #[test]
    fn test_unnamed_neurons_have_no_index() {
        let nodes = vec![Node::new(0, None, [0.0; 3])];
        let neurons = NeuronList::new(vec![TreeNeuron::new(nodes).unwrap()]);
        let mut features = extractor(FeatureInput::list(["n_nodes"]));
        let table = features.fit_transform(&neurons).unwrap();
        assert!(table.index().is_none());
    }

    #[test]
    fn test_empty_specification() {
        let mut features = extractor(FeatureInput::List(Vec::new()));
        let table = features.fit_transform(&collection()).unwrap();
        assert_eq!(table.shape(), (3, 0));
    }

    #[test]
    fn test_extractor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NeuralFeatures<TreeNeuron>>();
    }
}
