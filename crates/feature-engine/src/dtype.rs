//! Per-feature type classification

use crate::error::FeatureError;
use morphology::{AttrValue, DType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a feature's values reach the output table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Copied through as numbers
    Numeric,
    /// Replaced by label codes
    Categorical,
    /// Function source, typed from its first transform batch
    Deferred,
}

/// Classification of a single feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureType {
    pub name: String,
    pub kind: FeatureKind,
    /// Distinct dtypes observed while classifying
    pub dtypes: BTreeSet<DType>,
}

impl FeatureType {
    pub fn is_numeric(&self) -> bool {
        self.kind == FeatureKind::Numeric
    }

    pub fn is_categorical(&self) -> bool {
        self.kind == FeatureKind::Categorical
    }
}

/// A set of dtypes is consistent when it holds at most one type, or only
/// numeric types.
pub fn is_consistent(dtypes: &BTreeSet<DType>) -> bool {
    dtypes.len() <= 1 || dtypes.iter().all(DType::is_numeric)
}

/// Settle a kind from an observed dtype set. Any member decides, since a
/// consistent set is either uniform or all numeric; an empty set (only
/// missing values) counts as numeric.
pub fn classify(dtypes: &BTreeSet<DType>) -> FeatureKind {
    match dtypes.iter().next() {
        Some(dtype) if !dtype.is_numeric() => FeatureKind::Categorical,
        _ => FeatureKind::Numeric,
    }
}

/// Accumulates observed dtypes per feature and enforces consistency as
/// values arrive
#[derive(Debug, Default)]
pub struct TypeChecker {
    entries: Vec<(String, Option<BTreeSet<DType>>)>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, feature: &str) -> &mut Option<BTreeSet<DType>> {
        let pos = match self.entries.iter().position(|(name, _)| name == feature) {
            Some(pos) => pos,
            None => {
                self.entries.push((feature.to_string(), Some(BTreeSet::new())));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    /// Record one dtype for a feature
    pub fn observe_dtype(&mut self, feature: &str, dtype: DType) -> Result<(), FeatureError> {
        let slot = self.slot(feature);
        let dtypes = slot.get_or_insert_with(BTreeSet::new);
        dtypes.insert(dtype);
        if !is_consistent(dtypes) {
            return Err(FeatureError::TypeConsistency {
                feature: feature.to_string(),
                dtypes: dtypes.iter().copied().collect(),
            });
        }
        Ok(())
    }

    /// Record a value; missing values register the feature but add no dtype
    pub fn observe(&mut self, feature: &str, value: &AttrValue) -> Result<(), FeatureError> {
        match value.dtype() {
            Some(dtype) => self.observe_dtype(feature, dtype),
            None => {
                self.slot(feature);
                Ok(())
            }
        }
    }

    /// Register a feature whose type is settled later
    pub fn defer(&mut self, feature: &str) {
        *self.slot(feature) = None;
    }

    /// Classify every feature, in registration order
    pub fn finish(self) -> FeatureTypes {
        let types = self
            .entries
            .into_iter()
            .map(|(name, dtypes)| match dtypes {
                Some(dtypes) => FeatureType {
                    name,
                    kind: classify(&dtypes),
                    dtypes,
                },
                None => FeatureType {
                    name,
                    kind: FeatureKind::Deferred,
                    dtypes: BTreeSet::new(),
                },
            })
            .collect();
        FeatureTypes { types }
    }
}

/// Ordered per-feature classification produced by `fit`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureTypes {
    types: Vec<FeatureType>,
}

impl FeatureTypes {
    /// Classification of one feature
    pub fn get(&self, name: &str) -> Option<&FeatureType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Classification by position
    pub fn at(&self, idx: usize) -> Option<&FeatureType> {
        self.types.get(idx)
    }

    /// Whether the feature is classified numeric
    pub fn is_numeric(&self, name: &str) -> Option<bool> {
        self.get(name).map(FeatureType::is_numeric)
    }

    /// Names of categorical features
    pub fn categorical(&self) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .filter(|t| t.is_categorical())
            .map(|t| t.name.as_str())
    }

    /// Settle a deferred feature from a batch of its values.
    ///
    /// Returns the new kind. Features that are not deferred are left as is.
    pub fn settle(&mut self, idx: usize, values: &[&AttrValue]) -> Result<FeatureKind, FeatureError> {
        let ty = &mut self.types[idx];
        if ty.kind != FeatureKind::Deferred {
            return Ok(ty.kind);
        }

        let mut checker = TypeChecker::new();
        for value in values {
            checker.observe(&ty.name, value)?;
        }
        let settled = checker
            .finish()
            .types
            .pop()
            .map(|t| (t.kind, t.dtypes))
            .unwrap_or((FeatureKind::Numeric, BTreeSet::new()));

        ty.kind = settled.0;
        ty.dtypes = settled.1;
        Ok(ty.kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
