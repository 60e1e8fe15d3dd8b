//! Categorical encoding
//!
//! One label encoder per categorical feature. A fitted encoder maps the
//! sorted distinct categories of its training values onto codes `0..k`.

use crate::config::HandleUnknown;
use crate::error::FeatureError;
use crate::table::{Diagnostic, DiagnosticKind};
use morphology::AttrValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

/// Non-missing categorical value with a total order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Category {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Category {
    /// Convert a value; `None` for missing values
    pub fn from_value(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Bool(v) => Some(Category::Bool(*v)),
            AttrValue::Int(v) => Some(Category::Int(*v)),
            AttrValue::Float(v) => Some(Category::Float(*v)),
            AttrValue::Str(v) => Some(Category::Str(v.clone())),
            AttrValue::Missing => None,
        }
    }

    /// Back to an attribute value
    pub fn to_value(&self) -> AttrValue {
        match self {
            Category::Bool(v) => AttrValue::Bool(*v),
            Category::Int(v) => AttrValue::Int(*v),
            Category::Float(v) => AttrValue::Float(*v),
            Category::Str(v) => AttrValue::Str(v.clone()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Category::Bool(_) => 0,
            Category::Int(_) => 1,
            Category::Float(_) => 2,
            Category::Str(_) => 3,
        }
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Category::Bool(a), Category::Bool(b)) => a.cmp(b),
            (Category::Int(a), Category::Int(b)) => a.cmp(b),
            (Category::Float(a), Category::Float(b)) => a.total_cmp(b),
            (Category::Str(a), Category::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Category::Bool(v) => v.hash(state),
            Category::Int(v) => v.hash(state),
            Category::Float(v) => v.to_bits().hash(state),
            Category::Str(v) => v.hash(state),
        }
    }
}

/// Unfitted label encoder
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    handle_unknown: HandleUnknown,
}

impl LabelEncoder {
    /// Create a new LabelEncoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for unseen categories
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Learn the sorted distinct categories of `values`; missing values are skipped
    pub fn fit<'a, I>(&self, values: I) -> FittedLabelEncoder
    where
        I: IntoIterator<Item = &'a AttrValue>,
    {
        let classes: Vec<Category> = values
            .into_iter()
            .filter_map(Category::from_value)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_to_idx = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();

        FittedLabelEncoder {
            classes,
            class_to_idx,
            handle_unknown: self.handle_unknown,
        }
    }
}

/// Result of encoding one value
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Code(usize),
    Missing,
    Unknown(Category),
}

/// Fitted label encoder
#[derive(Debug, Clone)]
pub struct FittedLabelEncoder {
    /// Distinct categories in sorted order
    classes: Vec<Category>,
    class_to_idx: HashMap<Category, usize>,
    handle_unknown: HandleUnknown,
}

impl FittedLabelEncoder {
    /// Get the categories in code order
    pub fn classes(&self) -> &[Category] {
        &self.classes
    }

    /// Get the number of categories
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Encode a single value
    pub fn encode(&self, value: &AttrValue) -> Encoded {
        match Category::from_value(value) {
            None => Encoded::Missing,
            Some(category) => match self.class_to_idx.get(&category) {
                Some(&idx) => Encoded::Code(idx),
                None => Encoded::Unknown(category),
            },
        }
    }

    /// Category for a code
    pub fn decode(&self, code: usize) -> Option<&Category> {
        self.classes.get(code)
    }

    /// Encode a column into float codes; missing values become NaN.
    ///
    /// Unknown categories either fail or become NaN with a diagnostic,
    /// according to the encoder's `HandleUnknown` strategy.
    pub fn transform(
        &self,
        feature: &str,
        values: &[&AttrValue],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<f64>, FeatureError> {
        let mut codes = Vec::with_capacity(values.len());
        for (row, value) in values.iter().enumerate() {
            match self.encode(value) {
                Encoded::Code(idx) => codes.push(idx as f64),
                Encoded::Missing => codes.push(f64::NAN),
                Encoded::Unknown(category) => {
                    let shown = category.to_value().to_string();
                    if self.handle_unknown == HandleUnknown::Error {
                        return Err(FeatureError::UnknownCategory {
                            feature: feature.to_string(),
                            value: shown,
                        });
                    }
                    warn!(feature, row, value = %shown, "Unknown category encoded as NaN");
                    diagnostics.push(Diagnostic {
                        feature: feature.to_string(),
                        row,
                        kind: DiagnosticKind::UnknownCategory(shown),
                    });
                    codes.push(f64::NAN);
                }
            }
        }
        Ok(codes)
    }

    /// Decode float codes; NaN decodes to a missing value
    pub fn inverse_transform(&self, feature: &str, codes: &[f64]) -> Result<Vec<AttrValue>, FeatureError> {
        codes
            .iter()
            .map(|&code| {
                if code.is_nan() {
                    return Ok(AttrValue::Missing);
                }
                let invalid = || FeatureError::InvalidCode {
                    feature: feature.to_string(),
                    code,
                    n_classes: self.n_classes(),
                };
                if code < 0.0 || code.fract() != 0.0 {
                    return Err(invalid());
                }
                self.decode(code as usize)
                    .map(Category::to_value)
                    .ok_or_else(invalid)
            })
            .collect()
    }
}

/// Encoder slot of one categorical feature
#[derive(Debug, Clone)]
pub enum EncoderSlot {
    /// Registered during fit, not yet given data
    Unfitted(LabelEncoder),
    Fitted(FittedLabelEncoder),
}

/// Label encoders keyed by feature name
#[derive(Debug, Clone, Default)]
pub struct EncoderRegistry {
    slots: BTreeMap<String, EncoderSlot>,
    handle_unknown: HandleUnknown,
}

impl EncoderRegistry {
    /// Create an empty registry
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            slots: BTreeMap::new(),
            handle_unknown,
        }
    }

    /// Change how every encoder, fitted or not, treats unseen categories
    pub fn set_handle_unknown(&mut self, strategy: HandleUnknown) {
        self.handle_unknown = strategy;
        for slot in self.slots.values_mut() {
            match slot {
                EncoderSlot::Unfitted(encoder) => encoder.handle_unknown = strategy,
                EncoderSlot::Fitted(fitted) => fitted.handle_unknown = strategy,
            }
        }
    }

    /// Register a categorical feature with an unfitted encoder
    pub fn register(&mut self, feature: &str) {
        debug!("Registering label encoder for {}", feature);
        self.slots.insert(
            feature.to_string(),
            EncoderSlot::Unfitted(LabelEncoder::new().with_handle_unknown(self.handle_unknown)),
        );
    }

    /// (Re)fit the encoder of a registered feature
    pub fn fit<'a, I>(&mut self, feature: &str, values: I) -> Result<&FittedLabelEncoder, FeatureError>
    where
        I: IntoIterator<Item = &'a AttrValue>,
    {
        let slot = self
            .slots
            .get_mut(feature)
            .ok_or_else(|| FeatureError::NotCategorical(feature.to_string()))?;
        let encoder = match slot {
            EncoderSlot::Unfitted(encoder) => encoder.clone(),
            EncoderSlot::Fitted(fitted) => LabelEncoder::new().with_handle_unknown(fitted.handle_unknown),
        };
        let fitted = encoder.fit(values);
        debug!("Fitted encoder for {} with {} classes", feature, fitted.n_classes());
        *slot = EncoderSlot::Fitted(fitted);
        self.get(feature)
    }

    /// Whether the feature has an encoder slot
    pub fn contains(&self, feature: &str) -> bool {
        self.slots.contains_key(feature)
    }

    /// Whether the feature's encoder has been fitted
    pub fn is_fitted(&self, feature: &str) -> bool {
        matches!(self.slots.get(feature), Some(EncoderSlot::Fitted(_)))
    }

    /// Fitted encoder of a feature
    pub fn get(&self, feature: &str) -> Result<&FittedLabelEncoder, FeatureError> {
        match self.slots.get(feature) {
            Some(EncoderSlot::Fitted(fitted)) => Ok(fitted),
            Some(EncoderSlot::Unfitted(_)) => Err(FeatureError::NotFitted(format!(
                "encoder for {} has not seen any data",
                feature
            ))),
            None => Err(FeatureError::NotCategorical(feature.to_string())),
        }
    }

    /// Decode codes of a categorical feature
    pub fn decode(&self, feature: &str, codes: &[f64]) -> Result<Vec<AttrValue>, FeatureError> {
        self.get(feature)?.inverse_transform(feature, codes)
    }

    /// Names of registered features
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
