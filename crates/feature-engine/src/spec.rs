//! Feature specification
//!
//! A specification is an ordered list of uniquely named feature sources.
//! It can be given with explicit names or as a bare list, in which case the
//! features are called `X0`, `X1`, ...

use crate::error::FeatureError;
use morphology::AttrValue;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Function computing one feature value from a neuron
pub type FeatureFn<N> = Arc<dyn Fn(&N) -> AttrValue + Send + Sync>;

/// Where a feature's values come from
pub enum FeatureSource<N> {
    /// Attribute or summary column name
    Attribute(String),
    /// Function of the neuron
    Function(FeatureFn<N>),
    /// Source of a kind the extractor cannot evaluate (e.g. a number in a
    /// configuration file); rejected by `fit`
    Unsupported(String),
}

impl<N> FeatureSource<N> {
    /// Read a named attribute or summary column
    pub fn attribute(name: impl Into<String>) -> Self {
        FeatureSource::Attribute(name.into())
    }

    /// Evaluate a function per neuron
    pub fn function<F, V>(f: F) -> Self
    where
        F: Fn(&N) -> V + Send + Sync + 'static,
        V: Into<AttrValue>,
    {
        FeatureSource::Function(Arc::new(move |n: &N| f(n).into()))
    }

    /// Short description of the source kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureSource::Attribute(_) => "attribute",
            FeatureSource::Function(_) => "function",
            FeatureSource::Unsupported(_) => "unsupported",
        }
    }
}

impl<N> Clone for FeatureSource<N> {
    fn clone(&self) -> Self {
        match self {
            FeatureSource::Attribute(name) => FeatureSource::Attribute(name.clone()),
            FeatureSource::Function(f) => FeatureSource::Function(Arc::clone(f)),
            FeatureSource::Unsupported(found) => FeatureSource::Unsupported(found.clone()),
        }
    }
}

impl<N> fmt::Debug for FeatureSource<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSource::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            FeatureSource::Function(_) => f.write_str("Function(..)"),
            FeatureSource::Unsupported(found) => f.debug_tuple("Unsupported").field(found).finish(),
        }
    }
}

impl<N> From<&str> for FeatureSource<N> {
    fn from(name: &str) -> Self {
        FeatureSource::attribute(name)
    }
}

impl<N> From<String> for FeatureSource<N> {
    fn from(name: String) -> Self {
        FeatureSource::Attribute(name)
    }
}

/// Feature specification as supplied by the caller
pub enum FeatureInput<N> {
    /// Named sources, in order
    Named(Vec<(String, FeatureSource<N>)>),
    /// Unnamed sources, in order
    List(Vec<FeatureSource<N>>),
}

impl<N> FeatureInput<N> {
    /// Named specification from `(name, source)` pairs
    pub fn named<K, S, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<FeatureSource<N>>,
    {
        FeatureInput::Named(
            entries
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        )
    }

    /// Unnamed specification
    pub fn list<S, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<FeatureSource<N>>,
    {
        FeatureInput::List(sources.into_iter().map(Into::into).collect())
    }
}

/// Normalized, immutable feature specification
pub struct FeatureSpec<N> {
    entries: Vec<(String, FeatureSource<N>)>,
}

impl<N> FeatureSpec<N> {
    /// Normalize caller input into named form.
    ///
    /// - named input with `names` fails: names cannot be combined with a
    ///   named specification
    /// - list input with `names` of a different length fails
    /// - list input without `names` gets `X0..Xn-1`
    pub fn normalize(input: FeatureInput<N>, names: Option<Vec<String>>) -> Result<Self, FeatureError> {
        let entries = match (input, names) {
            (FeatureInput::Named(_), Some(_)) => {
                return Err(FeatureError::Configuration(
                    "names cannot be combined with a named specification".to_string(),
                ))
            }
            (FeatureInput::Named(entries), None) => entries,
            (FeatureInput::List(sources), Some(names)) => {
                if names.len() != sources.len() {
                    return Err(FeatureError::Configuration(format!(
                        "length mismatch: {} names for {} features",
                        names.len(),
                        sources.len()
                    )));
                }
                names.into_iter().zip(sources).collect()
            }
            (FeatureInput::List(sources), None) => sources
                .into_iter()
                .enumerate()
                .map(|(i, source)| (format!("X{}", i), source))
                .collect(),
        };

        let mut seen = HashSet::with_capacity(entries.len());
        for (name, _) in &entries {
            if !seen.insert(name.as_str()) {
                return Err(FeatureError::Configuration(format!(
                    "duplicate feature name {}",
                    name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Feature names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Source of a named feature
    pub fn get(&self, name: &str) -> Option<&FeatureSource<N>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// `(name, source)` pairs, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureSource<N>)> {
        self.entries.iter().map(|(name, source)| (name.as_str(), source))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N> Clone for FeatureSpec<N> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<N> fmt::Debug for FeatureSpec<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}
