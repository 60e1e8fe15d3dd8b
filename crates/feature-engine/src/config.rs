//! Extractor configuration

use serde::{Deserialize, Serialize};

/// What `transform` does when `fit` has not been called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfittedPolicy {
    /// Warn and fit on the collection being transformed
    #[default]
    FitFirst,
    /// Fail with `FeatureError::NotFitted`
    Error,
}

/// When categorical encoders learn their categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Fit on the `fit` collection and reuse for every transform
    #[default]
    FitOnce,
    /// Refit on every transform batch. Codes are only comparable across
    /// batches that contain the same categories.
    RefitPerBatch,
}

/// Strategy for categories unseen by a fitted encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Fail the transform
    Error,
    /// Emit NaN and record a diagnostic
    #[default]
    Ignore,
}

/// Feature extractor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Behaviour of `transform` before `fit`
    pub unfitted_policy: UnfittedPolicy,
    /// Encoder lifecycle
    pub encoding: EncodingMode,
    /// Unknown categories under `EncodingMode::FitOnce`
    pub handle_unknown: HandleUnknown,
}

impl ExtractorConfig {
    /// Fail fast on every recoverable condition
    pub fn strict() -> Self {
        Self {
            unfitted_policy: UnfittedPolicy::Error,
            encoding: EncodingMode::FitOnce,
            handle_unknown: HandleUnknown::Error,
        }
    }

    /// Refit encoders on every batch and fit implicitly
    pub fn per_batch() -> Self {
        Self {
            unfitted_policy: UnfittedPolicy::FitFirst,
            encoding: EncodingMode::RefitPerBatch,
            handle_unknown: HandleUnknown::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.unfitted_policy, UnfittedPolicy::FitFirst);
        assert_eq!(config.encoding, EncodingMode::FitOnce);
        assert_eq!(config.handle_unknown, HandleUnknown::Ignore);
    }

    #[test]
    fn test_presets_differ_from_default() {
        assert_ne!(ExtractorConfig::strict(), ExtractorConfig::default());
        assert_eq!(ExtractorConfig::per_batch().encoding, EncodingMode::RefitPerBatch);
    }
}
