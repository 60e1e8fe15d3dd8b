//! Summary Statistics over Node Measurements

/// Summary statistics of a set of measurements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticalFeatures {
    /// Number of values
    pub count: usize,
    /// Mean value, NaN when there are no values
    pub mean: f64,
}

impl Default for StatisticalFeatures {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
        }
    }
}

impl StatisticalFeatures {
    /// Compute statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        Self {
            count: values.len(),
            mean: values.iter().sum::<f64>() / values.len() as f64,
        }
    }

    /// Compute statistics of node radii
    pub fn of_radii<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a morphology::Node>,
    {
        let radii: Vec<f64> = nodes.into_iter().map(|n| n.radius).collect();
        Self::compute(&radii)
    }
}
