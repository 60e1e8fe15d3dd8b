//! Neuron Collections and Summary Tables

use crate::neuron::Neuron;
use crate::value::{column_dtype, AttrValue, DType};
use serde::{Deserialize, Serialize};

/// One named column of a summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryColumn {
    pub name: String,
    pub values: Vec<AttrValue>,
}

impl SummaryColumn {
    /// Column type, `None` if every cell is missing
    pub fn dtype(&self) -> Option<DType> {
        column_dtype(&self.values)
    }
}

/// Tabular view of a neuron collection: one row per neuron
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    columns: Vec<SummaryColumn>,
    n_rows: usize,
}

impl SummaryTable {
    /// Build a table from per-neuron rows.
    ///
    /// Columns appear in first-seen order; cells a row does not provide are
    /// filled with [`AttrValue::Missing`].
    pub fn from_rows(rows: Vec<Vec<(String, AttrValue)>>) -> Self {
        let n_rows = rows.len();
        let mut columns: Vec<SummaryColumn> = Vec::new();

        for (row_idx, row) in rows.into_iter().enumerate() {
            for (key, value) in row {
                let pos = match columns.iter().position(|c| c.name == key) {
                    Some(pos) => pos,
                    None => {
                        columns.push(SummaryColumn {
                            name: key,
                            values: vec![AttrValue::Missing; n_rows],
                        });
                        columns.len() - 1
                    }
                };
                columns[pos].values[row_idx] = value;
            }
        }

        Self { columns, n_rows }
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&SummaryColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All columns
    pub fn columns(&self) -> &[SummaryColumn] {
        &self.columns
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
}

/// Ordered collection of neurons
#[derive(Debug, Clone)]
pub struct NeuronList<N> {
    neurons: Vec<N>,
}

impl<N> Default for NeuronList<N> {
    fn default() -> Self {
        Self { neurons: Vec::new() }
    }
}

impl<N: Neuron> NeuronList<N> {
    /// Create a list from neurons
    pub fn new(neurons: Vec<N>) -> Self {
        Self { neurons }
    }

    /// Append a neuron
    pub fn push(&mut self, neuron: N) {
        self.neurons.push(neuron);
    }

    /// Iterate neurons in order
    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.neurons.iter()
    }

    /// Neuron at position
    pub fn get(&self, idx: usize) -> Option<&N> {
        self.neurons.get(idx)
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Neuron names in order, available only when every neuron has one
    pub fn names(&self) -> Option<Vec<String>> {
        self.neurons
            .iter()
            .map(|n| n.name().map(str::to_string))
            .collect()
    }

    /// Summary table with one row per neuron
    pub fn summary(&self) -> SummaryTable {
        SummaryTable::from_rows(self.neurons.iter().map(Neuron::summary_row).collect())
    }
}

impl<N: Neuron> FromIterator<N> for NeuronList<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, N> IntoIterator for &'a NeuronList<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.neurons.iter()
    }
}

impl<N> IntoIterator for NeuronList<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.neurons.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neuron::Node;
    use crate::tree::TreeNeuron;

    fn stick(name: Option<&str>, len: usize) -> TreeNeuron {
        let nodes = (0..len as i64)
            .map(|i| Node::new(i, if i == 0 { None } else { Some(i - 1) }, [i as f64, 0.0, 0.0]))
            .collect();
        let neuron = TreeNeuron::new(nodes).unwrap();
        match name {
            Some(name) => neuron.with_name(name),
            None => neuron,
        }
    }

    #[test]
    fn test_summary_table() {
        let list = NeuronList::new(vec![stick(Some("a"), 3), stick(Some("b"), 5)]);
        let summary = list.summary();

        assert_eq!(summary.n_rows(), 2);
        let n_nodes = summary.column("n_nodes").unwrap();
        assert_eq!(n_nodes.values, vec![AttrValue::Int(3), AttrValue::Int(5)]);
        assert_eq!(n_nodes.dtype(), Some(DType::Int64));
        assert!(summary.contains("cable_length"));
        assert!(!summary.contains("nope"));
    }

    #[test]
    fn test_summary_fills_missing_cells() {
        let rows = vec![
            vec![("a".to_string(), AttrValue::Int(1))],
            vec![("b".to_string(), AttrValue::Int(2))],
        ];
        let table = SummaryTable::from_rows(rows);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.column("a").unwrap().values[1], AttrValue::Missing);
    }

    #[test]
    fn test_names_require_all_neurons_named() {
        let named = NeuronList::new(vec![stick(Some("a"), 2), stick(Some("b"), 2)]);
        assert_eq!(named.names(), Some(vec!["a".to_string(), "b".to_string()]));

        let partial = NeuronList::new(vec![stick(Some("a"), 2), stick(None, 2)]);
        assert_eq!(partial.names(), None);
    }
}
