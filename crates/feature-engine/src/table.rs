//! Output feature table

use crate::error::FeatureError;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::io;

/// Non-fatal notice raised while building a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub feature: String,
    /// Row (neuron position) the notice refers to
    pub row: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The feature value was missing; the cell holds NaN
    MissingValue,
    /// Category unseen at fit time; the cell holds NaN
    UnknownCategory(String),
}

/// Numeric feature table: one row per neuron, one column per feature
#[derive(Debug, Clone)]
pub struct FeatureTable {
    columns: Vec<String>,
    index: Option<Vec<String>>,
    values: Array2<f64>,
    diagnostics: Vec<Diagnostic>,
}

impl FeatureTable {
    pub(crate) fn new(
        columns: Vec<String>,
        index: Option<Vec<String>>,
        values: Array2<f64>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        debug_assert_eq!(columns.len(), values.ncols());
        Self {
            columns,
            index,
            values,
            diagnostics,
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Column names, in feature specification order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels (neuron names), when every neuron is named
    pub fn index(&self) -> Option<&[String]> {
        self.index.as_deref()
    }

    /// Underlying matrix
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Take the matrix, e.g. to hand it to a scaler
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(idx))
    }

    /// Row by position
    pub fn row(&self, idx: usize) -> Option<ArrayView1<'_, f64>> {
        (idx < self.n_rows()).then(|| self.values.row(idx))
    }

    /// Single cell
    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        self.column(column)?.get(row).copied()
    }

    /// Notices raised while this table was built
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Rows as plain vectors
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values
            .axis_iter(Axis(0))
            .map(|row| row.to_vec())
            .collect()
    }

    /// Write as CSV; the first column holds row labels when present and
    /// missing cells are left empty
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), FeatureError> {
        let mut writer = csv::Writer::from_writer(writer);

        let label = self.index.as_ref().map(|_| "name");
        writer
            .write_record(label.into_iter().chain(self.columns.iter().map(String::as_str)))
            .map_err(csv_error)?;

        for (idx, row) in self.values.axis_iter(Axis(0)).enumerate() {
            let label = self.index.as_ref().map(|index| index[idx].clone());
            let cells = row
                .iter()
                .map(|v| if v.is_nan() { String::new() } else { v.to_string() });
            writer
                .write_record(label.into_iter().chain(cells))
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|e| FeatureError::Output(e.to_string()))
    }

    /// Render as CSV text
    pub fn to_csv(&self) -> Result<String, FeatureError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| FeatureError::Output(e.to_string()))
    }
}

fn csv_error(err: csv::Error) -> FeatureError {
    FeatureError::Output(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn table() -> FeatureTable {
        FeatureTable::new(
            vec!["a".to_string(), "b".to_string()],
            Some(vec!["n1".to_string(), "n2".to_string()]),
            array![[1.0, 2.0], [3.0, f64::NAN]],
            Vec::new(),
        )
    }

    #[test]
    fn test_accessors() {
        let table = table();
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.column("a").unwrap().to_vec(), vec![1.0, 3.0]);
        assert_eq!(table.get(0, "b"), Some(2.0));
        assert!(table.get(1, "b").unwrap().is_nan());
        assert_eq!(table.get(0, "c"), None);
        assert!(table.row(2).is_none());
    }

    #[test]
    fn test_csv() {
        assert_eq!(table().to_csv().unwrap(), "name,a,b\nn1,1,2\nn2,3,\n");
    }

    #[test]
    fn test_csv_quotes_awkward_names() {
        let table = FeatureTable::new(
            vec!["a".to_string()],
            Some(vec!["KC, gamma".to_string(), "say \"hi\"".to_string()]),
            array![[1.0], [2.0]],
            Vec::new(),
        );
        let csv = table.to_csv().unwrap();
        assert_eq!(csv, "name,a\n\"KC, gamma\",1\n\"say \"\"hi\"\"\",2\n");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let header_len = reader.headers().unwrap().len();
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), header_len);
        }
    }

    #[test]
    fn test_csv_without_index() {
        let table = FeatureTable::new(vec!["a".to_string()], None, array![[1.5]], Vec::new());
        assert_eq!(table.to_csv().unwrap(), "a\n1.5\n");
    }
}
