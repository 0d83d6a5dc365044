//! Column-oriented numeric table.
//!
//! A `Dataset` is built once (from CSV or the synthetic generator) and then only
//! read. Column order is preserved because it defines the default candidate order.

use std::collections::HashMap;

use crate::error::SelectError;

#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    nrows: usize,
}

impl Dataset {
    /// Build a dataset from `(name, values)` pairs.
    ///
    /// All columns must have the same length, names must be unique, and every value
    /// must be finite.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, SelectError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut data = Vec::new();
        let mut index = HashMap::new();
        let mut nrows = None;

        for (name, values) in columns {
            let name = name.into();
            let expected = *nrows.get_or_insert(values.len());
            if values.len() != expected {
                return Err(SelectError::LengthMismatch {
                    name,
                    expected,
                    actual: values.len(),
                });
            }
            if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                return Err(SelectError::NonFiniteValue { name, row });
            }
            if index.insert(name.clone(), data.len()).is_some() {
                return Err(SelectError::DuplicateVariable { name });
            }
            names.push(name);
            data.push(values);
        }

        Ok(Self {
            names,
            columns: data,
            index,
            nrows: nrows.unwrap_or(0),
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.names.len()
    }

    /// Column names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Borrow a column by name.
    pub fn column(&self, name: &str) -> Result<&[f64], SelectError> {
        self.index
            .get(name)
            .map(|&idx| self.columns[idx].as_slice())
            .ok_or_else(|| SelectError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Borrow several columns at once, preserving the requested order.
    pub fn columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&[f64]>, SelectError> {
        names.iter().map(|n| self.column(n.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Dataset {
        Dataset::from_columns(vec![
            ("y", vec![1.0, 2.0, 3.0]),
            ("x1", vec![0.0, 1.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let ds = small();
        assert_eq!(ds.nrows(), 3);
        assert_eq!(ds.names(), &["y".to_string(), "x1".to_string()]);
        assert_eq!(ds.column("x1").unwrap(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let ds = small();
        let err = ds.columns(&["x1", "x7"]).unwrap_err();
        assert_eq!(
            err,
            SelectError::ColumnNotFound {
                name: "x7".to_string()
            }
        );
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Dataset::from_columns(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]).unwrap_err();
        assert!(matches!(err, SelectError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = Dataset::from_columns(vec![
            ("y", vec![1.0, 2.0, f64::NAN]),
            ("x1", vec![0.0, 1.0, 2.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SelectError::NonFiniteValue {
                name: "y".to_string(),
                row: 2
            }
        );

        let err = Dataset::from_columns(vec![("x1", vec![f64::INFINITY])]).unwrap_err();
        assert!(matches!(err, SelectError::NonFiniteValue { row: 0, .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Dataset::from_columns(vec![("a", vec![1.0]), ("a", vec![2.0])]).unwrap_err();
        assert!(matches!(err, SelectError::DuplicateVariable { .. }));
    }
}
