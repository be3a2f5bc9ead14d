use std::collections::HashMap;
use std::sync::Arc;

use super::row::{DbRow, index_columns};
use crate::types::RowValues;

/// Rows materialized from one query execution.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<DbRow>,
    /// Number of rows added so far
    pub rows_affected: usize,
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns, with room for `capacity` rows.
    #[must_use]
    pub fn with_columns(column_names: Vec<String>, capacity: usize) -> ResultSet {
        let column_index = Arc::new(index_columns(&column_names));
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: Arc::new(column_names),
            column_index,
        }
    }

    /// Reassemble a result set from rows that already share `column_names`.
    pub(crate) fn from_rows(column_names: Arc<Vec<String>>, results: Vec<DbRow>) -> ResultSet {
        let column_index = Arc::new(index_columns(&column_names));
        ResultSet {
            rows_affected: results.len(),
            results,
            column_names,
            column_index,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Append a row whose values are in column order.
    pub fn add_row_values(&mut self, values: Vec<RowValues>) {
        self.results.push(DbRow {
            column_names: Arc::clone(&self.column_names),
            values,
            column_index: Arc::clone(&self.column_index),
        });
        self.rows_affected += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First column of the first row, if any row exists.
    #[must_use]
    pub fn into_single(self) -> Option<RowValues> {
        self.results.into_iter().next().and_then(DbRow::into_first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_lookup() {
        let mut rs = ResultSet::with_columns(vec!["id".into(), "name".into()], 2);
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("alice".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("bob".into())]);

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(rs.results[1].get("name").and_then(RowValues::as_text), Some("bob"));
        assert_eq!(rs.results[0].get_by_index(0), Some(&RowValues::Int(1)));
        assert!(rs.results[0].get("missing").is_none());
        assert!(Arc::ptr_eq(&rs.results[0].column_names, &rs.results[1].column_names));
    }

    #[test]
    fn single_is_first_column_of_first_row() {
        let mut rs = ResultSet::with_columns(vec!["n".into(), "other".into()], 1);
        rs.add_row_values(vec![RowValues::Int(7), RowValues::Null]);
        assert_eq!(rs.into_single(), Some(RowValues::Int(7)));

        let empty = ResultSet::with_columns(vec!["n".into()], 0);
        assert_eq!(empty.into_single(), None);
    }
}
