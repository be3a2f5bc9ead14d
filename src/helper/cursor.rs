use std::sync::Arc;

use crate::pool::HelperConnection;
use crate::results::{DbRow, ResultSet};

/// Open handle over the rows of one query.
///
/// Rows are read when the statement runs, so the statement is already finalized. A cursor
/// from [`SqlHelper::execute_query`](crate::SqlHelper::execute_query) also owns the pooled
/// connection it ran on; [`close_all`](Self::close_all),
/// [`into_result_set`](Self::into_result_set) or dropping the cursor hands it back to the
/// pool.
#[derive(Debug)]
pub struct QueryCursor {
    column_names: Arc<Vec<String>>,
    rows: std::vec::IntoIter<DbRow>,
    conn: Option<HelperConnection>,
}

impl QueryCursor {
    pub(crate) fn owning(result_set: ResultSet, conn: HelperConnection) -> Self {
        let mut cursor = Self::detached(result_set);
        cursor.conn = Some(conn);
        cursor
    }

    pub(crate) fn detached(result_set: ResultSet) -> Self {
        let column_names = Arc::clone(result_set.column_names());
        Self {
            column_names,
            rows: result_set.results.into_iter(),
            conn: None,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Advance to the next row.
    pub fn next_row(&mut self) -> Option<DbRow> {
        self.rows.next()
    }

    /// Rows not yet read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.len() == 0
    }

    /// Whether this cursor still keeps a pooled connection checked out.
    #[must_use]
    pub fn holds_connection(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the remaining rows and the connection this cursor owns.
    pub fn close_all(mut self) {
        self.release();
    }

    /// Release the connection and keep the unread rows.
    #[must_use]
    pub fn into_result_set(mut self) -> ResultSet {
        let rows = std::mem::take(&mut self.rows).collect();
        self.release();
        ResultSet::from_rows(Arc::clone(&self.column_names), rows)
    }

    fn release(&mut self) {
        self.rows = Vec::new().into_iter();
        if let Some(conn) = self.conn.take() {
            drop(conn);
            tracing::trace!("cursor released its connection");
        }
    }
}

impl Iterator for QueryCursor {
    type Item = DbRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for QueryCursor {}

impl Drop for QueryCursor {
    fn drop(&mut self) {
        self.release();
    }
}
