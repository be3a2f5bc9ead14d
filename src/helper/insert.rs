use crate::error::SqlHelperError;
use crate::types::RowValues;

/// Turn the insert's affected-row count and the id query's first column into an id.
///
/// A zero id is how MySQL and `SQLite` report "nothing generated on this connection", so it
/// counts as absent along with no row and NULL.
pub(crate) fn require_generated_id(
    affected: usize,
    generated: Option<RowValues>,
) -> Result<i64, SqlHelperError> {
    if affected == 0 {
        return Err(SqlHelperError::NoGeneratedId);
    }
    let id = match generated {
        None | Some(RowValues::Null) => return Err(SqlHelperError::NoGeneratedId),
        Some(RowValues::Int(id)) => id,
        Some(RowValues::Text(text)) => text.trim().parse::<i64>().map_err(|e| {
            SqlHelperError::ExecutionError(format!("generated id {text:?} is not an integer: {e}"))
        })?,
        Some(other) => {
            return Err(SqlHelperError::ExecutionError(format!(
                "generated id is not an integer: {other:?}"
            )));
        }
    };
    if id == 0 {
        return Err(SqlHelperError::NoGeneratedId);
    }
    Ok(id)
}
