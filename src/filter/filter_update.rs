use super::error::FilterError;
use super::types::{is_identifier, FieldMap, SqlResult, UpdateFields};

/// Builds the `SET` list of a partial update.
pub struct FilterUpdate;

impl FilterUpdate {
    /// Turns `fields` into `col1 = $1, col2 = $2, ...` plus the values in the
    /// same order. `null` values are kept and null the column out.
    ///
    /// Callers address the row with `$` + [`SqlResult::next_param_index`].
    pub fn generate(fields: &UpdateFields, columns: &FieldMap) -> Result<SqlResult, FilterError> {
        if fields.is_empty() {
            return Err(FilterError::NoData);
        }

        let mut assignments = Vec::with_capacity(fields.len());
        let mut params = Vec::with_capacity(fields.len());

        for (field, value) in fields.iter() {
            let column = columns.column(field);
            if !is_identifier(column) {
                return Err(FilterError::InvalidColumn(field.to_string()));
            }
            if columns.is_immutable(column) {
                return Err(FilterError::ImmutableField(field.to_string()));
            }

            params.push(value.clone());
            assignments.push(format!("{} = ${}", column, params.len()));
        }

        Ok(SqlResult { query: assignments.join(", "), params })
    }
}
