use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{is_identifier, FilterSpec, SortDirection, SqlResult};

/// Composes a complete `SELECT` for a list endpoint.
pub struct Filter {
    table_name: String,
    select_columns: Vec<String>,
    where_result: Option<SqlResult>,
    order_data: Vec<(String, SortDirection)>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        if !is_identifier(&table_name) {
            return Err(FilterError::InvalidTableName(table_name));
        }
        Ok(Self {
            table_name,
            select_columns: vec![],
            where_result: None,
            order_data: vec![],
        })
    }

    /// Select list entries are trusted; they come from the resource models,
    /// never from the request.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn where_params(&mut self, spec: &FilterSpec, params: &[(String, String)]) -> Result<&mut Self, FilterError> {
        let result = FilterWhere::generate(spec, params, 0)?;
        self.where_result = (!result.query.is_empty()).then_some(result);
        Ok(self)
    }

    pub fn order(&mut self, column: &str, sort: SortDirection) -> Result<&mut Self, FilterError> {
        if !is_identifier(column) {
            return Err(FilterError::InvalidColumn(column.to_string()));
        }
        self.order_data.push((column.to_string(), sort));
        Ok(self)
    }

    pub fn to_sql(&self) -> SqlResult {
        let select_clause = if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.join(", ")
        };

        let (where_clause, params) = match &self.where_result {
            Some(result) => (format!("WHERE {}", result.query), result.params.clone()),
            None => (String::new(), vec![]),
        };

        let order_clause = if self.order_data.is_empty() {
            String::new()
        } else {
            let parts: Vec<String> = self
                .order_data
                .iter()
                .map(|(column, sort)| format!("{} {}", column, sort.to_sql()))
                .collect();
            format!("ORDER BY {}", parts.join(", "))
        };

        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM {}", self.table_name),
            where_clause,
            order_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }
}
