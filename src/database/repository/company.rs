use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use super::first_or_404;
use crate::database::manager::DatabaseError;
use crate::database::models::company::{
    JoinedJob, COMPANY_COLUMNS, COMPANY_FIELDS, COMPANY_FILTERS, COMPANY_TABLE,
};
use crate::database::models::{Company, CompanyDetail, NewCompany};
use crate::database::storage::{from_row, Storage};
use crate::filter::{Filter, FilterUpdate, SortDirection, UpdateFields};

/// Company persistence. Every method issues exactly one statement.
#[derive(Clone)]
pub struct CompanyRepository {
    storage: Arc<dyn Storage>,
}

impl CompanyRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Inserts `data` unless the handle is taken, in which case `Conflict`.
    pub async fn create(&self, data: &NewCompany) -> Result<Company, DatabaseError> {
        let sql = format!(
            "INSERT INTO {table} ({columns}) \
             SELECT $1, $2, $3, $4, $5 \
             WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE handle = $1) \
             RETURNING {columns}",
            table = COMPANY_TABLE,
            columns = COMPANY_COLUMNS.join(", "),
        );
        let params = vec![
            json!(data.handle),
            json!(data.name),
            json!(data.description),
            json!(data.num_employees),
            json!(data.logo_url),
        ];

        let rows = self.storage.query(&sql, &params).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::Conflict(format!("Duplicate company: {}", data.handle)))?;

        info!("Created company: {}", data.handle);
        from_row(row)
    }

    /// All companies ordered by name, narrowed by the `name`, `minEmps` and
    /// `maxEmps` query parameters when present.
    pub async fn find_all(&self, params: &[(String, String)]) -> Result<Vec<Company>, DatabaseError> {
        let mut filter = Filter::new(COMPANY_TABLE)?;
        filter
            .select(COMPANY_COLUMNS)
            .where_params(&COMPANY_FILTERS, params)?
            .order("name", SortDirection::Asc)?;
        let sql = filter.to_sql();

        let rows = self.storage.query(&sql.query, &sql.params).await?;
        rows.into_iter().map(from_row).collect()
    }

    /// One company with its jobs, read in a single join.
    pub async fn get(&self, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let sql = "SELECT c.handle, c.name, c.description, c.num_employees, c.logo_url, \
                   j.id AS job_id, j.title AS job_title, j.salary AS job_salary, \
                   j.equity::text AS job_equity \
                   FROM companies AS c LEFT JOIN jobs AS j ON j.company_handle = c.handle \
                   WHERE c.handle = $1 \
                   ORDER BY j.title, j.id";

        let rows = self.storage.query(sql, &[json!(handle)]).await?;
        let Some(first) = rows.first().cloned() else {
            return Err(DatabaseError::NotFound(format!("No company: {}", handle)));
        };

        let company: Company = from_row(first)?;
        let jobs = rows
            .into_iter()
            .map(|row| from_row::<JoinedJob>(row).map(JoinedJob::into_job))
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update of the fields present in `fields`, in their order.
    pub async fn update(&self, handle: &str, fields: &UpdateFields) -> Result<Company, DatabaseError> {
        let set = FilterUpdate::generate(fields, &COMPANY_FIELDS)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE handle = ${} RETURNING {}",
            COMPANY_TABLE,
            set.query,
            set.next_param_index(),
            COMPANY_COLUMNS.join(", "),
        );
        let mut params = set.params;
        params.push(Value::String(handle.to_string()));

        let rows = self.storage.query(&sql, &params).await?;
        let row = first_or_404(rows, || format!("No company: {}", handle))?;

        info!("Updated company: {}", handle);
        from_row(row)
    }

    /// Deletes the company; its jobs go with it.
    pub async fn remove(&self, handle: &str) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE handle = $1 RETURNING handle", COMPANY_TABLE);
        let rows = self.storage.query(&sql, &[json!(handle)]).await?;
        first_or_404(rows, || format!("No company: {}", handle))?;

        info!("Removed company: {}", handle);
        Ok(())
    }
}
