use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::first_or_404;
use crate::database::manager::DatabaseError;
use crate::database::models::job::{JOB_COLUMNS, JOB_FIELDS, JOB_FILTERS, JOB_TABLE};
use crate::database::models::{Job, NewJob};
use crate::database::storage::{from_row, Storage};
use crate::filter::{Filter, FilterUpdate, SortDirection, UpdateFields};

#[derive(Clone)]
pub struct JobRepository {
    storage: Arc<dyn Storage>,
}

impl JobRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Inserts `data` unless the company already posts a job with that
    /// title. The company itself must exist (enforced by the foreign key).
    pub async fn create(&self, data: &NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO {table} (title, salary, equity, company_handle) \
             SELECT $1, $2, $3, $4 \
             WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE title = $1 AND company_handle = $4) \
             RETURNING {columns}",
            table = JOB_TABLE,
            columns = JOB_COLUMNS.join(", "),
        );
        let params = vec![
            json!(data.title),
            json!(data.salary),
            json!(data.equity),
            json!(data.company_handle),
        ];

        let rows = self.storage.query(&sql, &params).await?;
        let row = rows.into_iter().next().ok_or_else(|| {
            DatabaseError::Conflict(format!("Duplicate job: {} with {}", data.title, data.company_handle))
        })?;

        let job: Job = from_row(row)?;
        info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs ordered by title, narrowed by `title`, `minSalary` and `hasEquity`.
    pub async fn find_all(&self, params: &[(String, String)]) -> Result<Vec<Job>, DatabaseError> {
        let mut filter = Filter::new(JOB_TABLE)?;
        filter
            .select(JOB_COLUMNS)
            .where_params(&JOB_FILTERS, params)?
            .order("title", SortDirection::Asc)?
            .order("id", SortDirection::Asc)?;
        let sql = filter.to_sql();

        let rows = self.storage.query(&sql.query, &sql.params).await?;
        rows.into_iter().map(from_row).collect()
    }

    pub async fn get(&self, id: i32) -> Result<Job, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", JOB_COLUMNS.join(", "), JOB_TABLE);
        let rows = self.storage.query(&sql, &[json!(id)]).await?;
        from_row(first_or_404(rows, || format!("No job: {}", id))?)
    }

    pub async fn update(&self, id: i32, fields: &UpdateFields) -> Result<Job, DatabaseError> {
        let set = FilterUpdate::generate(fields, &JOB_FIELDS)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            JOB_TABLE,
            set.query,
            set.next_param_index(),
            JOB_COLUMNS.join(", "),
        );
        let mut params = set.params;
        params.push(json!(id));

        let rows = self.storage.query(&sql, &params).await?;
        let row = first_or_404(rows, || format!("No job: {}", id))?;

        info!("Updated job: {}", id);
        from_row(row)
    }

    pub async fn remove(&self, id: i32) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id", JOB_TABLE);
        let rows = self.storage.query(&sql, &[json!(id)]).await?;
        first_or_404(rows, || format!("No job: {}", id))?;

        info!("Removed job: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterError;
    use crate::testing::MockStorage;
    use serde_json::Value;

    fn setup() -> (Arc<MockStorage>, JobRepository) {
        let storage = Arc::new(MockStorage::new());
        let repo = JobRepository::new(storage.clone());
        (storage, repo)
    }

    fn j1_row() -> Value {
        json!({
            "id": 1,
            "title": "J1",
            "salary": 100,
            "equity": "0.1",
            "company_handle": "c1"
        })
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn create_returns_job_with_id() {
        let (storage, repo) = setup();
        storage.push_rows(vec![json!({
            "id": 5,
            "title": "new",
            "salary": 120000,
            "equity": "0.4",
            "company_handle": "c1"
        })]);

        let data = NewJob {
            title: "new".into(),
            salary: Some(120000),
            equity: Some(0.4),
            company_handle: "c1".into(),
        };
        let job = repo.create(&data).await.unwrap();
        assert_eq!(job.id, 5);
        assert_eq!(serde_json::to_value(&job).unwrap()["equity"], json!("0.4"));

        let (sql, params) = &storage.calls()[0];
        assert!(sql.contains("WHERE title = $1 AND company_handle = $4"));
        assert_eq!(params, &vec![json!("new"), json!(120000), json!(0.4), json!("c1")]);
    }

    #[tokio::test]
    async fn create_duplicate_is_conflict() {
        let (_storage, repo) = setup();
        let data = NewJob {
            title: "J1".into(),
            salary: None,
            equity: None,
            company_handle: "c1".into(),
        };
        let err = repo.create(&data).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(msg) if msg == "Duplicate job: J1 with c1"));
    }

    #[tokio::test]
    async fn create_for_missing_company_is_a_constraint_error() {
        let (storage, repo) = setup();
        storage.push_error(DatabaseError::Constraint("violates foreign key constraint".into()));
        let data = NewJob {
            title: "new".into(),
            salary: None,
            equity: None,
            company_handle: "nope".into(),
        };
        assert!(matches!(repo.create(&data).await, Err(DatabaseError::Constraint(_))));
    }

    #[tokio::test]
    async fn find_all_orders_by_title_then_id() {
        let (storage, repo) = setup();
        storage.push_rows(vec![j1_row()]);

        let jobs = repo.find_all(&[]).await.unwrap();
        assert_eq!(jobs[0].title, "J1");
        assert_eq!(
            storage.calls()[0].0,
            "SELECT id, title, salary, equity::text AS equity, company_handle FROM jobs ORDER BY title ASC, id ASC"
        );
    }

    #[tokio::test]
    async fn find_all_with_filters() {
        let (storage, repo) = setup();
        repo.find_all(&params(&[("minSalary", "150"), ("hasEquity", "true")]))
            .await
            .unwrap();

        let (sql, params) = &storage.calls()[0];
        assert!(sql.contains("WHERE salary >= $1 AND equity > 0 ORDER BY"));
        assert_eq!(params, &vec![json!(150)]);
    }

    #[tokio::test]
    async fn company_filters_are_rejected_for_jobs() {
        let (storage, repo) = setup();
        let err = repo.find_all(&params(&[("minEmps", "1")])).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Filter(FilterError::UnknownFilter { .. })));
        assert_eq!(storage.call_count(), 0);
    }

    #[tokio::test]
    async fn get_and_not_found() {
        let (storage, repo) = setup();
        storage.push_rows(vec![j1_row()]);

        let job = repo.get(1).await.unwrap();
        assert_eq!(job.company_handle, "c1");
        assert_eq!(storage.calls()[0].1, vec![json!(1)]);

        let err = repo.get(0).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(msg) if msg == "No job: 0"));
    }

    #[tokio::test]
    async fn update_only_salary() {
        let (storage, repo) = setup();
        let mut row = j1_row();
        row["salary"] = json!(500);
        storage.push_rows(vec![row]);

        let fields: UpdateFields = vec![("salary", json!(500))].into_iter().collect();
        let job = repo.update(1, &fields).await.unwrap();
        assert_eq!(job.salary, Some(500));
        assert_eq!(job.title, "J1");

        let (sql, params) = &storage.calls()[0];
        assert!(sql.starts_with("UPDATE jobs SET salary = $1 WHERE id = $2 RETURNING"));
        assert_eq!(params, &vec![json!(500), json!(1)]);
    }

    #[tokio::test]
    async fn update_cannot_move_job_between_companies() {
        let (storage, repo) = setup();
        let fields: UpdateFields = vec![("companyHandle", json!("c2"))].into_iter().collect();
        let err = repo.update(1, &fields).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Filter(FilterError::ImmutableField(_))));
        assert_eq!(storage.call_count(), 0);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (_storage, repo) = setup();
        let fields: UpdateFields = vec![("title", json!("x"))].into_iter().collect();
        assert!(matches!(repo.update(0, &fields).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_then_missing() {
        let (storage, repo) = setup();
        storage.push_rows(vec![json!({"id": 1})]);
        repo.remove(1).await.unwrap();
        assert!(matches!(repo.remove(1).await, Err(DatabaseError::NotFound(_))));
    }
}
