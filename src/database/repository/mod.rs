pub mod company;
pub mod job;

pub use company::CompanyRepository;
pub use job::JobRepository;

use super::manager::DatabaseError;
use super::storage::Row;

/// First row of a statement that addresses one record, or `NotFound`.
pub(crate) fn first_or_404(rows: Vec<Row>, not_found: impl FnOnce() -> String) -> Result<Row, DatabaseError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| DatabaseError::NotFound(not_found()))
}
