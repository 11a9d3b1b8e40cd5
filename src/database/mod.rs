pub mod manager;
pub mod models;
pub mod repository;
pub mod storage;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{CompanyRepository, JobRepository};
pub use storage::{PgStorage, Row, Storage};
