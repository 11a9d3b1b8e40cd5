pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, CompanyJob, CompanyUpdate, NewCompany};
pub use job::{Job, JobUpdate, NewJob};
