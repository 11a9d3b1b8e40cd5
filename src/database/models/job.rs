use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{FieldMap, FilterField, FilterSpec, Predicate};

pub const JOB_TABLE: &str = "jobs";

// equity leaves storage as text so the decimal keeps its exact digits
pub const JOB_COLUMNS: &[&str] = &["id", "title", "salary", "equity::text AS equity", "company_handle"];

pub const JOB_FIELDS: FieldMap =
    FieldMap::new(&[("companyHandle", "company_handle")]).immutable(&["id", "company_handle"]);

pub const JOB_FILTERS: FilterSpec = FilterSpec::new(
    JOB_TABLE,
    &[
        FilterField::new("title", "title", Predicate::Contains),
        FilterField::new("minSalary", "salary", Predicate::AtLeast),
        FilterField::new("hasEquity", "equity", Predicate::NonZero),
    ],
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0))]
    pub salary: Option<i32>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub equity: Option<f64>,
    #[validate(length(min = 1, max = 25))]
    pub company_handle: String,
}

/// Accepted shape of a job PATCH body. `id` and `companyHandle` are not part of it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct JobUpdate {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub salary: Option<i32>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub equity: Option<f64>,
}
