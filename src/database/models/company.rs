use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::filter::{FieldMap, FilterField, FilterSpec, Predicate};

pub const COMPANY_TABLE: &str = "companies";

pub const COMPANY_COLUMNS: &[&str] = &["handle", "name", "description", "num_employees", "logo_url"];

pub const COMPANY_FIELDS: FieldMap =
    FieldMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]).immutable(&["handle"]);

pub const COMPANY_FILTERS: FilterSpec = FilterSpec::new(
    COMPANY_TABLE,
    &[
        FilterField::new("name", "name", Predicate::Contains),
        FilterField::new("minEmps", "num_employees", Predicate::AtLeast),
        FilterField::new("maxEmps", "num_employees", Predicate::AtMost),
    ],
);

/// A company row. Reads snake_case columns, writes camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company with the jobs it posts. `jobs` is left out when there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

/// The job half of a company/jobs join row; all null when the company has no jobs.
#[derive(Debug, Deserialize)]
pub(crate) struct JoinedJob {
    pub job_id: Option<i32>,
    pub job_title: Option<String>,
    pub job_salary: Option<i32>,
    pub job_equity: Option<Decimal>,
}

impl JoinedJob {
    pub(crate) fn into_job(self) -> Option<CompanyJob> {
        Some(CompanyJob {
            id: self.job_id?,
            title: self.job_title?,
            salary: self.job_salary,
            equity: self.job_equity,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    #[validate(length(min = 1, max = 25))]
    pub handle: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub num_employees: Option<i32>,
    #[validate(url)]
    pub logo_url: Option<String>,
}

/// Accepted shape of a company PATCH body. Only used to validate; the
/// fields actually written are the ones the client sent.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub num_employees: Option<i32>,
    #[validate(url)]
    pub logo_url: Option<String>,
}
