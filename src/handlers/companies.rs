use axum::extract::{Path, Query, State};

use super::{PartialJson, ValidJson};
use crate::database::models::{Company, CompanyDetail, CompanyUpdate, NewCompany};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /companies
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Company>> {
    let companies = state.companies.find_all(&params).await?;
    Ok(ApiResponse::success(companies))
}

/// POST /companies (admin)
pub async fn create(State(state): State<AppState>, ValidJson(data): ValidJson<NewCompany>) -> ApiResult<Company> {
    let company = state.companies.create(&data).await?;
    Ok(ApiResponse::created(company))
}

/// GET /companies/:handle
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let company = state.companies.get(&handle).await?;
    Ok(ApiResponse::success(company))
}

/// PATCH /companies/:handle (admin)
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    PartialJson(fields, _): PartialJson<CompanyUpdate>,
) -> ApiResult<Company> {
    let company = state.companies.update(&handle, &fields).await?;
    Ok(ApiResponse::success(company))
}

/// DELETE /companies/:handle (admin)
pub async fn delete(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<()> {
    state.companies.remove(&handle).await?;
    Ok(ApiResponse::no_content())
}
