use axum::extract::{Path, Query, State};

use super::{PartialJson, ValidJson};
use crate::database::models::{Job, JobUpdate, NewJob};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, Query(params): Query<Vec<(String, String)>>) -> ApiResult<Vec<Job>> {
    let jobs = state.jobs.find_all(&params).await?;
    Ok(ApiResponse::success(jobs))
}

pub async fn create(State(state): State<AppState>, ValidJson(data): ValidJson<NewJob>) -> ApiResult<Job> {
    let job = state.jobs.create(&data).await?;
    Ok(ApiResponse::created(job))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Job> {
    let job = state.jobs.get(id).await?;
    Ok(ApiResponse::success(job))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    PartialJson(fields, _): PartialJson<JobUpdate>,
) -> ApiResult<Job> {
    let job = state.jobs.update(id, &fields).await?;
    Ok(ApiResponse::success(job))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.jobs.remove(id).await?;
    Ok(ApiResponse::no_content())
}
