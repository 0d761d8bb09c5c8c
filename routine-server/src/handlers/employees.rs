use axum::{
    Json,
    extract::{
        OriginalUri, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use routine_core::UpsertOutcome;
use routine_core::api::{
    EmployeeAddDto, EmployeeDto, EmployeeListParams, EmployeeUpdateDto,
};
use routine_model::{CompanyID, EmployeeID};
use tracing::debug;
use uuid::Uuid;

use super::pagination::{LinkParams, X_PAGINATION, pagination_header};
use crate::{AppState, infra::errors::AppError, infra::errors::AppResult};

fn employee_location(employee: &EmployeeDto) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&format!(
        "/api/company/{}/employee/{}",
        employee.company_id, employee.id
    ))
    .map_err(|err| AppError::internal(err.to_string()))
}

/// GET /api/company/{company_id}/employee
pub async fn list_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    company_id: Result<Path<Uuid>, PathRejection>,
    params: Result<Query<EmployeeListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(company_id) = company_id?;
    let Query(params) = params?;
    let company_id = CompanyID(company_id);
    let page = state.companies.list_employees(company_id, &params).await?;
    debug!(
        company = %company_id,
        total = page.total_count,
        page = page.current_page,
        "listed employees"
    );

    let links = LinkParams::new()
        .with("gender", params.gender.as_deref().map(str::trim))
        .with("q", params.search_term())
        .with("orderBy", Some(params.order_by.as_str()));
    let mut headers = HeaderMap::new();
    headers.insert(
        X_PAGINATION,
        pagination_header(uri.path(), &links, &page.metadata())?,
    );

    Ok((headers, Json(page.items)))
}

/// GET /api/company/{company_id}/employee/{employee_id}
pub async fn get_employee(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> AppResult<Json<EmployeeDto>> {
    let Path((company_id, employee_id)) = ids?;
    let employee = state
        .companies
        .get_employee(CompanyID(company_id), EmployeeID(employee_id))
        .await?;
    Ok(Json(employee))
}

/// POST /api/company/{company_id}/employee
pub async fn create_employee(
    State(state): State<AppState>,
    company_id: Result<Path<Uuid>, PathRejection>,
    request: Result<Json<EmployeeAddDto>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(company_id) = company_id?;
    let Json(request) = request?;
    let employee = state
        .companies
        .create_employee(CompanyID(company_id), request)
        .await?;
    let location = employee_location(&employee)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(employee),
    ))
}

/// PUT /api/company/{company_id}/employee/{employee_id}
///
/// Replaces the employee, or creates it under the given id: 204 on replace,
/// 201 with the new resource on create.
pub async fn upsert_employee(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
    request: Result<Json<EmployeeUpdateDto>, JsonRejection>,
) -> AppResult<Response> {
    let Path((company_id, employee_id)) = ids?;
    let Json(request) = request?;
    let outcome = state
        .companies
        .upsert_employee(CompanyID(company_id), EmployeeID(employee_id), request)
        .await?;

    match outcome {
        UpsertOutcome::Updated => Ok(StatusCode::NO_CONTENT.into_response()),
        UpsertOutcome::Created(employee) => {
            let location = employee_location(&employee)?;
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(employee),
            )
                .into_response())
        }
    }
}

/// DELETE /api/company/{company_id}/employee/{employee_id}
pub async fn delete_employee(
    State(state): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path((company_id, employee_id)) = ids?;
    state
        .companies
        .delete_employee(CompanyID(company_id), EmployeeID(employee_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
