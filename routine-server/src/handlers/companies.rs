use axum::{
    Json,
    extract::{
        OriginalUri, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use routine_core::api::{CompanyAddDto, CompanyDto, CompanyListParams};
use routine_model::CompanyID;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::pagination::{LinkParams, X_PAGINATION, pagination_header};
use crate::{AppState, infra::errors::AppError, infra::errors::AppResult};

pub const COMPANY_ALLOW: &str = "GET, HEAD, POST, OPTIONS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdListError {
    #[error("at least one company id is required")]
    Empty,
    #[error("'{0}' is not a valid company id")]
    Invalid(String),
}

impl From<IdListError> for AppError {
    fn from(err: IdListError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// Parses `(id1,id2)` or `id1,id2`.
pub fn parse_id_list(raw: &str) -> Result<Vec<CompanyID>, IdListError> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    if inner.trim().is_empty() {
        return Err(IdListError::Empty);
    }

    inner
        .split(',')
        .map(str::trim)
        .map(|part| {
            Uuid::parse_str(part)
                .map(CompanyID)
                .map_err(|_| IdListError::Invalid(part.to_string()))
        })
        .collect()
}

fn location(value: String) -> AppResult<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| AppError::internal(err.to_string()))
}

/// GET (and HEAD) /api/company
pub async fn list_companies(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<CompanyListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let page = state.companies.list_companies(&params).await?;
    debug!(
        total = page.total_count,
        page = page.current_page,
        "listed companies"
    );

    let links = LinkParams::new()
        .with("name", params.name_filter())
        .with("q", params.search_term())
        .with("orderBy", Some(params.order_by.as_str()));
    let mut headers = HeaderMap::new();
    headers.insert(
        X_PAGINATION,
        pagination_header(uri.path(), &links, &page.metadata())?,
    );

    Ok((headers, Json(page.items)))
}

/// OPTIONS /api/company
pub async fn company_options() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::ALLOW, HeaderValue::from_static(COMPANY_ALLOW))],
    )
}

/// GET /api/company/{company_id}
pub async fn get_company(
    State(state): State<AppState>,
    company_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<CompanyDto>> {
    let Path(company_id) = company_id?;
    let company = state.companies.get_company(CompanyID(company_id)).await?;
    Ok(Json(company))
}

/// POST /api/company
pub async fn create_company(
    State(state): State<AppState>,
    request: Result<Json<CompanyAddDto>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = request?;
    let company = state.companies.create_company(request).await?;
    let location = location(format!("/api/company/{}", company.id))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(company),
    ))
}

/// GET /api/companies/{ids}
pub async fn get_company_collection(
    State(state): State<AppState>,
    Path(ids): Path<String>,
) -> AppResult<Json<Vec<CompanyDto>>> {
    let ids = parse_id_list(&ids)?;
    let companies = state.companies.get_companies(&ids).await?;
    Ok(Json(companies))
}

/// POST /api/companies
pub async fn create_company_collection(
    State(state): State<AppState>,
    request: Result<Json<Vec<CompanyAddDto>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = request?;
    if request.is_empty() {
        return Err(AppError::bad_request("at least one company is required"));
    }

    let companies = state.companies.create_companies(request).await?;
    let ids = companies
        .iter()
        .map(|company| company.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let location = location(format!("/api/companies/({ids})"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(companies),
    ))
}
