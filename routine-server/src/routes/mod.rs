use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    handlers::{companies, employees},
};

/// Create the API router; mounted under `/api`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        // `get` also answers HEAD with the same headers and no body
        .route(
            "/company",
            get(companies::list_companies)
                .post(companies::create_company)
                .options(companies::company_options),
        )
        .route("/company/{company_id}", get(companies::get_company))
        .route(
            "/companies",
            post(companies::create_company_collection),
        )
        .route("/companies/{ids}", get(companies::get_company_collection))
        .route(
            "/company/{company_id}/employee",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/company/{company_id}/employee/{employee_id}",
            get(employees::get_employee)
                .put(employees::upsert_employee)
                .delete(employees::delete_employee),
        )
}
