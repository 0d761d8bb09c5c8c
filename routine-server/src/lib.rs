//! # Routine Server
//!
//! HTTP surface for the Routine company/employee API.
//!
//! ## Overview
//!
//! - **Companies**: paged, filtered and sortable listings, single and bulk
//!   lookup, single and bulk creation with nested employees
//! - **Employees**: paged listings per company, create, replace-or-create,
//!   delete
//! - **Navigation**: list responses carry an `X-Pagination` header with
//!   totals and links to the neighbouring pages
//!
//! ## Architecture
//!
//! The server is built on Axum and delegates every use case to
//! [`routine_core::CompanyService`], backed by PostgreSQL or a seeded
//! in-memory store.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::errors::{AppError, AppResult};
pub use infra::startup::build_router;
