//! # Routine Core
//!
//! Business logic for the Routine company/employee API.
//!
//! ## Overview
//!
//! - [`query`]: sort expression parsing, field mapping registry, ordering
//!   dispatch and offset pagination
//! - [`api`]: view models, input models and request validation
//! - [`database`]: the [`CompanyRepository`] port with PostgreSQL and
//!   in-memory adapters
//! - [`application`]: the use cases the HTTP layer calls
//!
//! ## Feature Flags
//!
//! - `database`: PostgreSQL support via SQLx and the embedded migrations

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod application;
pub mod database;
pub mod error;
pub mod query;

pub use application::{CompanyService, UpsertOutcome};
pub use database::{
    CompanyFilter, CompanyRepository, EmployeeFilter, InMemoryCompanyRepository,
};
pub use error::{Result, RoutineError};

#[cfg(feature = "database")]
pub use database::{PostgresCompanyRepository, PostgresDatabase};

pub use routine_model as model;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
