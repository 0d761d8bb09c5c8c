//! Core data model definitions shared across Routine crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod company;
pub mod employee;
pub mod error;
pub mod gender;
pub mod ids;

pub use company::Company;
pub use employee::Employee;
pub use error::{ModelError, Result as ModelResult};
pub use gender::Gender;
pub use ids::{CompanyID, EmployeeID};
