pub mod memory;
pub mod ports;
pub mod seed;

#[cfg(feature = "database")]
pub mod postgres;

pub use memory::InMemoryCompanyRepository;
pub use ports::{CompanyFilter, CompanyRepository, EmployeeFilter};

#[cfg(feature = "database")]
pub use postgres::{PostgresCompanyRepository, PostgresDatabase};
