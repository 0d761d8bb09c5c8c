pub mod dto;
pub mod params;
pub mod validation;

pub use dto::{
    CompanyAddDto, CompanyDto, EmployeeAddDto, EmployeeDto, EmployeeInputDto,
    EmployeeUpdateDto,
};
pub use params::{CompanyListParams, EmployeeListParams};
pub use validation::ValidationErrors;
