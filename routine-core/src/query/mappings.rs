//! Storage shapes of the persisted entities and the registry wiring the
//! public view models onto them.

use routine_model::{Company, Employee};

use super::mapping::{
    MappingError, MappingRegistry, MappingTable, Shape, StorageShape,
};
use super::memory::{SortValue, SortableRecord};
use crate::api::dto::{CompanyDto, EmployeeDto};

/// Column every list falls back to so that paging is deterministic.
pub const ID_COLUMN: &str = "id";

pub mod company_columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const INTRODUCTION: &str = "introduction";
}

pub mod employee_columns {
    pub const ID: &str = "id";
    pub const COMPANY_ID: &str = "company_id";
    pub const EMPLOYEE_NO: &str = "employee_no";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const GENDER: &str = "gender";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
}

impl Shape for Company {
    const SHAPE: &'static str = "Company";
}

impl StorageShape for Company {
    const SORTABLE_FIELDS: &'static [&'static str] = &[
        company_columns::ID,
        company_columns::NAME,
        company_columns::INTRODUCTION,
    ];
}

impl Shape for Employee {
    const SHAPE: &'static str = "Employee";
}

impl StorageShape for Employee {
    const SORTABLE_FIELDS: &'static [&'static str] = &[
        employee_columns::ID,
        employee_columns::COMPANY_ID,
        employee_columns::EMPLOYEE_NO,
        employee_columns::FIRST_NAME,
        employee_columns::LAST_NAME,
        employee_columns::GENDER,
        employee_columns::DATE_OF_BIRTH,
    ];
}

impl SortableRecord for Company {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            company_columns::ID => SortValue::Uuid(self.id.to_uuid()),
            company_columns::NAME => SortValue::Text(&self.name),
            company_columns::INTRODUCTION => self
                .introduction
                .as_deref()
                .map_or(SortValue::Missing, SortValue::Text),
            _ => SortValue::Missing,
        }
    }
}

impl SortableRecord for Employee {
    fn sort_value(&self, field: &str) -> SortValue<'_> {
        use employee_columns as col;

        match field {
            col::ID => SortValue::Uuid(self.id.to_uuid()),
            col::COMPANY_ID => SortValue::Uuid(self.company_id.to_uuid()),
            col::EMPLOYEE_NO => SortValue::Text(&self.employee_no),
            col::FIRST_NAME => SortValue::Text(&self.first_name),
            col::LAST_NAME => SortValue::Text(&self.last_name),
            col::GENDER => SortValue::Int(i64::from(self.gender.as_i16())),
            col::DATE_OF_BIRTH => SortValue::Date(self.date_of_birth),
            _ => SortValue::Missing,
        }
    }
}

pub fn company_table() -> Result<MappingTable, MappingError> {
    MappingTable::builder::<Company>()
        .map("id", &[company_columns::ID])
        .map("companyName", &[company_columns::NAME])
        .build()
}

pub fn employee_table() -> Result<MappingTable, MappingError> {
    use employee_columns as col;

    MappingTable::builder::<Employee>()
        .map("id", &[col::ID])
        .map("companyId", &[col::COMPANY_ID])
        .map("employeeNo", &[col::EMPLOYEE_NO])
        .map("name", &[col::FIRST_NAME, col::LAST_NAME])
        .map("gender", &[col::GENDER])
        .map_reversed("age", &[col::DATE_OF_BIRTH])
        .build()
}

/// Registers every view-model mapping the API serves.
pub fn default_registry() -> Result<MappingRegistry, MappingError> {
    let mut registry = MappingRegistry::new();
    registry.register::<CompanyDto, Company>(company_table()?)?;
    registry.register::<EmployeeDto, Employee>(employee_table()?)?;
    Ok(registry)
}

/// Confirms every pair the API resolves at request time is registered.
pub fn self_check(registry: &MappingRegistry) -> Result<(), MappingError> {
    registry.resolve::<CompanyDto, Company>()?;
    registry.resolve::<EmployeeDto, Employee>()?;
    Ok(())
}
