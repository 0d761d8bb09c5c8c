use async_trait::async_trait;
use routine_model::{Company, CompanyID, Employee, EmployeeID, Gender};

use crate::error::Result;
use crate::query::{OrderSpec, Page, PageRequest};

/// Company list predicate. Text values are already trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    /// Exact match on the company name.
    pub name: Option<String>,
    /// Case-insensitive substring of the name or introduction.
    pub search: Option<String>,
}

/// Employee list predicate, applied within one company.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub gender: Option<Gender>,
    /// Case-insensitive substring of the employee number, first name or
    /// last name.
    pub search: Option<String>,
}

/// Persistence port for companies and the employees they own.
///
/// List operations receive an already resolved [`OrderSpec`] whose fields
/// are storage column names, and a normalized [`PageRequest`].
#[async_trait]
pub trait CompanyRepository: Send + Sync + std::fmt::Debug {
    /// Count and fetch one page of companies matching `filter`.
    async fn list_companies(
        &self,
        filter: &CompanyFilter,
        order: &OrderSpec,
        page: PageRequest,
    ) -> Result<Page<Company>>;

    async fn get_company(&self, id: CompanyID) -> Result<Option<Company>>;

    /// Companies whose id is in `ids`, ordered by name. Unknown ids are
    /// skipped.
    async fn get_companies(&self, ids: &[CompanyID]) -> Result<Vec<Company>>;

    /// Store the companies together with their nested employees, all or
    /// nothing.
    async fn add_companies(&self, companies: &[Company]) -> Result<()>;

    async fn add_company(&self, company: &Company) -> Result<()> {
        self.add_companies(std::slice::from_ref(company)).await
    }

    async fn company_exists(&self, id: CompanyID) -> Result<bool>;

    async fn list_employees(
        &self,
        company_id: CompanyID,
        filter: &EmployeeFilter,
        order: &OrderSpec,
        page: PageRequest,
    ) -> Result<Page<Employee>>;

    async fn get_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<Option<Employee>>;

    /// Fails with `Conflict` when the id is already taken and `NotFound`
    /// when the owning company does not exist.
    async fn add_employee(&self, employee: &Employee) -> Result<()>;

    /// Fails with `NotFound` when no such employee exists in its company.
    async fn update_employee(&self, employee: &Employee) -> Result<()>;

    /// Fails with `NotFound` when no such employee exists in the company.
    async fn delete_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<()>;
}
