use std::sync::Arc;

use async_trait::async_trait;
use routine_model::{Company, CompanyID, Employee, EmployeeID};
use tokio::sync::RwLock;
use tracing::debug;

use super::ports::{CompanyFilter, CompanyRepository, EmployeeFilter};
use super::seed;
use crate::error::{Result, RoutineError};
use crate::query::{
    MemoryOrdering, MemorySource, OrderSpec, Page, PageRequest, fetch_page,
};

#[derive(Debug, Default)]
struct MemoryState {
    /// Stored without their employees; those live in `employees`.
    companies: Vec<Company>,
    employees: Vec<Employee>,
}

/// Process-local repository used by tests and database-less dev runs.
///
/// Text filters fold ASCII case only, matching `ILIKE` under `COLLATE "C"`;
/// ordering compares bytes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCompanyRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the reference companies and employees.
    pub fn seeded() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                companies: seed::companies(),
                employees: seed::employees(),
            })),
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

fn company_matches(company: &Company, filter: &CompanyFilter) -> bool {
    if let Some(name) = &filter.name
        && company.name != *name
    {
        return false;
    }
    match &filter.search {
        Some(term) => {
            let term = term.to_ascii_lowercase();
            contains_folded(&company.name, &term)
                || company
                    .introduction
                    .as_deref()
                    .is_some_and(|intro| contains_folded(intro, &term))
        }
        None => true,
    }
}

fn employee_matches(employee: &Employee, filter: &EmployeeFilter) -> bool {
    if let Some(gender) = filter.gender
        && employee.gender != gender
    {
        return false;
    }
    match &filter.search {
        Some(term) => {
            let term = term.to_ascii_lowercase();
            contains_folded(&employee.employee_no, &term)
                || contains_folded(&employee.first_name, &term)
                || contains_folded(&employee.last_name, &term)
        }
        None => true,
    }
}

async fn ordered_page<T>(
    mut items: Vec<T>,
    order: &OrderSpec,
    request: PageRequest,
) -> Page<T>
where
    T: crate::query::SortableRecord + Clone + Send + Sync,
{
    MemoryOrdering::from_spec(order).sort(&mut items);
    fetch_page(&MemorySource::new(&items), request)
        .await
        .unwrap_or_else(|never| match never {})
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn list_companies(
        &self,
        filter: &CompanyFilter,
        order: &OrderSpec,
        page: PageRequest,
    ) -> Result<Page<Company>> {
        let matching: Vec<Company> = {
            let state = self.state.read().await;
            state
                .companies
                .iter()
                .filter(|company| company_matches(company, filter))
                .cloned()
                .collect()
        };
        Ok(ordered_page(matching, order, page).await)
    }

    async fn get_company(&self, id: CompanyID) -> Result<Option<Company>> {
        let state = self.state.read().await;
        Ok(state.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn get_companies(&self, ids: &[CompanyID]) -> Result<Vec<Company>> {
        let state = self.state.read().await;
        let mut found: Vec<Company> = state
            .companies
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn add_companies(&self, companies: &[Company]) -> Result<()> {
        let mut state = self.state.write().await;

        for company in companies {
            if state.companies.iter().any(|c| c.id == company.id) {
                return Err(RoutineError::Conflict(format!(
                    "company {} already exists",
                    company.id
                )));
            }
        }

        for company in companies {
            let mut stored = company.clone();
            let employees = std::mem::take(&mut stored.employees);
            debug!(
                company = %stored.id,
                employees = employees.len(),
                "storing company"
            );
            state.companies.push(stored);
            state.employees.extend(employees);
        }
        Ok(())
    }

    async fn company_exists(&self, id: CompanyID) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.companies.iter().any(|c| c.id == id))
    }

    async fn list_employees(
        &self,
        company_id: CompanyID,
        filter: &EmployeeFilter,
        order: &OrderSpec,
        page: PageRequest,
    ) -> Result<Page<Employee>> {
        let matching: Vec<Employee> = {
            let state = self.state.read().await;
            state
                .employees
                .iter()
                .filter(|e| e.company_id == company_id)
                .filter(|e| employee_matches(e, filter))
                .cloned()
                .collect()
        };
        Ok(ordered_page(matching, order, page).await)
    }

    async fn get_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state
            .employees
            .iter()
            .find(|e| e.company_id == company_id && e.id == employee_id)
            .cloned())
    }

    async fn add_employee(&self, employee: &Employee) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.companies.iter().any(|c| c.id == employee.company_id) {
            return Err(RoutineError::company_not_found(employee.company_id));
        }
        if state.employees.iter().any(|e| e.id == employee.id) {
            return Err(RoutineError::Conflict(format!(
                "employee {} already exists",
                employee.id
            )));
        }
        state.employees.push(employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let mut state = self.state.write().await;
        let slot = state
            .employees
            .iter_mut()
            .find(|e| e.id == employee.id && e.company_id == employee.company_id)
            .ok_or_else(|| RoutineError::employee_not_found(employee.id))?;
        *slot = employee.clone();
        Ok(())
    }

    async fn delete_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.employees.len();
        state
            .employees
            .retain(|e| !(e.id == employee_id && e.company_id == company_id));
        if state.employees.len() == before {
            return Err(RoutineError::employee_not_found(employee_id));
        }
        Ok(())
    }
}
