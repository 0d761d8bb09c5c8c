//! Use cases behind the HTTP handlers.
//!
//! Every list call runs parse, resolve and paginate against the shared
//! registry; the identifier is always appended as the final sort key so
//! pages are stable.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use routine_model::{Company, CompanyID, Employee, EmployeeID};
use tracing::{debug, info};

use crate::api::{
    CompanyAddDto, CompanyDto, CompanyListParams, EmployeeAddDto, EmployeeDto,
    EmployeeListParams, EmployeeUpdateDto, ValidationErrors,
};
use crate::database::{CompanyFilter, CompanyRepository, EmployeeFilter};
use crate::error::{Result, RoutineError};
use crate::query::{
    ID_COLUMN, MappingRegistry, OrderSpec, Page, Paginator, Shape, SortOrder,
    StorageShape,
};

/// Result of a PUT on an employee resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(EmployeeDto),
    Updated,
}

#[derive(Clone)]
pub struct CompanyService {
    repository: Arc<dyn CompanyRepository>,
    registry: Arc<MappingRegistry>,
    paginator: Paginator,
}

impl fmt::Debug for CompanyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanyService")
            .field("repository", &self.repository)
            .field("registered_pairs", &self.registry.len())
            .field("max_page_size", &self.paginator.max_page_size())
            .finish()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl CompanyService {
    pub fn new(
        repository: Arc<dyn CompanyRepository>,
        registry: Arc<MappingRegistry>,
        paginator: Paginator,
    ) -> Self {
        Self {
            repository,
            registry,
            paginator,
        }
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    fn order_for<E: Shape, S: StorageShape>(
        &self,
        expression: &str,
    ) -> Result<OrderSpec> {
        let table = self.registry.resolve::<E, S>()?;
        let spec = OrderSpec::from_expression(expression, &table)?
            .then_by(ID_COLUMN, SortOrder::Ascending);
        debug!(expression, keys = spec.len(), "resolved sort expression");
        Ok(spec)
    }

    async fn ensure_company(&self, company_id: CompanyID) -> Result<()> {
        if self.repository.company_exists(company_id).await? {
            Ok(())
        } else {
            Err(RoutineError::company_not_found(company_id))
        }
    }

    pub async fn list_companies(
        &self,
        params: &CompanyListParams,
    ) -> Result<Page<CompanyDto>> {
        let order = self.order_for::<CompanyDto, Company>(&params.order_by)?;
        let filter = CompanyFilter {
            name: params.name_filter().map(str::to_string),
            search: params.search_term().map(str::to_string),
        };
        let request = self
            .paginator
            .request_or_default(params.page_number, params.page_size);

        let page = self
            .repository
            .list_companies(&filter, &order, request)
            .await?;
        Ok(page.map(CompanyDto::from))
    }

    pub async fn get_company(&self, id: CompanyID) -> Result<CompanyDto> {
        self.repository
            .get_company(id)
            .await?
            .map(CompanyDto::from)
            .ok_or_else(|| RoutineError::company_not_found(id))
    }

    /// Companies for every id in `ids`; duplicates collapse and any unknown
    /// id makes the whole lookup fail.
    pub async fn get_companies(
        &self,
        ids: &[CompanyID],
    ) -> Result<Vec<CompanyDto>> {
        let mut seen = HashSet::new();
        let unique: Vec<CompanyID> =
            ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let found = self.repository.get_companies(&unique).await?;
        if found.len() != unique.len() {
            let missing = unique
                .iter()
                .find(|id| !found.iter().any(|c| c.id == **id))
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(RoutineError::company_not_found(missing));
        }
        Ok(found.into_iter().map(CompanyDto::from).collect())
    }

    pub async fn create_company(&self, dto: CompanyAddDto) -> Result<CompanyDto> {
        let company = dto.into_company(today())?;
        self.repository.add_company(&company).await?;
        info!(
            company = %company.id,
            employees = company.employees.len(),
            "created company"
        );
        Ok(CompanyDto::from(company))
    }

    /// Creates every company or none. Validation messages are keyed by the
    /// position of the offending company, e.g. `[1].name`.
    pub async fn create_companies(
        &self,
        dtos: Vec<CompanyAddDto>,
    ) -> Result<Vec<CompanyDto>> {
        let today = today();
        let mut errors = ValidationErrors::new();
        let mut companies = Vec::with_capacity(dtos.len());

        for (index, dto) in dtos.into_iter().enumerate() {
            match dto.into_company(today) {
                Ok(company) => companies.push(company),
                Err(nested) => errors.merge_prefixed(&format!("[{index}]"), nested),
            }
        }
        errors.into_result()?;

        self.repository.add_companies(&companies).await?;
        info!(count = companies.len(), "created companies");
        Ok(companies.into_iter().map(CompanyDto::from).collect())
    }

    pub async fn list_employees(
        &self,
        company_id: CompanyID,
        params: &EmployeeListParams,
    ) -> Result<Page<EmployeeDto>> {
        let order = self.order_for::<EmployeeDto, Employee>(&params.order_by)?;
        let filter = EmployeeFilter {
            gender: params.gender_filter()?,
            search: params.search_term().map(str::to_string),
        };
        self.ensure_company(company_id).await?;

        let request = self
            .paginator
            .request_or_default(params.page_number, params.page_size);
        let year = today().year();
        let page = self
            .repository
            .list_employees(company_id, &filter, &order, request)
            .await?;
        Ok(page.map(|employee| EmployeeDto::from_employee(&employee, year)))
    }

    pub async fn get_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<EmployeeDto> {
        self.ensure_company(company_id).await?;
        let employee = self
            .repository
            .get_employee(company_id, employee_id)
            .await?
            .ok_or_else(|| RoutineError::employee_not_found(employee_id))?;
        Ok(EmployeeDto::from_employee(&employee, today().year()))
    }

    pub async fn create_employee(
        &self,
        company_id: CompanyID,
        dto: EmployeeAddDto,
    ) -> Result<EmployeeDto> {
        let today = today();
        let employee = dto.into_employee(EmployeeID::new(), company_id, today)?;
        self.ensure_company(company_id).await?;

        self.repository.add_employee(&employee).await?;
        info!(company = %company_id, employee = %employee.id, "created employee");
        Ok(EmployeeDto::from_employee(&employee, today.year()))
    }

    /// Replaces the employee, or creates it under the client-chosen id when
    /// the company has no such employee yet.
    pub async fn upsert_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
        dto: EmployeeUpdateDto,
    ) -> Result<UpsertOutcome> {
        let today = today();
        dto.validate(today)?;
        self.ensure_company(company_id).await?;

        match self.repository.get_employee(company_id, employee_id).await? {
            Some(mut existing) => {
                dto.apply_to(&mut existing, today)?;
                self.repository.update_employee(&existing).await?;
                info!(company = %company_id, employee = %employee_id, "updated employee");
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let employee = dto.into_employee(employee_id, company_id, today)?;
                self.repository.add_employee(&employee).await?;
                info!(
                    company = %company_id,
                    employee = %employee_id,
                    "created employee through upsert"
                );
                Ok(UpsertOutcome::Created(EmployeeDto::from_employee(
                    &employee,
                    today.year(),
                )))
            }
        }
    }

    pub async fn delete_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<()> {
        self.ensure_company(company_id).await?;
        self.repository
            .delete_employee(company_id, employee_id)
            .await?;
        info!(company = %company_id, employee = %employee_id, "deleted employee");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::database::InMemoryCompanyRepository;
    use crate::database::seed;
    use crate::query::{MappingError, ShapePair, SortError, default_registry};

    fn service() -> CompanyService {
        CompanyService::new(
            Arc::new(InMemoryCompanyRepository::seeded()),
            Arc::new(default_registry().unwrap()),
            Paginator::default(),
        )
    }

    fn input(employee_no: &str) -> EmployeeAddDto {
        EmployeeAddDto {
            employee_no: employee_no.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            gender: 2,
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10),
        }
    }

    #[tokio::test]
    async fn default_company_listing_orders_by_name() {
        let page = service()
            .list_companies(&CompanyListParams::default())
            .await
            .unwrap();
        let names: Vec<_> =
            page.items.iter().map(|c| c.company_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Alibaba", "Google", "Google1", "Google2", "Google3"]
        );
        assert_eq!(page.total_count, 7);
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn unknown_sort_field_is_reported_verbatim() {
        let params = CompanyListParams {
            order_by: "salary desc".into(),
            ..CompanyListParams::default()
        };
        let err = service().list_companies(&params).await.unwrap_err();
        match err {
            RoutineError::Sort(SortError::UnknownField { field }) => {
                assert_eq!(field, "salary")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_page_is_clamped() {
        let params = CompanyListParams {
            page_size: Some(500),
            ..CompanyListParams::default()
        };
        let page = service().list_companies(&params).await.unwrap();
        assert_eq!(page.page_size, 20);
        assert_eq!(page.items.len(), 7);
    }

    #[tokio::test]
    async fn employees_of_unknown_company_are_not_found() {
        let err = service()
            .list_employees(CompanyID::new(), &EmployeeListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RoutineError::NotFound(_)));
    }

    #[tokio::test]
    async fn bad_gender_filter_is_invalid_input() {
        let params = EmployeeListParams {
            gender: Some("other".into()),
            ..EmployeeListParams::default()
        };
        let err = service()
            .list_employees(seed::MICROSOFT, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, RoutineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn get_companies_requires_every_id() {
        let service = service();
        let found = service
            .get_companies(&[seed::GOOGLE, seed::GOOGLE, seed::ALIBABA])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let err = service
            .get_companies(&[seed::GOOGLE, CompanyID::new()])
            .await
            .unwrap_err();
        assert!(matches!(err, RoutineError::NotFound(_)));
    }

    #[tokio::test]
    async fn bulk_create_reports_errors_by_position() {
        let dtos = vec![
            CompanyAddDto {
                name: "Initech".into(),
                introduction: None,
                employees: Vec::new(),
            },
            CompanyAddDto {
                name: String::new(),
                introduction: None,
                employees: vec![input("")],
            },
        ];
        let err = service().create_companies(dtos).await.unwrap_err();
        let RoutineError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert!(errors.field("[1].name").is_some());
        assert!(errors.field("[1].employees[0].employeeNo").is_some());
        assert!(errors.field("[0].name").is_none());
    }

    #[tokio::test]
    async fn upsert_creates_then_updates() {
        let service = service();
        let id = EmployeeID::new();

        let outcome = service
            .upsert_employee(seed::GOOGLE, id, input("G500"))
            .await
            .unwrap();
        let UpsertOutcome::Created(created) = outcome else {
            panic!("expected a created employee");
        };
        assert_eq!(created.id, id);
        assert_eq!(created.name, "Ada Lovelace");

        let outcome = service
            .upsert_employee(seed::GOOGLE, id, input("G501"))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        let stored = service.get_employee(seed::GOOGLE, id).await.unwrap();
        assert_eq!(stored.employee_no, "G501");
    }

    #[tokio::test]
    async fn upsert_with_id_owned_elsewhere_conflicts() {
        let service = service();
        let created = service
            .create_employee(seed::GOOGLE, input("G600"))
            .await
            .unwrap();
        let err = service
            .upsert_employee(seed::MICROSOFT, created.id, input("M600"))
            .await
            .unwrap_err();
        assert!(matches!(err, RoutineError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_removes_employee() {
        let service = service();
        let created = service
            .create_employee(seed::ALIBABA, input("A700"))
            .await
            .unwrap();
        service
            .delete_employee(seed::ALIBABA, created.id)
            .await
            .unwrap();
        let err = service
            .get_employee(seed::ALIBABA, created.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RoutineError::NotFound(_)));
    }

    #[tokio::test]
    async fn unregistered_mapping_pair_fails_listing() {
        let service = CompanyService::new(
            Arc::new(InMemoryCompanyRepository::seeded()),
            Arc::new(MappingRegistry::new()),
            Paginator::default(),
        );
        let err = service
            .list_companies(&CompanyListParams::default())
            .await
            .unwrap_err();
        match err {
            RoutineError::Mapping(MappingError::NotFound { pair }) => {
                assert_eq!(pair, ShapePair::of::<CompanyDto, Company>());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = service
            .list_employees(seed::MICROSOFT, &EmployeeListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RoutineError::Mapping(MappingError::NotFound { .. })
        ));
    }
}
