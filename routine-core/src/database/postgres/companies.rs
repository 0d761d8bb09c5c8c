use async_trait::async_trait;
use routine_model::{Company, CompanyID, Employee, EmployeeID, Gender};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;
use uuid::Uuid;

use super::order::SqlOrderBy;
use crate::database::ports::{CompanyFilter, CompanyRepository, EmployeeFilter};
use crate::error::{Result, RoutineError};
use crate::query::{OrderSpec, Page, PageRequest, PagedSource, fetch_page};

const COMPANY_COLUMNS: &str = "id, name, introduction";
const EMPLOYEE_COLUMNS: &str =
    "id, company_id, employee_no, first_name, last_name, gender, date_of_birth";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone, Debug)]
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `ILIKE` pattern matching `term` literally anywhere in the value.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn limit_offset(qb: &mut QueryBuilder<'_, Postgres>, offset: u64, limit: u64) {
    qb.push(" LIMIT ");
    qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
}

fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}

fn company_from_row(row: &PgRow) -> std::result::Result<Company, sqlx::Error> {
    Ok(Company {
        id: CompanyID(row.try_get("id")?),
        name: row.try_get("name")?,
        introduction: row.try_get("introduction")?,
        employees: Vec::new(),
    })
}

fn employee_from_row(row: &PgRow) -> std::result::Result<Employee, sqlx::Error> {
    let gender: i16 = row.try_get("gender")?;
    Ok(Employee {
        id: EmployeeID(row.try_get("id")?),
        company_id: CompanyID(row.try_get("company_id")?),
        employee_no: row.try_get("employee_no")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        gender: Gender::try_from(gender).map_err(|err| sqlx::Error::ColumnDecode {
            index: "gender".into(),
            source: Box::new(err),
        })?,
        date_of_birth: row.try_get("date_of_birth")?,
    })
}

fn violation_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

/// Maps constraint violations on insert to domain errors.
fn insert_error(err: sqlx::Error, employee: &Employee) -> RoutineError {
    match violation_code(&err).as_deref() {
        Some(UNIQUE_VIOLATION) => RoutineError::Conflict(format!(
            "employee {} already exists",
            employee.id
        )),
        Some(FOREIGN_KEY_VIOLATION) => {
            RoutineError::company_not_found(employee.company_id)
        }
        _ => RoutineError::Database(err),
    }
}

/// Companies matching a filter. Count and fetch share `push_filters`, so
/// both see the same predicate.
struct CompanySource<'a> {
    pool: &'a PgPool,
    filter: &'a CompanyFilter,
    order: &'a OrderSpec,
}

impl CompanySource<'_> {
    fn push_filters(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");
        if let Some(name) = &self.filter.name {
            qb.push(" AND name = ");
            qb.push_bind(name.clone());
        }
        if let Some(term) = &self.filter.search {
            let pattern = contains_pattern(term);
            qb.push(" AND (name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR introduction ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }
}

#[async_trait]
impl PagedSource for CompanySource<'_> {
    type Item = Company;
    type Error = sqlx::Error;

    async fn count(&self) -> std::result::Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM companies");
        self.push_filters(&mut qb);
        let total: i64 = qb.build_query_scalar().fetch_one(self.pool).await?;
        Ok(to_count(total))
    }

    async fn fetch(
        &self,
        offset: u64,
        limit: u64,
    ) -> std::result::Result<Vec<Company>, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(COMPANY_COLUMNS);
        qb.push(" FROM companies");
        self.push_filters(&mut qb);
        self.order.apply_to(&mut SqlOrderBy::new(&mut qb));
        limit_offset(&mut qb, offset, limit);

        let rows = qb.build().fetch_all(self.pool).await?;
        rows.iter().map(company_from_row).collect()
    }
}

struct EmployeeSource<'a> {
    pool: &'a PgPool,
    company_id: CompanyID,
    filter: &'a EmployeeFilter,
    order: &'a OrderSpec,
}

impl EmployeeSource<'_> {
    fn push_filters(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE company_id = ");
        qb.push_bind(self.company_id.to_uuid());
        if let Some(gender) = self.filter.gender {
            qb.push(" AND gender = ");
            qb.push_bind(gender.as_i16());
        }
        if let Some(term) = &self.filter.search {
            let pattern = contains_pattern(term);
            qb.push(" AND (employee_no ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR first_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR last_name ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }
}

#[async_trait]
impl PagedSource for EmployeeSource<'_> {
    type Item = Employee;
    type Error = sqlx::Error;

    async fn count(&self) -> std::result::Result<u64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM employees");
        self.push_filters(&mut qb);
        let total: i64 = qb.build_query_scalar().fetch_one(self.pool).await?;
        Ok(to_count(total))
    }

    async fn fetch(
        &self,
        offset: u64,
        limit: u64,
    ) -> std::result::Result<Vec<Employee>, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(EMPLOYEE_COLUMNS);
        qb.push(" FROM employees");
        self.push_filters(&mut qb);
        self.order.apply_to(&mut SqlOrderBy::new(&mut qb));
        limit_offset(&mut qb, offset, limit);

        let rows = qb.build().fetch_all(self.pool).await?;
        rows.iter().map(employee_from_row).collect()
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn list_companies(
        &self,
        filter: &CompanyFilter,
        order: &OrderSpec,
        page: PageRequest,
    ) -> Result<Page<Company>> {
        let source = CompanySource {
            pool: self.pool(),
            filter,
            order,
        };
        Ok(fetch_page(&source, page).await?)
    }

    async fn get_company(&self, id: CompanyID) -> Result<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(company_from_row).transpose()?)
    }

    async fn get_companies(&self, ids: &[CompanyID]) -> Result<Vec<Company>> {
        let ids: Vec<Uuid> = ids.iter().map(CompanyID::to_uuid).collect();
        let rows = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ANY($1) ORDER BY name, id"
        ))
        .bind(ids)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .iter()
            .map(company_from_row)
            .collect::<std::result::Result<_, _>>()?)
    }

    async fn add_companies(&self, companies: &[Company]) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        for company in companies {
            sqlx::query(
                "INSERT INTO companies (id, name, introduction) VALUES ($1, $2, $3)",
            )
            .bind(company.id.to_uuid())
            .bind(&company.name)
            .bind(company.introduction.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|err| match violation_code(&err).as_deref() {
                Some(UNIQUE_VIOLATION) => RoutineError::Conflict(format!(
                    "company {} already exists",
                    company.id
                )),
                _ => RoutineError::Database(err),
            })?;

            for employee in &company.employees {
                insert_employee(&mut *tx, employee)
                    .await
                    .map_err(|err| insert_error(err, employee))?;
            }

            debug!(
                company = %company.id,
                employees = company.employees.len(),
                "inserted company"
            );
        }

        tx.commit().await?;
        Ok(())
    }

    async fn company_exists(&self, id: CompanyID) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1)")
                .bind(id.to_uuid())
                .fetch_one(self.pool())
                .await?;
        Ok(exists)
    }

    async fn list_employees(
        &self,
        company_id: CompanyID,
        filter: &EmployeeFilter,
        order: &OrderSpec,
        page: PageRequest,
    ) -> Result<Page<Employee>> {
        let source = EmployeeSource {
            pool: self.pool(),
            company_id,
            filter,
            order,
        };
        Ok(fetch_page(&source, page).await?)
    }

    async fn get_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id.to_uuid())
        .bind(employee_id.to_uuid())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(employee_from_row).transpose()?)
    }

    async fn add_employee(&self, employee: &Employee) -> Result<()> {
        let mut conn = self.pool().acquire().await?;
        insert_employee(&mut *conn, employee)
            .await
            .map_err(|err| insert_error(err, employee))
    }

    async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let result = sqlx::query(
            "UPDATE employees \
             SET employee_no = $3, first_name = $4, last_name = $5, gender = $6, date_of_birth = $7 \
             WHERE id = $1 AND company_id = $2",
        )
        .bind(employee.id.to_uuid())
        .bind(employee.company_id.to_uuid())
        .bind(&employee.employee_no)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.gender.as_i16())
        .bind(employee.date_of_birth)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RoutineError::employee_not_found(employee.id));
        }
        Ok(())
    }

    async fn delete_employee(
        &self,
        company_id: CompanyID,
        employee_id: EmployeeID,
    ) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM employees WHERE id = $1 AND company_id = $2")
                .bind(employee_id.to_uuid())
                .bind(company_id.to_uuid())
                .execute(self.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(RoutineError::employee_not_found(employee_id));
        }
        Ok(())
    }
}

async fn insert_employee(
    conn: &mut sqlx::PgConnection,
    employee: &Employee,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO employees \
         (id, company_id, employee_no, first_name, last_name, gender, date_of_birth) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(employee.id.to_uuid())
    .bind(employee.company_id.to_uuid())
    .bind(&employee.employee_no)
    .bind(&employee.first_name)
    .bind(&employee.last_name)
    .bind(employee.gender.as_i16())
    .bind(employee.date_of_birth)
    .execute(conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("car"), "%car%");
        assert_eq!(contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }
}
