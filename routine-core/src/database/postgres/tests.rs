use chrono::NaiveDate;
use routine_model::{Company, CompanyID, Employee, EmployeeID, Gender};
use sqlx::PgPool;

use super::PostgresCompanyRepository;
use crate::database::ports::{CompanyFilter, CompanyRepository, EmployeeFilter};
use crate::database::seed;
use crate::error::RoutineError;
use crate::query::mappings::{company_table, employee_table};
use crate::query::{ID_COLUMN, OrderSpec, Paginator, SortOrder};

fn company_order(expression: &str) -> OrderSpec {
    OrderSpec::from_expression(expression, &company_table().unwrap())
        .unwrap()
        .then_by(ID_COLUMN, SortOrder::Ascending)
}

fn employee_order(expression: &str) -> OrderSpec {
    OrderSpec::from_expression(expression, &employee_table().unwrap())
        .unwrap()
        .then_by(ID_COLUMN, SortOrder::Ascending)
}

fn hire(company_id: CompanyID, employee_no: &str) -> Employee {
    Employee {
        id: EmployeeID::new(),
        company_id,
        employee_no: employee_no.into(),
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        gender: Gender::Female,
        date_of_birth: NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
    }
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn pages_seeded_companies_by_name(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let page = repo
        .list_companies(
            &CompanyFilter::default(),
            &company_order("companyName"),
            Paginator::default().request(2, 3),
        )
        .await
        .unwrap();

    let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Google2", "Google3", "Google4"]);
    assert_eq!(page.total_count, 7);
    assert_eq!(page.total_pages, 3);
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn search_escapes_like_wildcards(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let spec = company_order("");
    let request = Paginator::default().request(1, 20);

    let filter = CompanyFilter {
        name: None,
        search: Some("EVIL".into()),
    };
    let page = repo.list_companies(&filter, &spec, request).await.unwrap();
    assert_eq!(page.total_count, 5);

    let filter = CompanyFilter {
        name: None,
        search: Some("%".into()),
    };
    let page = repo.list_companies(&filter, &spec, request).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn employees_order_by_age_and_gender_filter(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let page = repo
        .list_employees(
            seed::ALIBABA,
            &EmployeeFilter::default(),
            &employee_order("age desc"),
            Paginator::default().request(1, 5),
        )
        .await
        .unwrap();
    let numbers: Vec<_> =
        page.items.iter().map(|e| e.employee_no.as_str()).collect();
    assert_eq!(numbers, vec!["A404", "A009"]);

    let filter = EmployeeFilter {
        gender: Some(Gender::Female),
        search: None,
    };
    let page = repo
        .list_employees(
            seed::ALIBABA,
            &filter,
            &employee_order(""),
            Paginator::default().request(1, 5),
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].first_name, "卡");
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn add_companies_rolls_back_on_conflict(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let mut fresh = Company::new("Initech", None);
    fresh.employees.push(hire(fresh.id, "I001"));
    let duplicate = Company {
        id: seed::GOOGLE,
        name: "Google".into(),
        introduction: None,
        employees: Vec::new(),
    };

    let result = repo.add_companies(&[fresh.clone(), duplicate]).await;
    assert!(matches!(result, Err(RoutineError::Conflict(_))));
    assert!(!repo.company_exists(fresh.id).await.unwrap());
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn employee_lifecycle(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let mut employee = hire(seed::GOOGLE, "G200");

    repo.add_employee(&employee).await.unwrap();
    assert!(matches!(
        repo.add_employee(&employee).await,
        Err(RoutineError::Conflict(_))
    ));

    employee.last_name = "Murray Hopper".into();
    repo.update_employee(&employee).await.unwrap();
    let stored = repo
        .get_employee(seed::GOOGLE, employee.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, employee);

    repo.delete_employee(seed::GOOGLE, employee.id).await.unwrap();
    assert!(matches!(
        repo.update_employee(&employee).await,
        Err(RoutineError::NotFound(_))
    ));
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn employee_for_missing_company_is_not_found(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let result = repo.add_employee(&hire(CompanyID::new(), "X1")).await;
    assert!(matches!(result, Err(RoutineError::NotFound(_))));
}

#[sqlx::test(migrator = "crate::MIGRATOR")]
async fn get_companies_orders_by_name(pool: PgPool) {
    let repo = PostgresCompanyRepository::new(pool);
    let found = repo
        .get_companies(&[seed::MICROSOFT, seed::ALIBABA, CompanyID::new()])
        .await
        .unwrap();
    let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alibaba", "Microsoft"]);
}
