//! View models exchanged with HTTP clients and their conversions.

use chrono::NaiveDate;
use routine_model::{Company, CompanyID, Employee, EmployeeID, Gender};
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationErrors};
use crate::query::Shape;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id: CompanyID,
    pub company_name: String,
}

impl Shape for CompanyDto {
    const SHAPE: &'static str = "CompanyDto";
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            company_name: company.name.clone(),
        }
    }
}

impl From<Company> for CompanyDto {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            company_name: company.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: EmployeeID,
    pub company_id: CompanyID,
    pub employee_no: String,
    pub name: String,
    pub gender: String,
    pub age: i32,
}

impl Shape for EmployeeDto {
    const SHAPE: &'static str = "EmployeeDto";
}

impl EmployeeDto {
    /// Builds the view with `age` measured against `current_year`.
    pub fn from_employee(employee: &Employee, current_year: i32) -> Self {
        Self {
            id: employee.id,
            company_id: employee.company_id,
            employee_no: employee.employee_no.clone(),
            name: employee.full_name(),
            gender: employee.gender.to_string(),
            age: employee.age_in(current_year),
        }
    }
}

/// Body of an employee create or replace request.
///
/// Absent fields decode to empty values and `gender` stays numeric, so a
/// missing or out-of-range value surfaces as a validation message rather
/// than a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInputDto {
    #[serde(default)]
    pub employee_no: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: i16,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

pub type EmployeeAddDto = EmployeeInputDto;
pub type EmployeeUpdateDto = EmployeeInputDto;

impl EmployeeInputDto {
    /// Lengths are measured on the trimmed values that would be stored.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let employee_no = self.employee_no.trim();
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();

        validation::required(&mut errors, "employeeNo", "Employee No.", employee_no);
        validation::max_length(
            &mut errors,
            "employeeNo",
            "Employee No.",
            employee_no,
            Employee::EMPLOYEE_NO_MAX_LEN,
        );
        validation::required(&mut errors, "firstName", "First Name", first_name);
        validation::max_length(
            &mut errors,
            "firstName",
            "First Name",
            first_name,
            Employee::NAME_PART_MAX_LEN,
        );
        validation::max_length(
            &mut errors,
            "lastName",
            "Last Name",
            last_name,
            Employee::NAME_PART_MAX_LEN,
        );

        let combined = first_name.chars().count() + last_name.chars().count();
        if combined > Employee::FULL_NAME_MAX_LEN {
            let message = format!(
                "Total length of name is larger than {}.",
                Employee::FULL_NAME_MAX_LEN
            );
            errors.add("firstName", message.clone());
            errors.add("lastName", message);
        }

        if Gender::try_from(self.gender).is_err() {
            errors.add("gender", "The field Gender must be between 1 and 2.");
        }

        match self.date_of_birth {
            Some(date_of_birth) => validation::birth_date(
                &mut errors,
                "dateOfBirth",
                date_of_birth,
                today,
            ),
            None => errors.add("dateOfBirth", "The Date of Birth field is required."),
        }

        errors.into_result()
    }

    /// Validates and converts into an entity with the given identity.
    pub fn into_employee(
        self,
        id: EmployeeID,
        company_id: CompanyID,
        today: NaiveDate,
    ) -> Result<Employee, ValidationErrors> {
        self.validate(today)?;
        let gender = Gender::try_from(self.gender).map_err(|_| {
            let mut errors = ValidationErrors::new();
            errors.add("gender", "The field Gender must be between 1 and 2.");
            errors
        })?;
        let date_of_birth = self.date_of_birth.ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add("dateOfBirth", "The Date of Birth field is required.");
            errors
        })?;

        Ok(Employee {
            id,
            company_id,
            employee_no: self.employee_no.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            gender,
            date_of_birth,
        })
    }

    /// Overwrites every mutable field of `employee`, keeping its identity.
    pub fn apply_to(
        self,
        employee: &mut Employee,
        today: NaiveDate,
    ) -> Result<(), ValidationErrors> {
        let updated = self.into_employee(employee.id, employee.company_id, today)?;
        *employee = updated;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAddDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub employees: Vec<EmployeeAddDto>,
}

impl CompanyAddDto {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        validation::required(&mut errors, "name", "Name", name);
        validation::max_length(
            &mut errors,
            "name",
            "Name",
            name,
            Company::NAME_MAX_LEN,
        );
        if let Some(introduction) = &self.introduction {
            validation::max_length(
                &mut errors,
                "introduction",
                "Introduction",
                introduction.trim(),
                Company::INTRODUCTION_MAX_LEN,
            );
        }

        for (index, employee) in self.employees.iter().enumerate() {
            if let Err(nested) = employee.validate(today) {
                errors.merge_prefixed(&format!("employees[{index}]"), nested);
            }
        }

        errors.into_result()
    }

    /// Validates and converts into a company with fresh identifiers for it
    /// and every nested employee.
    pub fn into_company(
        self,
        today: NaiveDate,
    ) -> Result<Company, ValidationErrors> {
        self.validate(today)?;

        let mut company = Company::new(
            self.name.trim(),
            self.introduction
                .map(|intro| intro.trim().to_string())
                .filter(|intro| !intro.is_empty()),
        );
        company.employees = self
            .employees
            .into_iter()
            .map(|dto| dto.into_employee(EmployeeID::new(), company.id, today))
            .collect::<Result<_, _>>()?;

        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn input() -> EmployeeInputDto {
        EmployeeInputDto {
            employee_no: "MSFT231".into(),
            first_name: "Nick".into(),
            last_name: "Carter".into(),
            gender: 1,
            date_of_birth: NaiveDate::from_ymd_opt(1976, 1, 2),
        }
    }

    #[test]
    fn employee_view_combines_name_and_computes_age() {
        let employee = input()
            .into_employee(EmployeeID::new(), CompanyID::new(), today())
            .unwrap();
        let dto = EmployeeDto::from_employee(&employee, 2024);
        assert_eq!(dto.name, "Nick Carter");
        assert_eq!(dto.gender, "Male");
        assert_eq!(dto.age, 48);
        assert_eq!(dto.employee_no, "MSFT231");
    }

    #[test]
    fn age_ignores_birthday_within_year() {
        let mut dto = input();
        dto.date_of_birth = NaiveDate::from_ymd_opt(1990, 12, 31);
        let employee = dto
            .into_employee(EmployeeID::new(), CompanyID::new(), today())
            .unwrap();
        assert_eq!(EmployeeDto::from_employee(&employee, 2024).age, 34);
    }

    #[test]
    fn employee_view_serializes_camel_case() {
        let employee = input()
            .into_employee(EmployeeID::new(), CompanyID::new(), today())
            .unwrap();
        let json =
            serde_json::to_value(EmployeeDto::from_employee(&employee, 2024))
                .unwrap();
        assert!(json.get("employeeNo").is_some());
        assert!(json.get("companyId").is_some());
    }

    #[test]
    fn reports_every_violation() {
        let dto = EmployeeInputDto {
            employee_no: "  ".into(),
            first_name: "x".repeat(51),
            last_name: "y".repeat(40),
            gender: 3,
            date_of_birth: NaiveDate::from_ymd_opt(1700, 1, 1),
        };
        let errors = dto.validate(today()).unwrap_err();
        assert!(errors.field("employeeNo").is_some());
        assert_eq!(errors.field("firstName").unwrap().len(), 2);
        assert!(errors.field("lastName").is_some());
        assert!(errors.field("gender").is_some());
        assert!(errors.field("dateOfBirth").is_some());
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let mut dto = input();
        dto.date_of_birth = NaiveDate::from_ymd_opt(2024, 3, 2);
        let errors = dto.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn apply_to_keeps_identity() {
        let mut employee = input()
            .into_employee(EmployeeID::new(), CompanyID::new(), today())
            .unwrap();
        let (id, company) = (employee.id, employee.company_id);

        let mut update = input();
        update.first_name = "Vince".into();
        update.gender = 2;
        update.apply_to(&mut employee, today()).unwrap();

        assert_eq!(employee.id, id);
        assert_eq!(employee.company_id, company);
        assert_eq!(employee.first_name, "Vince");
        assert_eq!(employee.gender, Gender::Female);
    }

    #[test]
    fn company_conversion_assigns_fresh_ids_to_nested_employees() {
        let dto = CompanyAddDto {
            name: " Initech ".into(),
            introduction: Some("  ".into()),
            employees: vec![input(), input()],
        };
        let company = dto.into_company(today()).unwrap();
        assert_eq!(company.name, "Initech");
        assert_eq!(company.introduction, None);
        assert_eq!(company.employees.len(), 2);
        assert_ne!(company.employees[0].id, company.employees[1].id);
        assert!(company.employees.iter().all(|e| e.company_id == company.id));
    }

    #[test]
    fn nested_employee_errors_are_prefixed() {
        let mut bad = input();
        bad.employee_no = String::new();
        let dto = CompanyAddDto {
            name: "n".repeat(101),
            introduction: None,
            employees: vec![input(), bad],
        };
        let errors = dto.validate(today()).unwrap_err();
        assert!(errors.field("name").is_some());
        assert!(errors.field("employees[1].employeeNo").is_some());
        assert!(errors.field("employees[0].employeeNo").is_none());
    }

    #[test]
    fn lengths_are_measured_after_trimming() {
        let mut dto = input();
        dto.employee_no = " ABCDEFGHIJ ".into();
        dto.first_name = format!("  {}", "f".repeat(40));
        dto.last_name = format!("{}  ", "l".repeat(40));
        assert_eq!(dto.validate(today()), Ok(()));

        let company = CompanyAddDto {
            name: format!(" {} ", "n".repeat(100)),
            introduction: None,
            employees: Vec::new(),
        };
        assert_eq!(company.validate(today()), Ok(()));
    }

    #[test]
    fn absent_fields_decode_and_fail_validation() {
        let dto: CompanyAddDto =
            serde_json::from_str(r#"{"introduction":"x","employees":[{}]}"#)
                .unwrap();
        let errors = dto.validate(today()).unwrap_err();
        assert_eq!(
            errors.field("name").unwrap(),
            ["The Name field is required."]
        );
        assert!(errors.field("employees[0].employeeNo").is_some());
        assert!(errors.field("employees[0].gender").is_some());
        assert_eq!(
            errors.field("employees[0].dateOfBirth").unwrap(),
            ["The Date of Birth field is required."]
        );
    }

    #[test]
    fn company_view_renames_name() {
        let company = Company::new("Google", Some("Don't be evil".into()));
        let json = serde_json::to_value(CompanyDto::from(&company)).unwrap();
        assert_eq!(json["companyName"], "Google");
        assert!(json.get("introduction").is_none());
    }
}
