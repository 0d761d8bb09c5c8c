//! Query-string parameters for the list endpoints.

use routine_model::Gender;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutineError};

pub const DEFAULT_COMPANY_ORDER: &str = "companyName";
pub const DEFAULT_EMPLOYEE_ORDER: &str = "name";

fn default_page_number() -> i64 {
    1
}

fn default_company_order() -> String {
    DEFAULT_COMPANY_ORDER.to_string()
}

fn default_employee_order() -> String {
    DEFAULT_EMPLOYEE_ORDER.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyListParams {
    /// Exact company name.
    pub name: Option<String>,
    /// Substring of the name or introduction.
    #[serde(alias = "query")]
    pub q: Option<String>,
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default = "default_company_order")]
    pub order_by: String,
}

impl Default for CompanyListParams {
    fn default() -> Self {
        Self {
            name: None,
            q: None,
            page_number: default_page_number(),
            page_size: None,
            order_by: default_company_order(),
        }
    }
}

impl CompanyListParams {
    pub fn name_filter(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListParams {
    /// `male`, `female`, `1` or `2`.
    pub gender: Option<String>,
    /// Substring of the employee number, first name or last name.
    #[serde(alias = "query")]
    pub q: Option<String>,
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default = "default_employee_order")]
    pub order_by: String,
}

impl Default for EmployeeListParams {
    fn default() -> Self {
        Self {
            gender: None,
            q: None,
            page_number: default_page_number(),
            page_size: None,
            order_by: default_employee_order(),
        }
    }
}

impl EmployeeListParams {
    pub fn gender_filter(&self) -> Result<Option<Gender>> {
        non_blank(self.gender.as_deref())
            .map(|raw| {
                raw.parse::<Gender>().map_err(|_| {
                    RoutineError::InvalidInput(format!(
                        "unknown gender '{raw}'"
                    ))
                })
            })
            .transpose()
    }

    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let params: EmployeeListParams =
            serde_json::from_str(r#"{"q":"  "}"#).unwrap();
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, None);
        assert_eq!(params.order_by, "name");
        assert_eq!(params.search_term(), None);

        let params: CompanyListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, CompanyListParams::default());
        assert_eq!(params.order_by, "companyName");
    }

    #[test]
    fn query_alias_is_accepted() {
        let params: CompanyListParams =
            serde_json::from_str(r#"{"query":" Goo ","pageSize":7}"#).unwrap();
        assert_eq!(params.search_term(), Some("Goo"));
        assert_eq!(params.page_size, Some(7));
    }

    #[test]
    fn gender_filter_parses_names_and_numbers() {
        let mut params = EmployeeListParams {
            gender: Some("Female".into()),
            ..EmployeeListParams::default()
        };
        assert_eq!(params.gender_filter().unwrap(), Some(Gender::Female));

        params.gender = Some("1".into());
        assert_eq!(params.gender_filter().unwrap(), Some(Gender::Male));

        params.gender = Some("robot".into());
        assert!(matches!(
            params.gender_filter(),
            Err(RoutineError::InvalidInput(_))
        ));
    }
}
