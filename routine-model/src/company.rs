use crate::employee::Employee;
use crate::ids::CompanyID;

/// A company as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Company {
    pub id: CompanyID,
    pub name: String,
    pub introduction: Option<String>,
    /// Only populated when a company is created together with its staff.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub employees: Vec<Employee>,
}

impl Company {
    pub const NAME_MAX_LEN: usize = 100;
    pub const INTRODUCTION_MAX_LEN: usize = 500;

    pub fn new(name: impl Into<String>, introduction: Option<String>) -> Self {
        Self {
            id: CompanyID::new(),
            name: name.into(),
            introduction,
            employees: Vec::new(),
        }
    }
}
