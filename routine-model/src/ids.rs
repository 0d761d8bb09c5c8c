use crate::error::ModelError;
use std::str::FromStr;
use uuid::Uuid;

/// Strongly typed ID for companies
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CompanyID(pub Uuid);

impl Default for CompanyID {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyID {
    pub fn new() -> Self {
        CompanyID(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl AsRef<Uuid> for CompanyID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CompanyID {
    fn from(value: Uuid) -> Self {
        CompanyID(value)
    }
}

impl FromStr for CompanyID {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(CompanyID)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl std::fmt::Display for CompanyID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for employees
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EmployeeID(pub Uuid);

impl Default for EmployeeID {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeID {
    pub fn new() -> Self {
        EmployeeID(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl AsRef<Uuid> for EmployeeID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for EmployeeID {
    fn from(value: Uuid) -> Self {
        EmployeeID(value)
    }
}

impl FromStr for EmployeeID {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(EmployeeID)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl std::fmt::Display for EmployeeID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
