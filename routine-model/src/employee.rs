use chrono::NaiveDate;

use crate::gender::Gender;
use crate::ids::{CompanyID, EmployeeID};

/// An employee as persisted. Names are stored in two parts; the combined
/// display name only exists on the exposed view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Employee {
    pub id: EmployeeID,
    pub company_id: CompanyID,
    pub employee_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

impl Employee {
    pub const EMPLOYEE_NO_MAX_LEN: usize = 10;
    pub const NAME_PART_MAX_LEN: usize = 50;
    pub const FULL_NAME_MAX_LEN: usize = 80;

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Calendar-year difference; the birthday within the year is ignored.
    pub fn age_in(&self, year: i32) -> i32 {
        year - chrono::Datelike::year(&self.date_of_birth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(dob: NaiveDate) -> Employee {
        Employee {
            id: EmployeeID::new(),
            company_id: CompanyID::new(),
            employee_no: "MSFT231".into(),
            first_name: "Nick".into(),
            last_name: "Carter".into(),
            gender: Gender::Male,
            date_of_birth: dob,
        }
    }

    #[test]
    fn age_ignores_birthday_position() {
        let e = employee(NaiveDate::from_ymd_opt(1976, 12, 31).unwrap());
        assert_eq!(e.age_in(2020), 44);
    }

    #[test]
    fn full_name_joins_parts() {
        let e = employee(NaiveDate::from_ymd_opt(1976, 1, 2).unwrap());
        assert_eq!(e.full_name(), "Nick Carter");
    }
}
