//! Reference data loaded into fresh stores. Mirrors the SQL seed migration.

use chrono::NaiveDate;
use routine_model::{Company, CompanyID, Employee, EmployeeID, Gender};
use uuid::Uuid;

pub const MICROSOFT: CompanyID =
    CompanyID(Uuid::from_u128(0x0c131a59_dbec_4527_a92a_daeb910efecb));
pub const GOOGLE: CompanyID =
    CompanyID(Uuid::from_u128(0x080d684e_21aa_46d8_8eb8_8c6709879f59));
pub const ALIBABA: CompanyID =
    CompanyID(Uuid::from_u128(0xd76af422_8f46_429c_b576_ad4d62216861));

const COMPANIES: &[(u128, &str, &str)] = &[
    (0x0c131a59_dbec_4527_a92a_daeb910efecb, "Microsoft", "Great Company"),
    (0x080d684e_21aa_46d8_8eb8_8c6709879f59, "Google", "Don't be evil"),
    (0xd76af422_8f46_429c_b576_ad4d62216861, "Alibaba", "Fubao Company"),
    (0x080d684e_21aa_46d8_8eb8_8c6709879f60, "Google1", "Don't be evil"),
    (0x080d684e_21aa_46d8_8eb8_8c6709879f61, "Google2", "Don't be evil"),
    (0x080d684e_21aa_46d8_8eb8_8c6709879f62, "Google3", "Don't be evil"),
    (0x080d684e_21aa_46d8_8eb8_8c6709879f63, "Google4", "Don't be evil"),
];

type EmployeeRow = (u128, u128, &'static str, &'static str, &'static str, Gender, (i32, u32, u32));

const EMPLOYEES: &[EmployeeRow] = &[
    (
        0x4b501cb3_d168_4cc0_b375_48fb33f318a4,
        0x0c131a59_dbec_4527_a92a_daeb910efecb,
        "MSFT231",
        "Nick",
        "Carter",
        Gender::Male,
        (1976, 1, 2),
    ),
    (
        0x7eaa532c_1be5_472c_a738_94fd26e5fad6,
        0x0c131a59_dbec_4527_a92a_daeb910efecb,
        "MSFT245",
        "Vince",
        "Carter",
        Gender::Male,
        (1981, 12, 5),
    ),
    (
        0x72457e73_ea34_4e02_b575_8d384e82a481,
        0x080d684e_21aa_46d8_8eb8_8c6709879f59,
        "G003",
        "Mary",
        "King",
        Gender::Female,
        (1986, 11, 4),
    ),
    (
        0x679dfd33_32e4_4393_b061_f7abb8956f53,
        0xd76af422_8f46_429c_b576_ad4d62216861,
        "A009",
        "卡",
        "里",
        Gender::Female,
        (1967, 1, 24),
    ),
    (
        0x1861341e_b42b_410c_ae21_cf11f36fc574,
        0xd76af422_8f46_429c_b576_ad4d62216861,
        "A404",
        "Not",
        "Man",
        Gender::Male,
        (1957, 3, 8),
    ),
    (
        0x7644b71d_d74e_43e2_ac32_8cbadd7b1c3b,
        0x080d684e_21aa_46d8_8eb8_8c6709879f60,
        "G097",
        "Kevin",
        "Richardson",
        Gender::Male,
        (1977, 4, 6),
    ),
    (
        0x7644b71d_d74e_43e2_ac32_8cbadd7b1c40,
        0x080d684e_21aa_46d8_8eb8_8c6709879f61,
        "G097",
        "Kevin",
        "Richardson",
        Gender::Male,
        (1977, 4, 6),
    ),
    (
        0x7644b71d_d74e_43e2_ac32_8cbadd7b1c41,
        0x080d684e_21aa_46d8_8eb8_8c6709879f62,
        "G097",
        "Kevin",
        "Richardson",
        Gender::Male,
        (1977, 4, 6),
    ),
    (
        0x7644b71d_d74e_43e2_ac32_8cbadd7b1c42,
        0x080d684e_21aa_46d8_8eb8_8c6709879f63,
        "G097",
        "Kevin",
        "Richardson",
        Gender::Male,
        (1977, 4, 6),
    ),
];

pub fn companies() -> Vec<Company> {
    COMPANIES
        .iter()
        .map(|(id, name, introduction)| Company {
            id: CompanyID(Uuid::from_u128(*id)),
            name: (*name).to_string(),
            introduction: Some((*introduction).to_string()),
            employees: Vec::new(),
        })
        .collect()
}

pub fn employees() -> Vec<Employee> {
    EMPLOYEES
        .iter()
        .filter_map(|(id, company, no, first, last, gender, (y, m, d))| {
            Some(Employee {
                id: EmployeeID(Uuid::from_u128(*id)),
                company_id: CompanyID(Uuid::from_u128(*company)),
                employee_no: (*no).to_string(),
                first_name: (*first).to_string(),
                last_name: (*last).to_string(),
                gender: *gender,
                date_of_birth: NaiveDate::from_ymd_opt(*y, *m, *d)?,
            })
        })
        .collect()
}
