use serde::Serialize;

use crate::{
    format::{format_date, format_rupiah},
    model::Employee,
};

/// An employee as list and detail screens show it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub formatted_salary: String,
    pub formatted_start_date: String,
}

impl From<Employee> for EmployeeView {
    fn from(employee: Employee) -> Self {
        Self {
            formatted_salary: format_rupiah(employee.salary),
            formatted_start_date: format_date(employee.start_date),
            employee,
        }
    }
}
