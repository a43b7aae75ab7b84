use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use entity::employees;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::IgnoredAny};

/// Business fields a client submits, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EmployeeId,
    FullName,
    Position,
    WorkUnit,
    StartDate,
    Salary,
    Email,
    Phone,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::EmployeeId,
        Field::FullName,
        Field::Position,
        Field::WorkUnit,
        Field::StartDate,
        Field::Salary,
        Field::Email,
        Field::Phone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::EmployeeId => "employee_id",
            Field::FullName => "full_name",
            Field::Position => "position",
            Field::WorkUnit => "work_unit",
            Field::StartDate => "start_date",
            Field::Salary => "salary",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }

    /// Column width in characters, for the text fields that have one.
    pub fn max_len(self) -> Option<usize> {
        match self {
            Field::EmployeeId | Field::Phone => Some(20),
            Field::FullName | Field::Position | Field::WorkUnit | Field::Email => Some(255),
            Field::StartDate | Field::Salary => None,
        }
    }
}

/// Fields backed by a unique index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniqueField {
    EmployeeId,
    Email,
}

impl UniqueField {
    pub fn field(self) -> Field {
        match self {
            UniqueField::EmployeeId => Field::EmployeeId,
            UniqueField::Email => Field::Email,
        }
    }

    pub(crate) fn column(self) -> employees::Column {
        match self {
            UniqueField::EmployeeId => employees::Column::EmployeeId,
            UniqueField::Email => employees::Column::Email,
        }
    }
}

/// Raw submission. Nothing here has been checked yet.
///
/// Deserializing never fails on a wrong JSON type: the field is left empty
/// and listed in `mistyped`, so validation can report it with the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawForm")]
pub struct EmployeeForm {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub work_unit: Option<String>,
    pub start_date: Option<String>,
    pub salary: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Fields submitted with a value of the wrong type.
    pub mistyped: BTreeSet<Field>,
}

impl EmployeeForm {
    pub fn value(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::EmployeeId => &self.employee_id,
            Field::FullName => &self.full_name,
            Field::Position => &self.position,
            Field::WorkUnit => &self.work_unit,
            Field::StartDate => &self.start_date,
            Field::Salary => &self.salary,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        };
        value.as_deref()
    }

    pub fn is_mistyped(&self, field: Field) -> bool {
        self.mistyped.contains(&field)
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: Some(employee.employee_id.clone()),
            full_name: Some(employee.full_name.clone()),
            position: Some(employee.position.clone()),
            work_unit: Some(employee.work_unit.clone()),
            start_date: Some(employee.start_date.format("%Y-%m-%d").to_string()),
            salary: Some(employee.salary.to_string()),
            email: Some(employee.email.clone()),
            phone: Some(employee.phone.clone()),
            mistyped: BTreeSet::new(),
        }
    }
}

/// Any JSON value. Only strings, and numbers for salary, are usable.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Other(IgnoredAny),
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawForm {
    employee_id: Option<RawValue>,
    full_name: Option<RawValue>,
    position: Option<RawValue>,
    work_unit: Option<RawValue>,
    start_date: Option<RawValue>,
    salary: Option<RawValue>,
    email: Option<RawValue>,
    phone: Option<RawValue>,
}

impl From<RawForm> for EmployeeForm {
    fn from(raw: RawForm) -> Self {
        let mut mistyped = BTreeSet::new();
        let mut take = |field: Field, value: Option<RawValue>| match value? {
            RawValue::Text(text) => Some(text),
            // Salary inputs arrive as form strings or JSON numbers.
            RawValue::Integer(number) if field == Field::Salary => Some(number.to_string()),
            RawValue::Float(number) if field == Field::Salary => Some(number.to_string()),
            _ => {
                mistyped.insert(field);
                None
            }
        };
        let employee_id = take(Field::EmployeeId, raw.employee_id);
        let full_name = take(Field::FullName, raw.full_name);
        let position = take(Field::Position, raw.position);
        let work_unit = take(Field::WorkUnit, raw.work_unit);
        let start_date = take(Field::StartDate, raw.start_date);
        let salary = take(Field::Salary, raw.salary);
        let email = take(Field::Email, raw.email);
        let phone = take(Field::Phone, raw.phone);
        Self {
            employee_id,
            full_name,
            position,
            work_unit,
            start_date,
            salary,
            email,
            phone,
            mistyped,
        }
    }
}

/// Validated and normalized business fields, ready for the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeFields {
    pub employee_id: String,
    pub full_name: String,
    pub position: String,
    pub work_unit: String,
    pub start_date: NaiveDate,
    pub salary: Decimal,
    pub email: String,
    pub phone: String,
}

/// A persisted employee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i32,
    pub employee_id: String,
    pub full_name: String,
    pub position: String,
    pub work_unit: String,
    pub start_date: NaiveDate,
    pub salary: Decimal,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            full_name: model.full_name,
            position: model.position,
            work_unit: model.work_unit,
            start_date: model.start_date,
            salary: Decimal::new(model.salary_cents, 2),
            email: model.email,
            phone: model.phone,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
