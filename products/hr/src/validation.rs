//! Field rules for employee submissions.
//!
//! Each field runs presence, then format, then length/range, then (for the
//! indexed fields) uniqueness against the store. The first failing rule for
//! a field stops the remaining ones for that field; other fields are still
//! checked so a submission reports every broken field at once.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{
    error::{HrError, HrResult},
    messages::{Messages, Rule},
    model::{EmployeeFields, EmployeeForm, Field, UniqueField},
    store::EmployeeStore,
};

/// Field → messages, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// String-keyed copy for transports that know nothing about [`Field`].
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str().to_string(), messages.clone()))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.fields().map(Field::as_str).collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

/// Largest accepted salary: ten integer digits and two decimals.
pub fn max_salary() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Validates submissions against the field rules and the store's current
/// contents.
pub struct Validator<'a> {
    store: &'a dyn EmployeeStore,
    messages: &'a Messages,
}

impl<'a> Validator<'a> {
    pub fn new(store: &'a dyn EmployeeStore, messages: &'a Messages) -> Self {
        Self { store, messages }
    }

    /// `except` is the id of the record being updated; its own values never
    /// count as a conflict.
    pub async fn validate(
        &self,
        form: &EmployeeForm,
        except: Option<i32>,
    ) -> HrResult<EmployeeFields> {
        let (draft, mut errors) = check_form(form, self.messages);

        for (field, value) in [
            (UniqueField::EmployeeId, draft.employee_id.as_deref()),
            (UniqueField::Email, draft.email.as_deref()),
        ] {
            let Some(value) = value else {
                continue;
            };
            let taken = self
                .store
                .is_taken(field, value, except)
                .await
                .map_err(|err| HrError::from_store(err, self.messages))?;
            if taken {
                errors.add(field.field(), self.messages.message(field.field(), Rule::Unique));
            }
        }

        if !errors.is_empty() {
            return Err(HrError::Validation(errors));
        }
        // Every field without an error carries a value at this point.
        draft.into_fields().ok_or_else(|| {
            HrError::Validation(FieldErrors::single(
                Field::EmployeeId,
                self.messages.message(Field::EmployeeId, Rule::Required),
            ))
        })
    }
}

/// Values that passed their field-local rules.
#[derive(Debug, Default)]
pub(crate) struct Draft {
    employee_id: Option<String>,
    full_name: Option<String>,
    position: Option<String>,
    work_unit: Option<String>,
    start_date: Option<NaiveDate>,
    salary: Option<Decimal>,
    email: Option<String>,
    phone: Option<String>,
}

impl Draft {
    fn into_fields(self) -> Option<EmployeeFields> {
        Some(EmployeeFields {
            employee_id: self.employee_id?,
            full_name: self.full_name?,
            position: self.position?,
            work_unit: self.work_unit?,
            start_date: self.start_date?,
            salary: self.salary?,
            email: self.email?,
            phone: self.phone?,
        })
    }
}

/// Runs every rule that does not need the store.
pub(crate) fn check_form(form: &EmployeeForm, messages: &Messages) -> (Draft, FieldErrors) {
    let mut errors = FieldErrors::new();
    let mut check = |field: Field| {
        if form.is_mistyped(field) {
            errors.add(field, messages.message(field, type_rule(field)));
            return None;
        }
        let value = present(form.value(field));
        if value.is_none() {
            errors.add(field, messages.message(field, Rule::Required));
        }
        value
    };
    let raw = Field::ALL.map(|field| (field, check(field)));

    let mut draft = Draft::default();
    for (field, value) in raw {
        let Some(value) = value else {
            continue;
        };
        let outcome = match field {
            Field::StartDate => parse_date(value)
                .map(|date| draft.start_date = Some(date))
                .ok_or(Rule::Date),
            Field::Salary => parse_salary(value).map(|salary| draft.salary = Some(salary)),
            Field::Email => {
                if !is_valid_email(value) {
                    Err(Rule::Email)
                } else {
                    check_length(field, value).map(|()| draft.email = Some(value.to_string()))
                }
            }
            _ => check_length(field, value).map(|()| {
                let value = Some(value.to_string());
                match field {
                    Field::EmployeeId => draft.employee_id = value,
                    Field::FullName => draft.full_name = value,
                    Field::Position => draft.position = value,
                    Field::WorkUnit => draft.work_unit = value,
                    _ => draft.phone = value,
                }
            }),
        };
        if let Err(rule) = outcome {
            errors.add(field, messages.message(field, rule));
        }
    }
    (draft, errors)
}

/// Rule reported when a field arrived with a non-text JSON value.
fn type_rule(field: Field) -> Rule {
    match field {
        Field::Salary => Rule::Numeric,
        Field::StartDate => Rule::Date,
        _ => Rule::Text,
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn check_length(field: Field, value: &str) -> Result<(), Rule> {
    match field.max_len() {
        Some(max) if value.chars().count() > max => Err(Rule::MaxLength(max)),
        _ => Ok(()),
    }
}

/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
}

/// Parses, bounds and rounds a salary to two places (half to even).
pub fn parse_salary(raw: &str) -> Result<Decimal, Rule> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains('_') {
        return Err(Rule::Numeric);
    }
    let value = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| Rule::Numeric)?;
    if value.is_zero() {
        return Ok(Decimal::new(0, 2));
    }
    if value.is_sign_negative() {
        return Err(Rule::Min);
    }
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if rounded > max_salary() {
        return Err(Rule::MaxValue);
    }
    rounded.rescale(2);
    Ok(rounded)
}

/// Addr-spec check: dot-atom local part and a dotted hostname domain.
pub fn is_valid_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }
    valid_local_part(local) && valid_domain(domain)
}

fn valid_local_part(local: &str) -> bool {
    const SPECIALS: &str = "!#$%&'*+/=?^_`{|}~.-";
    !local.is_empty()
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(c))
}

fn valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }
    let labels = domain.split('.').collect::<Vec<_>>();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
