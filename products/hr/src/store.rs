//! Persistence for employee rows.
//!
//! [`EmployeeStore`] is the seam the service and validator talk to;
//! [`SeaOrmEmployeeStore`] backs it with the `employees` table. The table's
//! unique indexes stay authoritative: a write that loses a race against
//! another writer comes back as [`StoreError::UniqueViolation`].

use async_trait::async_trait;
use chrono::Utc;
use entity::employees;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};
use tracing::debug;

use crate::{
    error::{StoreError, StoreResult},
    model::{Employee, EmployeeFields, UniqueField},
};

const LIKE_ESCAPE: char = '\\';

/// Keeps one searched column's value from running into the next.
const SEARCH_SEPARATOR: &str = "\u{1f}";

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert(&self, fields: &EmployeeFields) -> StoreResult<Employee>;

    /// Replaces all business fields and bumps `updated_at`.
    async fn update(&self, id: i32, fields: &EmployeeFields) -> StoreResult<Employee>;

    async fn delete(&self, id: i32) -> StoreResult<()>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Employee>;

    /// One page of rows in id order plus the total number of matches.
    /// `page` is 1-indexed.
    async fn query(
        &self,
        filter: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> StoreResult<(Vec<Employee>, u64)>;

    /// Whether another record already holds `value` in `field`.
    async fn is_taken(
        &self,
        field: UniqueField,
        value: &str,
        except: Option<i32>,
    ) -> StoreResult<bool>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeStore {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmEmployeeStore {
    async fn insert(&self, fields: &EmployeeFields) -> StoreResult<Employee> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = employees::ActiveModel {
            employee_id: Set(fields.employee_id.clone()),
            full_name: Set(fields.full_name.clone()),
            position: Set(fields.position.clone()),
            work_unit: Set(fields.work_unit.clone()),
            start_date: Set(fields.start_date),
            salary_cents: Set(salary_cents(fields.salary)?),
            email: Set(fields.email.clone()),
            phone: Set(fields.phone.clone()),
            search_text: Set(search_text(fields)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;
        debug!(id = model.id, "employee row inserted");
        Ok(model.into())
    }

    async fn update(&self, id: i32, fields: &EmployeeFields) -> StoreResult<Employee> {
        let existing = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        let mut active: employees::ActiveModel = existing.into();
        active.employee_id = Set(fields.employee_id.clone());
        active.full_name = Set(fields.full_name.clone());
        active.position = Set(fields.position.clone());
        active.work_unit = Set(fields.work_unit.clone());
        active.start_date = Set(fields.start_date);
        active.salary_cents = Set(salary_cents(fields.salary)?);
        active.email = Set(fields.email.clone());
        active.phone = Set(fields.phone.clone());
        active.search_text = Set(search_text(fields));
        active.updated_at = Set(Utc::now().into());
        let model = active.update(&self.db).await.map_err(|err| match err {
            DbErr::RecordNotUpdated => StoreError::NotFound(id),
            other => write_error(other),
        })?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = employees::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Employee> {
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Employee::from)
            .ok_or(StoreError::NotFound(id))
    }

    async fn query(
        &self,
        filter: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> StoreResult<(Vec<Employee>, u64)> {
        let mut select = employees::Entity::find();
        if let Some(term) = filter.map(str::trim).filter(|term| !term.is_empty()) {
            select = select.filter(search_condition(term));
        }
        let total = select.clone().count(&self.db).await?;
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        if offset >= total {
            return Ok((Vec::new(), total));
        }
        let rows = select
            .order_by_asc(employees::Column::Id)
            .limit(page_size)
            .offset(offset)
            .all(&self.db)
            .await?;
        Ok((rows.into_iter().map(Employee::from).collect(), total))
    }

    async fn is_taken(
        &self,
        field: UniqueField,
        value: &str,
        except: Option<i32>,
    ) -> StoreResult<bool> {
        let matches = match field {
            UniqueField::EmployeeId => field.column().eq(value),
            UniqueField::Email => Expr::expr(Func::lower(Expr::col(field.column())))
                .eq(value.to_ascii_lowercase()),
        };
        let mut select = employees::Entity::find().filter(matches);
        if let Some(id) = except {
            select = select.filter(employees::Column::Id.ne(id));
        }
        Ok(select.count(&self.db).await? > 0)
    }
}

/// Searched values in the order full name, employee id, position, work
/// unit, email. Lower-cased here so non-ASCII letters fold the same way on
/// every backend.
fn search_text(fields: &EmployeeFields) -> String {
    [
        fields.full_name.as_str(),
        fields.employee_id.as_str(),
        fields.position.as_str(),
        fields.work_unit.as_str(),
        fields.email.as_str(),
    ]
    .map(str::to_lowercase)
    .join(SEARCH_SEPARATOR)
}

/// Case-insensitive substring match against `search_text`. Wildcards in the
/// term match literally.
fn search_condition(term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::col(employees::Column::SearchText).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn salary_cents(salary: Decimal) -> StoreResult<i64> {
    (salary.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| StoreError::Database(DbErr::Custom(format!("salary {salary} out of range"))))
}

fn write_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => match unique_field(&message) {
            Some(field) => StoreError::UniqueViolation(field),
            None => StoreError::Database(err),
        },
        _ => StoreError::Database(err),
    }
}

/// Maps a driver's unique-violation text to the column it names. Sqlite
/// reports `employees.email`, Postgres the index `idx_employees_email`.
fn unique_field(message: &str) -> Option<UniqueField> {
    let message = message.to_ascii_lowercase();
    if message.contains("email") {
        Some(UniqueField::Email)
    } else if message.contains("employee_id") {
        Some(UniqueField::EmployeeId)
    } else {
        None
    }
}
