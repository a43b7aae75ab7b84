use sea_orm::entity::prelude::*;

/// One employee row. Salary is stored as whole hundredths so the column
/// never carries more than two fractional digits.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub employee_id: String,
    #[sea_orm(indexed)]
    pub full_name: String,
    #[sea_orm(indexed)]
    pub position: String,
    #[sea_orm(indexed)]
    pub work_unit: String,
    pub start_date: Date,
    pub salary_cents: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    /// Lower-cased copy of the searchable columns, kept by the writer so
    /// matching does not depend on the backend's `LOWER`.
    #[sea_orm(column_type = "Text")]
    pub search_text: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
