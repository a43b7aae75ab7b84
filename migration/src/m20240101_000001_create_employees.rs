use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    EmployeeId,
    FullName,
    Position,
    WorkUnit,
    StartDate,
    SalaryCents,
    Email,
    Phone,
    SearchText,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::EmployeeId).string_len(20).not_null())
                    .col(ColumnDef::new(Employees::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::Position).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::WorkUnit).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::StartDate).date().not_null())
                    .col(ColumnDef::new(Employees::SalaryCents).big_integer().not_null())
                    .col(ColumnDef::new(Employees::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::Phone).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Employees::SearchText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Employees::SalaryCents).gte(0))
                    .to_owned(),
            )
            .await?;

        // Unique indexes are the authoritative guard against duplicate
        // employee ids and emails under concurrent writers.
        for (name, column) in [
            ("idx_employees_employee_id", Employees::EmployeeId),
            ("idx_employees_email", Employees::Email),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Employees::Table)
                        .col(column)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        for (name, column) in [
            ("idx_employees_full_name", Employees::FullName),
            ("idx_employees_position", Employees::Position),
            ("idx_employees_work_unit", Employees::WorkUnit),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Employees::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_work_unit_position")
                    .table(Employees::Table)
                    .col(Employees::WorkUnit)
                    .col(Employees::Position)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await
    }
}
