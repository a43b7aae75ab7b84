#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use products_hr::{EmployeeForm, EmployeeService};
use sea_orm::{Database, DatabaseConnection};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub async fn setup_service() -> (DatabaseConnection, EmployeeService) {
    let db = setup_db().await;
    let service = EmployeeService::from_connection(db.clone());
    (db, service)
}

pub fn form(employee_id: &str, full_name: &str, email: &str) -> EmployeeForm {
    EmployeeForm {
        employee_id: Some(employee_id.into()),
        full_name: Some(full_name.into()),
        position: Some("Manager".into()),
        work_unit: Some("Human Resources".into()),
        start_date: Some("2024-01-01".into()),
        salary: Some("5000000".into()),
        email: Some(email.into()),
        phone: Some("081234567890".into()),
        ..Default::default()
    }
}

pub fn john_doe() -> EmployeeForm {
    form("EMP001", "John Doe", "test@example.com")
}

/// Inserts `count` numbered employees named "Person N".
pub async fn seed_numbered(service: &EmployeeService, count: usize) {
    for n in 1..=count {
        service
            .create(&form(
                &format!("EMP{n:03}"),
                &format!("Person {n}"),
                &format!("person{n}@example.com"),
            ))
            .await
            .expect("seed employee");
    }
}
