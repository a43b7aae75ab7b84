mod common;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use products_hr::{
    Employee, EmployeeFields, EmployeeForm, EmployeeService, EmployeeStore, Field, HrError,
    FieldErrors, Locale, SeaOrmEmployeeStore, StoreError, StoreResult, UniqueField,
    seed_employees,
};

use common::{form, john_doe, seed_numbered, setup_db, setup_service};

fn field_errors(err: HrError) -> FieldErrors {
    match err {
        HrError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_round_trips_every_field() {
    let (_db, service) = setup_service().await;
    let created = service.create(&john_doe()).await.unwrap();
    let fetched = service.get(created.employee.id).await.unwrap();

    let employee = &fetched.employee;
    assert_eq!(employee.employee_id, "EMP001");
    assert_eq!(employee.full_name, "John Doe");
    assert_eq!(employee.position, "Manager");
    assert_eq!(employee.work_unit, "Human Resources");
    assert_eq!(employee.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(employee.salary.to_string(), "5000000.00");
    assert_eq!(employee.email, "test@example.com");
    assert_eq!(employee.phone, "081234567890");
    assert_eq!(employee.created_at, employee.updated_at);
    assert_eq!(fetched.formatted_salary, "Rp 5.000.000");
    assert_eq!(fetched.formatted_start_date, "01/01/2024");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn empty_submission_reports_all_fields() {
    let (_db, service) = setup_service().await;
    let err = service.create(&EmployeeForm::default()).await.unwrap_err();
    let errors = field_errors(err);
    assert_eq!(errors.fields().collect::<Vec<_>>(), Field::ALL.to_vec());
    assert_eq!(service.list(None, None).await.unwrap().meta.total, 0);
}

#[tokio::test]
async fn duplicate_employee_id_is_rejected() {
    let (_db, service) = setup_service().await;
    service.create(&john_doe()).await.unwrap();

    let err = service
        .create(&form("EMP001", "Jane Smith", "jane@example.com"))
        .await
        .unwrap_err();
    let errors = field_errors(err);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::EmployeeId]);
    assert_eq!(
        errors.get(Field::EmployeeId),
        ["ID Karyawan sudah digunakan karyawan lain."]
    );
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (_db, service) = setup_service().await;
    service.create(&john_doe()).await.unwrap();

    let service = service.with_locale(Locale::English);
    let err = service
        .create(&form("EMP002", "Jane Smith", "test@example.com"))
        .await
        .unwrap_err();
    let errors = field_errors(err);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Email]);
    assert_eq!(errors.get(Field::Email), ["The email has already been taken."]);
}

#[tokio::test]
async fn email_uniqueness_ignores_case() {
    let (_db, service) = setup_service().await;
    let john = service.create(&john_doe()).await.unwrap();

    let err = service
        .create(&form("EMP002", "Jane Smith", "TEST@Example.com"))
        .await
        .unwrap_err();
    let errors = field_errors(err);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Email]);

    let mut shouting = john_doe();
    shouting.email = Some("Test@Example.COM".into());
    let updated = service.update(john.employee.id, &shouting).await.unwrap();
    assert_eq!(updated.employee.email, "Test@Example.COM");
    assert_eq!(service.list(None, None).await.unwrap().meta.total, 1);
}

#[tokio::test]
async fn update_keeps_own_unique_values() {
    let (_db, service) = setup_service().await;
    let created = service.create(&john_doe()).await.unwrap();
    let id = created.employee.id;

    let mut changed = john_doe();
    changed.full_name = Some("Updated Name".into());
    tokio::time::sleep(Duration::from_millis(20)).await;
    let updated = service.update(id, &changed).await.unwrap();

    assert_eq!(updated.employee.full_name, "Updated Name");
    assert_eq!(updated.employee.employee_id, "EMP001");
    assert_eq!(updated.employee.created_at, created.employee.created_at);
    assert!(updated.employee.updated_at > created.employee.updated_at);
    let fetched = service.get(id).await.unwrap();
    assert_eq!(fetched.employee.full_name, "Updated Name");
}

#[tokio::test]
async fn update_cannot_take_another_records_email() {
    let (_db, service) = setup_service().await;
    service.create(&john_doe()).await.unwrap();
    let jane = service
        .create(&form("EMP002", "Jane Smith", "jane@example.com"))
        .await
        .unwrap();

    let err = service
        .update(jane.employee.id, &form("EMP002", "Jane Smith", "test@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::Validation(ref errors) if errors.contains(Field::Email)));
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let (_db, service) = setup_service().await;
    let created = service.create(&john_doe()).await.unwrap();
    let id = created.employee.id;

    service.delete(id).await.unwrap();
    assert!(matches!(service.get(id).await, Err(HrError::NotFound(missing)) if missing == id));
    assert!(matches!(service.delete(id).await, Err(HrError::NotFound(_))));
    assert!(matches!(
        service.update(id, &john_doe()).await,
        Err(HrError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_of_missing_record_skips_validation() {
    let (_db, service) = setup_service().await;
    let err = service
        .update(999, &EmployeeForm::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::NotFound(999)));
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let (_db, service) = setup_service().await;
    service.create(&john_doe()).await.unwrap();
    service
        .create(&form("EMP002", "Jane Smith", "jane@example.com"))
        .await
        .unwrap();
    let mut it = form("IT-7", "Ari Wibowo", "ari@corp.example.org");
    it.work_unit = Some("IT".into());
    service.create(&it).await.unwrap();

    let page = service.list(Some("john"), None).await.unwrap();
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].employee.full_name, "John Doe");

    let by_email = service.list(Some("CORP.EXAMPLE"), None).await.unwrap();
    assert_eq!(by_email.data.len(), 1);
    assert_eq!(by_email.data[0].employee.employee_id, "IT-7");

    let by_code = service.list(Some("emp00"), None).await.unwrap();
    assert_eq!(by_code.meta.total, 2);

    let everyone = service.list(Some("   "), None).await.unwrap();
    assert_eq!(everyone.meta.total, 3);
    let ids = everyone
        .data
        .iter()
        .map(|view| view.employee.id)
        .collect::<Vec<_>>();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn search_folds_non_ascii_letters() {
    let (_db, service) = setup_service().await;
    service.create(&john_doe()).await.unwrap();
    let mut elodie = form("EMP002", "Élodie Ñúñez", "elodie@example.com");
    elodie.position = Some("Überwachung".into());
    let created = service.create(&elodie).await.unwrap();

    for term in ["Élodie", "élodie", "ÉLODIE", "ñúÑEZ", "überwachung"] {
        let page = service.list(Some(term), None).await.unwrap();
        assert_eq!(page.meta.total, 1, "{term}");
        assert_eq!(page.data[0].employee.id, created.employee.id);
    }

    let mut renamed = elodie.clone();
    renamed.full_name = Some("Zoë Ångström".into());
    service.update(created.employee.id, &renamed).await.unwrap();
    assert_eq!(service.list(Some("élodie"), None).await.unwrap().meta.total, 0);
    assert_eq!(service.list(Some("ZOË ÅNG"), None).await.unwrap().meta.total, 1);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let (_db, service) = setup_service().await;
    service.create(&john_doe()).await.unwrap();
    service
        .create(&form("EMP_100", "Jane Smith", "jane@example.com"))
        .await
        .unwrap();

    assert_eq!(service.list(Some("%"), None).await.unwrap().meta.total, 0);
    let underscored = service.list(Some("p_1"), None).await.unwrap();
    assert_eq!(underscored.meta.total, 1);
    assert_eq!(underscored.data[0].employee.employee_id, "EMP_100");
}

#[tokio::test]
async fn twenty_records_paginate_by_fifteen() {
    let (_db, service) = setup_service().await;
    seed_numbered(&service, 20).await;

    let first = service.list(None, Some(1)).await.unwrap();
    assert_eq!(first.data.len(), 15);
    assert_eq!(first.meta.total, 20);
    assert_eq!(first.meta.last_page, 2);
    assert_eq!(first.data[0].employee.full_name, "Person 1");

    let second = service.list(None, Some(2)).await.unwrap();
    assert_eq!(second.data.len(), 5);
    assert_eq!((second.meta.from, second.meta.to), (Some(16), Some(20)));
    assert_eq!(second.data[4].employee.full_name, "Person 20");

    let third = service.list(None, Some(3)).await.unwrap();
    assert!(third.data.is_empty());
    assert_eq!(third.meta.current_page, 3);
    assert_eq!(third.meta.total, 20);
    assert_eq!(third.meta.from, None);

    let zero = service.list(None, Some(0)).await.unwrap();
    assert_eq!(zero.meta.current_page, 1);
}

#[tokio::test]
async fn page_size_is_configurable() {
    let (_db, service) = setup_service().await;
    let service = service.with_page_size(4);
    seed_numbered(&service, 10).await;

    let page = service.list(None, Some(3)).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.meta.per_page, 4);
    assert_eq!(page.meta.last_page, 3);
}

#[tokio::test]
async fn salary_keeps_two_decimals() {
    let (_db, service) = setup_service().await;
    let mut submitted = john_doe();
    submitted.salary = Some("1234567.895".into());
    let created = service.create(&submitted).await.unwrap();
    assert_eq!(created.employee.salary.to_string(), "1234567.90");
    assert_eq!(created.formatted_salary, "Rp 1.234.568");
}

/// Reports every value as free so writes reach the unique indexes.
struct BlindStore(SeaOrmEmployeeStore);

#[async_trait]
impl EmployeeStore for BlindStore {
    async fn insert(&self, fields: &EmployeeFields) -> StoreResult<Employee> {
        self.0.insert(fields).await
    }

    async fn update(&self, id: i32, fields: &EmployeeFields) -> StoreResult<Employee> {
        self.0.update(id, fields).await
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        self.0.delete(id).await
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Employee> {
        self.0.find_by_id(id).await
    }

    async fn query(
        &self,
        filter: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> StoreResult<(Vec<Employee>, u64)> {
        self.0.query(filter, page, page_size).await
    }

    async fn is_taken(&self, _: UniqueField, _: &str, _: Option<i32>) -> StoreResult<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn unique_index_violation_becomes_field_error() {
    let db = setup_db().await;
    let service = EmployeeService::new(Arc::new(BlindStore(SeaOrmEmployeeStore::new(db))));
    service.create(&john_doe()).await.unwrap();

    let err = service
        .create(&form("EMP002", "Jane Smith", "test@example.com"))
        .await
        .unwrap_err();
    let errors = field_errors(err);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Email]);

    let err = service
        .create(&form("EMP001", "Jane Smith", "jane@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::Validation(ref errors) if errors.contains(Field::EmployeeId)));
}

#[tokio::test]
async fn update_unique_index_violation_becomes_field_error() {
    let db = setup_db().await;
    let service = EmployeeService::new(Arc::new(BlindStore(SeaOrmEmployeeStore::new(db))))
        .with_locale(Locale::English);
    service.create(&john_doe()).await.unwrap();
    let jane = service
        .create(&form("EMP002", "Jane Smith", "jane@example.com"))
        .await
        .unwrap();

    let err = service
        .update(
            jane.employee.id,
            &form("EMP001", "Jane Smith", "jane@example.com"),
        )
        .await
        .unwrap_err();
    let errors = field_errors(err);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::EmployeeId]);
    assert_eq!(
        errors.get(Field::EmployeeId),
        ["The employee id has already been taken."]
    );

    let unchanged = service.get(jane.employee.id).await.unwrap();
    assert_eq!(unchanged.employee.employee_id, "EMP002");
}

#[tokio::test]
async fn store_reports_unique_violations_directly() {
    let (db, service) = setup_service().await;
    let created = service.create(&john_doe()).await.unwrap();
    let store = SeaOrmEmployeeStore::new(db);

    let fields = EmployeeFields {
        employee_id: "EMP999".into(),
        full_name: "Someone Else".into(),
        position: "Analis".into(),
        work_unit: "IT".into(),
        start_date: created.employee.start_date,
        salary: created.employee.salary,
        email: created.employee.email.clone(),
        phone: "0800".into(),
    };
    let err = store.insert(&fields).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(UniqueField::Email)));
    let own = store
        .is_taken(UniqueField::Email, "test@example.com", Some(created.employee.id))
        .await
        .unwrap();
    assert!(!own);
    let other = store
        .is_taken(UniqueField::Email, "test@example.com", None)
        .await
        .unwrap();
    assert!(other);
}

#[tokio::test]
async fn seeding_creates_requested_count() {
    let (_db, service) = setup_service().await;
    let created = seed_employees(&service, 25).await.unwrap();
    assert_eq!(created, 25);
    let page = service.list(None, None).await.unwrap();
    assert_eq!(page.meta.total, 25);
    assert!(
        page.data
            .iter()
            .all(|view| view.employee.employee_id.starts_with("EMP"))
    );
}
