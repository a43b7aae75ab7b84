use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

use crate::{
    error::{HrError, HrResult, StoreError},
    messages::{Locale, Messages},
    model::EmployeeForm,
    pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest},
    store::{EmployeeStore, SeaOrmEmployeeStore},
    validation::Validator,
    view::EmployeeView,
};

/// Employee use cases. Cheap to clone; every clone shares one store.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    messages: Messages,
    page_size: u64,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self {
            store,
            messages: Messages::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmEmployeeStore::new(db)))
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.messages = Messages::new(locale);
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    #[instrument(
        name = "hr.employees.list",
        skip_all,
        fields(search = search.unwrap_or_default(), page = ?page)
    )]
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Option<u64>,
    ) -> HrResult<Page<EmployeeView>> {
        let request = PageRequest::new(page, self.page_size);
        let (rows, total) = self
            .store
            .query(search, request.page(), request.per_page())
            .await
            .map_err(|err| self.lift(err))?;
        debug!(returned = rows.len(), total, "employees listed");
        Ok(Page::new(request, rows, total).map(EmployeeView::from))
    }

    #[instrument(name = "hr.employees.get", skip_all, fields(id = id))]
    pub async fn get(&self, id: i32) -> HrResult<EmployeeView> {
        let employee = self.store.find_by_id(id).await.map_err(|err| self.lift(err))?;
        Ok(employee.into())
    }

    #[instrument(name = "hr.employees.create", skip_all)]
    pub async fn create(&self, form: &EmployeeForm) -> HrResult<EmployeeView> {
        let fields = self.validator().validate(form, None).await.inspect_err(rejected)?;
        let employee = self
            .store
            .insert(&fields)
            .await
            .map_err(|err| self.lift(err))
            .inspect_err(rejected)?;
        info!(id = employee.id, employee_id = %employee.employee_id, "employee created");
        Ok(employee.into())
    }

    /// A missing record is reported before any field is checked.
    #[instrument(name = "hr.employees.update", skip_all, fields(id = id))]
    pub async fn update(&self, id: i32, form: &EmployeeForm) -> HrResult<EmployeeView> {
        self.store.find_by_id(id).await.map_err(|err| self.lift(err))?;
        let fields = self
            .validator()
            .validate(form, Some(id))
            .await
            .inspect_err(rejected)?;
        let employee = self
            .store
            .update(id, &fields)
            .await
            .map_err(|err| self.lift(err))
            .inspect_err(rejected)?;
        info!(id, "employee updated");
        Ok(employee.into())
    }

    #[instrument(name = "hr.employees.delete", skip_all, fields(id = id))]
    pub async fn delete(&self, id: i32) -> HrResult<()> {
        self.store.delete(id).await.map_err(|err| self.lift(err))?;
        info!(id, "employee deleted");
        Ok(())
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(self.store.as_ref(), &self.messages)
    }

    fn lift(&self, err: StoreError) -> HrError {
        HrError::from_store(err, &self.messages)
    }
}

fn rejected(err: &HrError) {
    if let HrError::Validation(errors) = err {
        debug!(fields = %errors, "employee submission rejected");
    }
}
