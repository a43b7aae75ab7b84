use async_graphql::{
    Context, ErrorExtensions, InputObject, InputValueError, InputValueResult, Object, Scalar,
    ScalarType, SimpleObject, Value,
};
use chrono::{DateTime, NaiveDate, Utc};
use platform_api::{ApiError, internal_error};
use products_hr::{EmployeeForm, EmployeeView, HrError, Page, PageMeta};
use tracing::{error, instrument};

use super::service;

#[derive(Default)]
pub struct HrQuery;

#[derive(Default)]
pub struct HrMutation;

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: i32,
    pub employee_id: String,
    pub full_name: String,
    pub position: String,
    pub work_unit: String,
    pub start_date: NaiveDate,
    /// Decimal text with two places, e.g. `5000000.00`.
    pub salary: String,
    pub email: String,
    pub phone: String,
    pub formatted_salary: String,
    pub formatted_start_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeView> for EmployeeNode {
    fn from(view: EmployeeView) -> Self {
        let EmployeeView {
            employee,
            formatted_salary,
            formatted_start_date,
        } = view;
        Self {
            id: employee.id,
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            position: employee.position,
            work_unit: employee.work_unit,
            start_date: employee.start_date,
            salary: employee.salary.to_string(),
            email: employee.email,
            phone: employee.phone,
            formatted_salary,
            formatted_start_date,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeePageMeta")]
pub struct PageMetaNode {
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl From<PageMeta> for PageMetaNode {
    fn from(meta: PageMeta) -> Self {
        Self {
            current_page: meta.current_page,
            per_page: meta.per_page,
            last_page: meta.last_page,
            total: meta.total,
            from: meta.from,
            to: meta.to,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeePage {
    pub data: Vec<EmployeeNode>,
    pub meta: PageMetaNode,
}

impl From<Page<EmployeeView>> for EmployeePage {
    fn from(page: Page<EmployeeView>) -> Self {
        Self {
            data: page.data.into_iter().map(EmployeeNode::from).collect(),
            meta: page.meta.into(),
        }
    }
}

/// Every field is optional here so that missing values come back as field
/// errors instead of schema errors.
#[derive(InputObject, Clone, Debug, Default)]
pub struct EmployeeInput {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub work_unit: Option<String>,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub start_date: Option<String>,
    pub salary: Option<SalaryInput>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Salary as decimal text (`"5000000.50"`) or a plain number (`5000000`).
/// Range and rounding are left to field validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SalaryInput(pub String);

#[Scalar(name = "SalaryInput")]
impl ScalarType for SalaryInput {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(text) => Ok(Self(text)),
            Value::Number(number) => Ok(Self(number.to_string())),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl From<EmployeeInput> for EmployeeForm {
    fn from(input: EmployeeInput) -> Self {
        Self {
            employee_id: input.employee_id,
            full_name: input.full_name,
            position: input.position,
            work_unit: input.work_unit,
            start_date: input.start_date,
            salary: input.salary.map(|salary| salary.0),
            email: input.email,
            phone: input.phone,
            ..Default::default()
        }
    }
}

#[Object]
impl HrQuery {
    #[instrument(name = "graphql.hr.employees", skip_all)]
    async fn employees(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        page: Option<i32>,
    ) -> async_graphql::Result<EmployeePage> {
        let page = page.and_then(|page| u64::try_from(page).ok());
        let result = service(ctx)?.list(search.as_deref(), page).await;
        result.map(EmployeePage::from).map_err(hr_error)
    }

    #[instrument(name = "graphql.hr.employee", skip_all)]
    async fn employee(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<EmployeeNode> {
        let result = service(ctx)?.get(id).await;
        result.map(EmployeeNode::from).map_err(hr_error)
    }
}

#[Object]
impl HrMutation {
    #[instrument(name = "graphql.hr.create_employee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let form = EmployeeForm::from(input);
        let result = service(ctx)?.create(&form).await;
        result.map(EmployeeNode::from).map_err(hr_error)
    }

    #[instrument(name = "graphql.hr.update_employee", skip_all)]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: i32,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let form = EmployeeForm::from(input);
        let result = service(ctx)?.update(id, &form).await;
        result.map(EmployeeNode::from).map_err(hr_error)
    }

    #[instrument(name = "graphql.hr.delete_employee", skip_all)]
    async fn delete_employee(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<bool> {
        service(ctx)?.delete(id).await.map_err(hr_error)?;
        Ok(true)
    }
}

fn hr_error(err: HrError) -> async_graphql::Error {
    match err {
        HrError::Validation(errors) => ApiError::Validation(errors.to_map()).extend(),
        HrError::NotFound(_) => ApiError::NotFound.extend(),
        HrError::System(err) => {
            error!(error = %err, "employee operation failed");
            internal_error(err)
        }
    }
}
