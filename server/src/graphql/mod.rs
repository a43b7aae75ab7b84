mod employees;

use async_graphql::{Context, EmptySubscription, Object, Schema, SchemaBuilder, SimpleObject};
use platform_api::ApiResult;
use products_hr::EmployeeService;
use serde::Serialize;
use tracing::instrument;

use employees::{HrMutation, HrQuery};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

fn schema_builder() -> SchemaBuilder<QueryRoot, MutationRoot, EmptySubscription> {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
}

pub fn build_schema(service: EmployeeService) -> SchemaType {
    schema_builder().data(service).finish()
}

/// SDL of the public schema; needs no runtime data.
pub fn schema_sdl() -> String {
    schema_builder().finish().sdl()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    async fn hr(&self) -> HrQuery {
        HrQuery
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn hr(&self) -> HrMutation {
        HrMutation
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}

fn service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a EmployeeService> {
    ctx.data::<EmployeeService>()
        .map_err(|_| platform_api::internal_error(anyhow::anyhow!("employee service missing")))
}
