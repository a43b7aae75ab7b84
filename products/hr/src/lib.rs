//! Employee records: field rules, persistence, search and pagination.

pub mod error;
pub mod factory;
pub mod format;
pub mod messages;
pub mod model;
pub mod pagination;
pub mod service;
pub mod store;
pub mod validation;
pub mod view;

pub use error::{HrError, HrResult, StoreError, StoreResult};
pub use factory::{EmployeeFactory, seed_employees};
pub use messages::{Locale, Messages};
pub use model::{Employee, EmployeeFields, EmployeeForm, Field, UniqueField};
pub use pagination::{Page, PageMeta, PageRequest};
pub use service::EmployeeService;
pub use store::{EmployeeStore, SeaOrmEmployeeStore};
pub use validation::FieldErrors;
pub use view::EmployeeView;
