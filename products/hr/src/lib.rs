//! HR module: employee records and the rules around them.

mod error;
mod service;
mod store;

use entity::employees;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

pub use entity::employees::Model as Employee;
pub use error::{HrError, HrResult};
pub use service::EmployeeService;
pub use store::{EmployeeStore, SeaOrmEmployeeStore};

/// Client-supplied employee fields. The identifier is never part of the input;
/// it is assigned on create and taken from the request path on update.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
    pub position: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub salary: Decimal,
}

impl EmployeeInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        salary: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            position: position.into(),
            salary,
        }
    }

    /// Overwrite every business field of `model` with this input.
    fn apply(self, model: &mut employees::ActiveModel) {
        model.name = Set(self.name);
        model.email = Set(self.email);
        model.position = Set(self.position);
        model.salary = Set(self.salary);
    }

    fn into_new_record(self) -> employees::ActiveModel {
        let mut model = employees::ActiveModel::default();
        self.apply(&mut model);
        model
    }
}
