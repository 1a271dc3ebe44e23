use serde::Deserialize;

use crate::error::AppError;
use crate::users::repo_types::Gender;
use crate::validation::{non_blank, number};

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(deserialize_with = "number")]
    pub age: f64,
    pub gender: Gender,
}

impl CreateUserRequest {
    /// Rules the shape alone cannot express.
    pub fn validate(self) -> Result<Self, AppError> {
        let name = non_blank(self.name, "name")?;
        if self.age < 0.0 {
            return Err(AppError::Validation("age must be a non-negative number".into()));
        }
        Ok(Self { name, ..self })
    }
}
