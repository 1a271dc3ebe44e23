use serde::Deserialize;

use crate::error::AppError;
use crate::meals::repo_types::MealFields;
use crate::validation::{non_blank, truthy};

/// Body of `POST /meals`: `within_diet` must be a real boolean.
#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    pub description: String,
    pub within_diet: bool,
    pub consumed_at: String,
}

/// Body of `PUT /meals/:id`: `within_diet` is coerced by truthiness and a
/// missing value reads as `false`.
#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub name: String,
    pub description: String,
    #[serde(default, deserialize_with = "truthy")]
    pub within_diet: bool,
    pub consumed_at: String,
}

fn fields(
    name: String,
    description: String,
    within_diet: bool,
    consumed_at: String,
) -> Result<MealFields, AppError> {
    Ok(MealFields {
        name: non_blank(name, "name")?,
        description: non_blank(description, "description")?,
        within_diet,
        consumed_at,
    })
}

impl TryFrom<CreateMealRequest> for MealFields {
    type Error = AppError;

    fn try_from(r: CreateMealRequest) -> Result<Self, Self::Error> {
        fields(r.name, r.description, r.within_diet, r.consumed_at)
    }
}

impl TryFrom<UpdateMealRequest> for MealFields {
    type Error = AppError;

    fn try_from(r: UpdateMealRequest) -> Result<Self, Self::Error> {
        fields(r.name, r.description, r.within_diet, r.consumed_at)
    }
}
