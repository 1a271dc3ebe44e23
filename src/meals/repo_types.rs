use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Meal record; `within_diet` is always a plain boolean once read.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub consumed_at: String,
    pub within_diet: bool,
}

/// Fields written on create and on update.
#[derive(Debug, Clone, PartialEq)]
pub struct MealFields {
    pub name: String,
    pub description: String,
    pub consumed_at: String,
    pub within_diet: bool,
}
