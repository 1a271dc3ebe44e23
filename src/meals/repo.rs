use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::meals::repo_types::{Meal, MealFields};
use crate::session::SessionUser;

/// Meal persistence. Every query is filtered by the owner so that one user
/// can never see or touch another user's rows.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// The owner's ledger, in insertion order.
    async fn list(&self, owner: &SessionUser) -> anyhow::Result<Vec<Meal>>;
    async fn find(&self, owner: &SessionUser, id: &str) -> anyhow::Result<Vec<Meal>>;
    async fn count_within_diet(&self, owner: &SessionUser) -> anyhow::Result<i64>;
    async fn insert(&self, owner: &SessionUser, id: Uuid, fields: MealFields) -> anyhow::Result<()>;
    /// Returns the number of rows affected.
    async fn update(&self, owner: &SessionUser, id: Uuid, fields: MealFields) -> anyhow::Result<u64>;
    /// Returns the number of rows affected.
    async fn delete(&self, owner: &SessionUser, id: Uuid) -> anyhow::Result<u64>;
}

#[async_trait]
impl MealStore for PgStore {
    async fn list(&self, owner: &SessionUser) -> anyhow::Result<Vec<Meal>> {
        let Some(user_id) = owner.as_uuid() else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, consumed_at, within_diet
            FROM meals
            WHERE user_id = $1
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, owner: &SessionUser, id: &str) -> anyhow::Result<Vec<Meal>> {
        let (Some(user_id), Ok(meal_id)) = (owner.as_uuid(), Uuid::parse_str(id)) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, consumed_at, within_diet
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_within_diet(&self, owner: &SessionUser) -> anyhow::Result<i64> {
        let Some(user_id) = owner.as_uuid() else {
            return Ok(0);
        };
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM meals
            WHERE user_id = $1 AND within_diet = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn insert(&self, owner: &SessionUser, id: Uuid, fields: MealFields) -> anyhow::Result<()> {
        let user_id = owner
            .as_uuid()
            .with_context(|| format!("session id {} is not a user id", owner.as_str()))?;
        sqlx::query(
            r#"
            INSERT INTO meals (id, user_id, name, description, consumed_at, within_diet)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.consumed_at)
        .bind(fields.within_diet)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, owner: &SessionUser, id: Uuid, fields: MealFields) -> anyhow::Result<u64> {
        let Some(user_id) = owner.as_uuid() else {
            return Ok(0);
        };
        let res = sqlx::query(
            r#"
            UPDATE meals
            SET name = $3, description = $4, consumed_at = $5, within_diet = $6
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.consumed_at)
        .bind(fields.within_diet)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&self, owner: &SessionUser, id: Uuid) -> anyhow::Result<u64> {
        let Some(user_id) = owner.as_uuid() else {
            return Ok(0);
        };
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
