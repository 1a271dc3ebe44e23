use async_trait::async_trait;

use crate::db::PgStore;
use crate::users::repo_types::{NewUser, User, UserRow};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, in storage order.
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    async fn insert(&self, user: NewUser) -> anyhow::Result<()>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, gender, age::float8 AS age, created_at
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn insert(&self, user: NewUser) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, gender, age)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.gender.as_str())
        .bind(user.age)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
