//! In-memory user and meal stores used by handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::{
    repo::MealStore,
    repo_types::{Meal, MealFields},
};
use crate::session::SessionUser;
use crate::users::{
    repo::UserStore,
    repo_types::{NewUser, User},
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    meals: Mutex<Vec<Meal>>,
}

impl MemoryStore {
    pub fn meals(&self) -> Vec<Meal> {
        self.meals.lock().unwrap().clone()
    }

    fn owned(&self, owner: &SessionUser) -> Vec<Meal> {
        let Some(user_id) = owner.as_uuid() else {
            return Vec::new();
        };
        self.meals()
            .into_iter()
            .filter(|m| m.user_id == user_id)
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn insert(&self, user: NewUser) -> anyhow::Result<()> {
        self.users.lock().unwrap().push(User {
            id: user.id,
            name: user.name,
            gender: user.gender,
            age: user.age,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(())
    }
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn list(&self, owner: &SessionUser) -> anyhow::Result<Vec<Meal>> {
        Ok(self.owned(owner))
    }

    async fn find(&self, owner: &SessionUser, id: &str) -> anyhow::Result<Vec<Meal>> {
        Ok(self
            .owned(owner)
            .into_iter()
            .filter(|m| m.id.to_string() == id)
            .collect())
    }

    async fn count_within_diet(&self, owner: &SessionUser) -> anyhow::Result<i64> {
        Ok(self.owned(owner).iter().filter(|m| m.within_diet).count() as i64)
    }

    async fn insert(&self, owner: &SessionUser, id: Uuid, fields: MealFields) -> anyhow::Result<()> {
        let user_id = owner
            .as_uuid()
            .ok_or_else(|| anyhow::anyhow!("session id is not a user id"))?;
        self.meals.lock().unwrap().push(Meal {
            id,
            user_id,
            name: fields.name,
            description: fields.description,
            consumed_at: fields.consumed_at,
            within_diet: fields.within_diet,
        });
        Ok(())
    }

    async fn update(&self, owner: &SessionUser, id: Uuid, fields: MealFields) -> anyhow::Result<u64> {
        let Some(user_id) = owner.as_uuid() else {
            return Ok(0);
        };
        let mut meals = self.meals.lock().unwrap();
        let mut affected = 0;
        for m in meals.iter_mut().filter(|m| m.id == id && m.user_id == user_id) {
            m.name = fields.name.clone();
            m.description = fields.description.clone();
            m.consumed_at = fields.consumed_at.clone();
            m.within_diet = fields.within_diet;
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, owner: &SessionUser, id: Uuid) -> anyhow::Result<u64> {
        let Some(user_id) = owner.as_uuid() else {
            return Ok(0);
        };
        let mut meals = self.meals.lock().unwrap();
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok((before - meals.len()) as u64)
    }
}
