use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealership_events::{CanonicalTimestamp, EmployeeEvent, Role};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use crate::traits::EmployeeStore;

/// Employee replica backed by the Employee service's own relational store.
pub struct MySqlEmployeeStore {
    pool: MySqlPool,
}

impl MySqlEmployeeStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn role_to_str(role: &Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Manager => "manager",
        Role::SalesPerson => "sales_person",
    }
}

fn role_from_str(s: &str) -> anyhow::Result<Role> {
    match s {
        "admin" => Ok(Role::Admin),
        "manager" => Ok(Role::Manager),
        "sales_person" => Ok(Role::SalesPerson),
        other => Err(anyhow::anyhow!("unrecognized role in employees table: {other}")),
    }
}

fn row_to_event(row: &sqlx::mysql::MySqlRow) -> anyhow::Result<EmployeeEvent> {
    let id: String = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(EmployeeEvent {
        id: Uuid::parse_str(&id)?,
        email: row.try_get("email")?,
        hashed_password: row.try_get("hashed_password")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role: role_from_str(&role)?,
        is_deleted: row.try_get("is_deleted")?,
        created_at: CanonicalTimestamp::from(created_at),
        updated_at: CanonicalTimestamp::from(updated_at),
    })
}

#[async_trait]
impl EmployeeStore for MySqlEmployeeStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<EmployeeEvent>> {
        let row = sqlx::query("select * from employees where id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_event).transpose()
    }

    async fn get_by_email(&self, email: &str) -> anyhow::Result<Option<EmployeeEvent>> {
        let row = sqlx::query("select * from employees where email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_event).transpose()
    }

    async fn insert(&self, event: &EmployeeEvent) -> anyhow::Result<()> {
        sqlx::query(
            "insert into employees \
             (id, email, hashed_password, first_name, last_name, role, is_deleted, created_at, updated_at) \
             values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(event.id.to_string())
        .bind(&event.email)
        .bind(&event.hashed_password)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(role_to_str(&event.role))
        .bind(event.is_deleted)
        .bind(event.created_at.inner())
        .bind(event.updated_at.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert(&self, event: &EmployeeEvent) -> anyhow::Result<()> {
        sqlx::query(
            "insert into employees \
             (id, email, hashed_password, first_name, last_name, role, is_deleted, created_at, updated_at) \
             values (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             on duplicate key update \
             email = values(email), hashed_password = values(hashed_password), \
             first_name = values(first_name), last_name = values(last_name), \
             role = values(role), is_deleted = values(is_deleted), \
             updated_at = values(updated_at)",
        )
        .bind(event.id.to_string())
        .bind(&event.email)
        .bind(&event.hashed_password)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(role_to_str(&event.role))
        .bind(event.is_deleted)
        .bind(event.created_at.inner())
        .bind(event.updated_at.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_tombstone(&self, id: Uuid, at: CanonicalTimestamp) -> anyhow::Result<()> {
        sqlx::query("update employees set is_deleted = true, updated_at = ? where id = ?")
            .bind(at.inner())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("delete from employees where id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_string_encoding() {
        for role in [Role::Admin, Role::Manager, Role::SalesPerson] {
            let encoded = role_to_str(&role);
            assert_eq!(role_from_str(encoded).unwrap(), role);
        }
    }

    #[test]
    fn unrecognized_role_string_is_an_error() {
        assert!(role_from_str("owner").is_err());
    }
}
