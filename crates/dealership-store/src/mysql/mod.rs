//! MySQL-backed store gateways, used by the Employee service's own employee
//! replica (the Employee service's catalog tables — brands, models, colors,
//! insurances, customers, cars, purchases — sit in the same relational
//! store, per spec §1, but only the employee replica needs a reconciler
//! gateway on this side; insurance/model are authoritative here, not
//! replicated in).
//!
//! Connection setup mirrors `mqk-db::connect_from_env`: `anyhow::Context` on
//! every fallible step, a bounded-size connection pool.

mod employee;

pub use employee::MySqlEmployeeStore;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

/// Connect to the relational store using the `MYSQL_DB_*` environment
/// variables (spec §6.2), already resolved into a DSN by
/// `dealership-config`.
pub async fn connect(dsn: &str) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(dsn)
        .await
        .context("failed to connect to the relational store")
}

/// Create the `employees` replica table if it does not already exist.
/// Real schema migration is out of scope (spec §1); this is the minimal
/// bootstrap a fresh Employee-service instance needs to start consuming.
pub async fn ensure_employee_table(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        create table if not exists employees (
            id char(36) primary key,
            email varchar(255) not null unique,
            hashed_password varchar(255) not null,
            first_name varchar(255) not null,
            last_name varchar(255) not null,
            role varchar(32) not null,
            is_deleted boolean not null default false,
            created_at datetime not null,
            updated_at datetime not null
        )
        "#,
    )
    .execute(pool)
    .await
    .context("ensure_employee_table failed")?;
    Ok(())
}
