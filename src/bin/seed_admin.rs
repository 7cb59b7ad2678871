// src/bin/seed_admin.rs
// DOCUMENTATION: Create the super admin account
// PURPOSE: One-shot setup run after migrations, safe to repeat

use anyhow::{bail, Context, Result};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use dotenv::dotenv;
use rand_core::OsRng;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Duration;

fn required(key: &str) -> Result<String> {
    let value = env::var(key).with_context(|| format!("{} is not set", key))?;
    if value.trim().is_empty() {
        bail!("{} is empty", key);
    }
    Ok(value)
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let database_url = required("DATABASE_URL")?;
    let email = required("SUPER_ADMIN_EMAIL")?;
    let password = required("SUPER_ADMIN_PASSWORD")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let admins: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'ADMIN' AND NOT is_deleted")
            .fetch_one(&pool)
            .await?;
    if admins > 0 {
        log::info!("An admin already exists, nothing to do");
        return Ok(());
    }

    let hash = hash_password(&password)?;
    let id: uuid::Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (full_name, email, password, role, status, is_email_verified)
        VALUES ('Super Admin', $1, $2, 'ADMIN', 'ACTIVE', TRUE)
        ON CONFLICT (email) DO UPDATE
            SET role = 'ADMIN', status = 'ACTIVE', is_email_verified = TRUE,
                is_deleted = FALSE, password = EXCLUDED.password, updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(email.trim())
    .bind(&hash)
    .fetch_one(&pool)
    .await
    .context("Failed to create super admin")?;

    log::info!("Super admin {} ready ({})", email, id);
    Ok(())
}
