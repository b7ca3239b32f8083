//! Admin user bootstrap.
//!
//! There is no registration path for admins; the first (and usually only)
//! admin account is created here.

use tracing::info;

use swiftcart_core::Role;

use super::CommandError;

/// Create an admin user with the given credentials.
///
/// # Errors
///
/// Returns `CommandError` if the environment is incomplete, hashing fails,
/// or the insert fails (including duplicate email).
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let password_hash = super::hash_password(password)?;

    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(name)
    .bind(email.trim().to_lowercase())
    .bind(&password_hash)
    .bind(Role::Admin)
    .fetch_one(&pool)
    .await?;

    info!(id, email, "Admin user created");
    Ok(())
}
