//! User repository for database operations.

use sqlx::PgPool;

use swiftcart_core::{Email, Role, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, name, email, role, phone, region, address, place, category, created_at, updated_at";

/// Fields for creating a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub place: Option<String>,
    pub category: Option<String>,
}

/// Partial update for admin-managed user records. `None` keeps the column.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub place: Option<String>,
    pub category: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user and their password hash by email, for login verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserWithHash>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role, phone, region, address, place, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.role)
            .bind(&new_user.phone)
            .bind(&new_user.region)
            .bind(&new_user.address)
            .bind(&new_user.place)
            .bind(&new_user.category)
            .fetch_one(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "User already exists"))?;
        Ok(user)
    }

    /// Partially update a user, expecting them to have the given role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user with that ID and role
    /// exists. Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: UserId,
        role: Role,
        update: UserUpdate,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "UPDATE users
             SET name = COALESCE($3, name),
                 phone = COALESCE($4, phone),
                 region = COALESCE($5, region),
                 address = COALESCE($6, address),
                 place = COALESCE($7, place),
                 category = COALESCE($8, category),
                 updated_at = now()
             WHERE id = $1 AND role = $2
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(role)
            .bind(&update.name)
            .bind(&update.phone)
            .bind(&update.region)
            .bind(&update.address)
            .bind(&update.place)
            .bind(&update.category)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a user, expecting them to have the given role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no matching user exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId, role: Role) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(id)
            .bind(role)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List users, optionally filtered by role, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, role: Option<Role>) -> Result<Vec<User>, RepositoryError> {
        let users = match role {
            Some(role) => {
                let sql = format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, User>(&sql)
                    .bind(role)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
                sqlx::query_as::<_, User>(&sql).fetch_all(self.pool).await?
            }
        };
        Ok(users)
    }

    /// Pick the agent that checkout assigns deliveries to.
    ///
    /// Deliberately the first agent on record (lowest ID): there is no load
    /// balancing, region matching, or availability check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first_agent(&self) -> Result<Option<User>, RepositoryError> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY id LIMIT 1");
        let agent = sqlx::query_as::<_, User>(&sql)
            .bind(Role::Agent)
            .fetch_optional(self.pool)
            .await?;
        Ok(agent)
    }
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}
