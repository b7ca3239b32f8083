//! Authentication service.
//!
//! Registration, login, and stateless bearer tokens. Tokens are HS256 JWTs
//! carrying the user ID and role; verification is stateless, but callers are
//! re-fetched from the user table on every request so a deleted user's token
//! stops working immediately.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use swiftcart_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Token lifetime: 7 days.
const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims carried in a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    /// Role at issue time (informational; the role gate re-checks the
    /// user record).
    pub role: Role,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Fields accepted at registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub place: Option<String>,
    pub category: Option<String>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    encoding_key: &'a EncodingKey,
    decoding_key: &'a DecodingKey,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        encoding_key: &'a EncodingKey,
        decoding_key: &'a DecodingKey,
    ) -> Self {
        Self {
            users: UserRepository::new(pool),
            encoding_key,
            decoding_key,
        }
    }

    /// Register a new user and issue a token.
    ///
    /// Role-specific fields are kept only for the roles that use them:
    /// phone for vendors and agents (validated as 10 digits), region for
    /// agents, address/place for vendors.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::InvalidPhone`,
    /// `AuthError::WeakPassword`, or `AuthError::UserAlreadyExists`.
    pub async fn register(&self, reg: Registration) -> Result<(User, String), AuthError> {
        let email = Email::parse(&reg.email)?;
        validate_password(&reg.password)?;

        let phone = if reg.role.requires_phone() {
            let phone = reg.phone.as_deref().unwrap_or_default();
            if !is_valid_phone(phone) {
                return Err(AuthError::InvalidPhone);
            }
            Some(phone.to_owned())
        } else {
            None
        };

        let password_hash = hash_password(&reg.password)?;

        let new_user = NewUser {
            name: reg.name,
            email,
            password_hash,
            role: reg.role,
            phone,
            region: matches!(reg.role, Role::Agent)
                .then_some(reg.region)
                .flatten(),
            address: matches!(reg.role, Role::Vendor)
                .then_some(reg.address)
                .flatten(),
            place: matches!(reg.role, Role::Vendor)
                .then_some(reg.place)
                .flatten(),
            category: matches!(reg.role, Role::Vendor)
                .then_some(reg.category)
                .flatten(),
        };

        let user = self.users.create(new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Login with email and password, issuing a token on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Federated login: find or create a customer account for the email.
    ///
    /// A fresh account gets a random password so it can still be recovered
    /// through the normal reset path later.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or a repository error.
    pub async fn federated_login(
        &self,
        email: &str,
        name: &str,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let user = match self.users.get_by_email(&email).await? {
            Some(user) => user,
            None => {
                let password: String = rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(16)
                    .map(char::from)
                    .collect();

                self.users
                    .create(NewUser {
                        name: name.to_owned(),
                        email,
                        password_hash: hash_password(&password)?,
                        role: Role::Customer,
                        phone: None,
                        region: None,
                        address: None,
                        place: None,
                        category: None,
                    })
                    .await?
            }
        };

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Sign a bearer token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.as_i32(),
            role: user.role,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, self.encoding_key)?)
    }

    /// Verify a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` on any verification failure,
    /// including expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims)
    }

    /// Load the user referenced by a verified token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the user no longer exists.
    pub async fn user_for_claims(&self, claims: &Claims) -> Result<User, AuthError> {
        self.users
            .get_by_id(UserId::new(claims.sub))
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Exactly 10 ASCII digits, the rule for vendor and agent phone numbers.
fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Hash a password with argon2 and a fresh random salt.
///
/// Public because admin user creation and the seeding CLI hash passwords
/// outside the registration flow.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter22!").unwrap();
        assert_ne!(hash, "hunter22!");
        assert!(verify_password("hunter22!", &hash).is_ok());
        assert!(matches!(
            verify_password("hunter23!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("98765432100"));
        assert!(!is_valid_phone("98765x3210"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_token_round_trip() {
        let encoding = EncodingKey::from_secret(b"kP9mQ2vX8nL4jR7tW1bY5cA3dF6gH0sZ");
        let decoding = DecodingKey::from_secret(b"kP9mQ2vX8nL4jR7tW1bY5cA3dF6gH0sZ");

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 42,
            role: Role::Agent,
            iat: now,
            exp: now + 60,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding).unwrap();

        let decoded = decode::<Claims>(&token, &decoding, &Validation::new(Algorithm::HS256))
            .unwrap()
            .claims;
        assert_eq!(decoded.sub, 42);
        assert_eq!(decoded.role, Role::Agent);
    }

    #[test]
    fn test_expired_token_rejected() {
        let encoding = EncodingKey::from_secret(b"kP9mQ2vX8nL4jR7tW1bY5cA3dF6gH0sZ");
        let decoding = DecodingKey::from_secret(b"kP9mQ2vX8nL4jR7tW1bY5cA3dF6gH0sZ");

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 42,
            role: Role::Customer,
            iat: now - 600,
            exp: now - 120,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding).unwrap();

        assert!(decode::<Claims>(&token, &decoding, &Validation::new(Algorithm::HS256)).is_err());
    }
}
