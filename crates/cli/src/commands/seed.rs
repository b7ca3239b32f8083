//! Seed the database with demo accounts and products.
//!
//! Intended for local development and the integration-test environment.
//! Inserts are idempotent: existing emails are left untouched and their
//! products are not duplicated.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use swiftcart_core::Role;

use super::CommandError;

/// Every seeded account logs in with this password.
const SEED_PASSWORD: &str = "password123";

struct SeedUser {
    name: &'static str,
    email: &'static str,
    role: Role,
    phone: Option<&'static str>,
    region: Option<&'static str>,
    address: Option<&'static str>,
    place: Option<&'static str>,
    category: Option<&'static str>,
}

struct SeedProduct {
    vendor_email: &'static str,
    name: &'static str,
    price: Decimal,
    stock: i32,
    category: &'static str,
    description: &'static str,
}

const USERS: &[SeedUser] = &[
    SeedUser {
        name: "Demo Customer",
        email: "customer@swiftcart.dev",
        role: Role::Customer,
        phone: None,
        region: None,
        address: None,
        place: None,
        category: None,
    },
    SeedUser {
        name: "Demo Vendor",
        email: "vendor@swiftcart.dev",
        role: Role::Vendor,
        phone: Some("9876543210"),
        region: None,
        address: Some("12 Market Road"),
        place: Some("Chennai"),
        category: Some("Groceries"),
    },
    SeedUser {
        name: "Demo Agent",
        email: "agent@swiftcart.dev",
        role: Role::Agent,
        phone: Some("9123456780"),
        region: Some("South"),
        address: None,
        place: None,
        category: None,
    },
];

fn products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            vendor_email: "vendor@swiftcart.dev",
            name: "Basmati Rice 5kg",
            price: Decimal::new(64900, 2),
            stock: 40,
            category: "Groceries",
            description: "Long-grain aged basmati rice.",
        },
        SeedProduct {
            vendor_email: "vendor@swiftcart.dev",
            name: "Cold-Pressed Coconut Oil 1L",
            price: Decimal::new(38500, 2),
            stock: 25,
            category: "Groceries",
            description: "Single-origin cold-pressed coconut oil.",
        },
        SeedProduct {
            vendor_email: "vendor@swiftcart.dev",
            name: "Assam Tea 250g",
            price: Decimal::new(19900, 2),
            stock: 60,
            category: "Beverages",
            description: "Strong whole-leaf Assam black tea.",
        },
    ]
}

/// Seed demo users and products.
///
/// # Errors
///
/// Returns `CommandError` if the environment is incomplete, hashing fails,
/// or any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let password_hash = super::hash_password(SEED_PASSWORD)?;

    let mut users_inserted = 0;
    for user in USERS {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, phone, region, address, place, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(&password_hash)
        .bind(user.role)
        .bind(user.phone)
        .bind(user.region)
        .bind(user.address)
        .bind(user.place)
        .bind(user.category)
        .execute(&pool)
        .await?;
        users_inserted += result.rows_affected();
    }

    let mut products_inserted = 0;
    for product in products() {
        products_inserted += insert_product(&pool, &product).await?;
    }

    info!(users_inserted, products_inserted, "Seeding complete");
    Ok(())
}

async fn insert_product(pool: &PgPool, product: &SeedProduct) -> Result<u64, CommandError> {
    let result = sqlx::query(
        "INSERT INTO products (vendor_id, name, price, stock, category, description)
         SELECT u.id, $2, $3, $4, $5, $6
         FROM users u
         WHERE u.email = $1
           AND NOT EXISTS (
               SELECT 1 FROM products p WHERE p.vendor_id = u.id AND p.name = $2
           )",
    )
    .bind(product.vendor_email)
    .bind(product.name)
    .bind(product.price)
    .bind(product.stock)
    .bind(product.category)
    .bind(product.description)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_roster_covers_the_registerable_roles() {
        let roles: Vec<Role> = USERS.iter().map(|u| u.role).collect();
        assert_eq!(roles, vec![Role::Customer, Role::Vendor, Role::Agent]);
    }

    #[test]
    fn test_seed_users_satisfy_role_field_rules() {
        for user in USERS {
            if user.role.requires_phone() {
                assert!(user.phone.is_some(), "{} needs a phone", user.email);
            }
            if user.role == Role::Agent {
                assert!(user.region.is_some(), "{} needs a region", user.email);
            }
        }
    }

    #[test]
    fn test_seed_products_belong_to_a_seeded_vendor() {
        for product in products() {
            assert!(
                USERS
                    .iter()
                    .any(|u| u.role == Role::Vendor && u.email == product.vendor_email),
                "{} has no seeded vendor",
                product.name
            );
        }
    }
}
