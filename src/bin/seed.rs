use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use catalog_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
};

const CATEGORIES: &[&str] = &["Electronics", "Books", "Home"];

const PRODUCTS: &[(&str, &[&str])] = &[
    ("Laptop", &["Electronics"]),
    ("Headphones", &["Electronics"]),
    ("The Rust Book", &["Books"]),
    ("Desk Lamp", &["Home", "Electronics"]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&pool).await?;

    let user_id = ensure_user(&pool, "demo@example.com", "demo123").await?;
    seed_categories(&pool).await?;
    seed_products(&pool).await?;

    println!("Seed completed. Demo user ID: {user_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<i64> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_categories(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for name in CATEGORIES {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(pool)
            .await?;
    }

    println!("Seeded categories");
    Ok(())
}

// Product names are not unique, so re-runs skip names that already exist.
async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for (name, categories) in PRODUCTS {
        let mut tx = pool.begin().await?;

        let inserted: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO products (name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((product_id,)) = inserted else {
            continue;
        };

        for category in *categories {
            sqlx::query(
                r#"
                INSERT INTO product_category (product_id, category_id)
                SELECT $1, id FROM categories WHERE name = $2
                "#,
            )
            .bind(product_id)
            .bind(category)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
    }

    println!("Seeded products");
    Ok(())
}
