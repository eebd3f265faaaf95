use barbershop_booking_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

// (name, price in cents, duration in minutes)
const SERVICES: [(&str, i64, i32); 5] = [
    ("Corte Masculino", 4000, 40),
    ("Barba", 2500, 20),
    ("Combo Corte + Barba", 6000, 30),
    ("Pezinho", 1500, 15),
    ("Sobrancelha", 1500, 10),
];

const BARBERS: [&str; 3] = ["Rafael", "Bruno", "Diego"];

// (name, price in cents, discount percent, months)
const PLANS: [(&str, i64, i32, i32); 2] = [("Mensal", 9900, 10, 1), ("Trimestral", 26900, 15, 3)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;
    let services = seed_services(&pool).await?;
    let barbers = seed_barbers(&pool).await?;
    let plans = seed_plans(&pool).await?;

    tracing::info!(services, barbers, plans, "seed completed");
    Ok(())
}

async fn seed_services(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for (name, price, duration) in SERVICES {
        inserted += sqlx::query(
            r#"
            INSERT INTO services (id, name, price, duration_minutes)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(price)
        .bind(duration)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

async fn seed_barbers(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for name in BARBERS {
        inserted += sqlx::query(
            r#"
            INSERT INTO barbers (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

async fn seed_plans(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for (name, price, discount, months) in PLANS {
        inserted += sqlx::query(
            r#"
            INSERT INTO plans (id, name, price, discount_percent, duration_months)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(price)
        .bind(discount)
        .bind(months)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}
