use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_name VARCHAR(255) NOT NULL,
            customer_email VARCHAR(255) NULL,
            customer_phone VARCHAR(64) NULL,
            vehicle VARCHAR(255) NOT NULL,
            service_name VARCHAR(255) NOT NULL,
            scheduled_at TIMESTAMP NOT NULL,
            duration_minutes INTEGER NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'PENDING',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create settings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key VARCHAR(128) PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query since prepared statements reject batches
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_bookings_scheduled_at ON bookings(scheduled_at)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
