//! Integration tests for the infrastructure components
//!
//! These tests verify that PostgreSQL is reachable and that the embedded
//! migrations produce the tables the repositories query.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Running twice must be a no-op
    run_migrations(&pool).await?;

    let row = sqlx::query(
        "SELECT COUNT(*) AS tables FROM information_schema.tables \
         WHERE table_name IN ('users', 'ads')",
    )
    .fetch_one(&pool)
    .await?;

    let tables: i64 = row.get("tables");
    assert_eq!(tables, 2, "users and ads tables should exist");

    Ok(())
}
