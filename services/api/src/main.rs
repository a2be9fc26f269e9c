use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use api::{
    config::ServerConfig,
    repositories::PgAdRepository,
    routes,
    state::AppState,
};
use auth::{JwtConfig, JwtService, PasswordService, repositories::PgUserRepository};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    api::init_tracing()?;

    info!("Starting marketplace API");

    let server_config = ServerConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let app_state = AppState {
        jwt_service,
        passwords: PasswordService::default(),
        user_repository: Arc::new(PgUserRepository::new(pool.clone())),
        ad_repository: Arc::new(PgAdRepository::new(pool)),
        store_timeout: server_config.store_timeout(),
    };

    let app = routes::create_router(app_state);

    let addr = server_config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Marketplace API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
