//! Server entry-point: wires the REST endpoints to the persistence stack.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use identity_server::ApiDoc;
use identity_server::config::AppConfig;
use identity_server::domain::IdentityService;
use identity_server::inbound::http::health::{HealthState, live, ready};
use identity_server::inbound::http::state::HttpState;
use identity_server::inbound::http::users::{get_user, register_user};
use identity_server::outbound::hashing::BcryptCredentialHasher;
use identity_server::outbound::persistence::{DbPool, DieselIdentityStore, PoolConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool_config = PoolConfig::new(&config.database_url)
        .with_max_size(config.pool_max_size)
        .with_min_idle(Some(config.pool_min_idle))
        .with_connection_timeout(config.pool_connect_timeout)
        .with_idle_timeout(config.pool_idle_timeout)
        .with_max_lifetime(config.pool_max_lifetime);
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    pool.ping().await.map_err(std::io::Error::other)?;

    run_migrations(config.database_url.clone()).await?;

    let store = DieselIdentityStore::new(pool, config.request_deadline);
    let identity = IdentityService::new(Arc::new(store), Arc::new(BcryptCredentialHasher::new()));
    let state = HttpState::new(identity);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .service(
                web::scope("/api/v1")
                    .service(register_user)
                    .service(get_user),
            )
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(("0.0.0.0", config.listen_port))?;

    health_state.mark_ready();
    info!(port = config.listen_port, "identity server listening");
    server.run().await
}

/// Apply pending migrations before the listener binds.
///
/// Diesel's migration harness is synchronous, so the work runs on the
/// blocking pool over a dedicated connection.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("connect for migrations: {err}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| std::io::Error::other(format!("run migrations: {err}")))
    })
    .await
    .map_err(std::io::Error::other)?
}
