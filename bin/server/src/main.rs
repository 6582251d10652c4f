use devops_credentials_access::ProjectAuthorizer;
use devops_credentials_core::Result;
use devops_credentials_jenkins::JenkinsClient;
use devops_credentials_server::{
    AppState, ServerConfig, StartupError,
    db::{MembershipRepository, ProjectCredentialRepository},
    router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(report) = run().await {
        tracing::error!(error = %report, "server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // Load configuration from environment
    let config = ServerConfig::from_env().map_err(|e| StartupError::Configuration {
        details: e.to_string(),
    })?;
    tracing::info!(jenkins = %config.jenkins.address(), "Loaded configuration");

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| StartupError::Database {
            details: e.to_string(),
        })?;

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| StartupError::Database {
            details: e.to_string(),
        })?;

    let jenkins = JenkinsClient::new(&config.jenkins).map_err(|e| StartupError::Jenkins {
        details: e.to_string(),
    })?;

    let app_state = Arc::new(AppState::new(
        Arc::new(jenkins),
        Arc::new(ProjectCredentialRepository::new(db_pool.clone())),
        ProjectAuthorizer::new(Arc::new(MembershipRepository::new(db_pool))),
    ));

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| StartupError::Listener {
            addr: config.listen_addr.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Listener {
            addr: config.listen_addr.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
