//! Antivirus API - organization directory and quarantine buildings.
//!
//! This binary loads configuration, connects to the database and starts the
//! HTTP server.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use antivirus_api::{
    config::Config,
    directory::DirectoryService,
    server::{create_router, RouterConfig, StaticCredentials},
    store::{DirectoryStore, MySqlStore},
    StoreError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("antivirus-api v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Database: {}", config.database_target());
    info!(
        "  Pool: {} connections, {}s query timeout",
        config.max_connections, config.query_timeout_secs
    );
    let redacted: Vec<String> = config
        .redaction_policy()
        .fields()
        .map(|f| f.to_string())
        .collect();
    info!("  Redacted when contact hidden: [{}]", redacted.join(", "));
    if config.cors_credentialed_origins.is_empty() {
        info!("  CORS: any origin, no credentials");
    } else {
        info!(
            "  CORS: any origin, credentials for {}",
            config.cors_credentialed_origins.join(", ")
        );
    }

    info!("Connecting to database...");
    let store = match connect_store(&config).await {
        Ok(store) => {
            info!("  Connected successfully");
            store
        }
        Err(e) => {
            error!("  Failed to connect to database: {}", e);
            error!("  Please check:");
            error!("    - CLOUDSQL_CONNECTION_NAME and CLOUDSQL_SOCKET_PREFIX point at a live socket");
            error!("    - CLOUDSQL_USER / CLOUDSQL_PASSWORD are correct");
            error!("    - The '{}' database exists", config.db_name);
            return ExitCode::FAILURE;
        }
    };

    let directory = DirectoryService::with_redaction(store, config.redaction_policy());
    let router = create_router(directory, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Open the pool and confirm the database answers.
async fn connect_store(config: &Config) -> Result<MySqlStore, StoreError> {
    let options = match &config.database_url {
        Some(url) => {
            warn!("  Using DATABASE_URL; Cloud SQL socket settings are ignored");
            MySqlStore::url_options(url)?
        }
        None => MySqlStore::socket_options(
            &config.socket_prefix,
            config.connection_name.as_deref().unwrap_or_default(),
            config.db_user.as_deref().unwrap_or_default(),
            &config.db_password,
            &config.db_name,
        ),
    };

    let store = MySqlStore::connect(options, config.max_connections, config.query_timeout()).await?;
    store.ping().await?;
    Ok(store)
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "antivirus_api=debug,tower_http=debug"
    } else {
        "antivirus_api=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    RouterConfig::new(StaticCredentials::new(
        &config.admin_user,
        &config.admin_password,
    ))
    .with_auth_realm(config.auth_realm.clone())
    .with_credentialed_origins(config.cors_credentialed_origins.clone())
    .with_tracing(!config.no_tracing)
}
