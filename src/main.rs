use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, filter::LevelFilter};

mod api;
mod cli;
mod config;
mod db;
mod shutdown;

use crate::api::{
    application::{handlers::application_config, ApplicationService},
    auth::{handlers::auth_config, IdentityVerifier},
    feedback::{handlers::feedback_config, FeedbackService},
    health::health_config,
    job::{handlers::job_config, JobService},
    validation,
};
use crate::db::kv::{KeyValueStore, PgKvStore};
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = cli::Cli::parse();

    // Load configuration from environment
    let config = config::Config::from_env().expect("Failed to load configuration");

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");

    // Initialize file-based logging with daily rotation and level separation
    // Log files will be created as: logs/info.2025-08-06.log, logs/error.2025-08-06.log, etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Create daily rotating file appenders for each log level
    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&config.log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(&config.log_dir, "debug.log");

    // Create layers for each log level
    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    // Create console/stdout layer for terminal output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    // Initialize the subscriber with all layers (including console)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    // Get database connection pool
    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .expect("Failed to connect to database");

    if let Some(cli::Command::Migrate) = cli.command {
        db::migrations::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        pool.close().await;
        return Ok(());
    }

    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}:{}", config.host, config.port);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Token TTL: {} hours", config.token_ttl_hours);
    info!("  - Job deactivation enabled: {}", config.enable_job_deactivation);
    info!("Database connection pool established");

    // Run migrations on startup (auto-migrate when starting server)
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Every repository call goes through the key-value substrate
    let store: Arc<dyn KeyValueStore> = Arc::new(PgKvStore::new(pool.clone()));

    // Clone pool and config for the HTTP server closure (the outer
    // handles are used for shutdown and binding)
    let server_pool = pool.clone();
    let server_config = config.clone();

    let server = HttpServer::new(move || {
        // Entity services share the same store handle
        let job_service = web::Data::new(JobService::new(store.clone()));
        let application_service = web::Data::new(ApplicationService::new(store.clone()));
        let feedback_service = web::Data::new(FeedbackService::new(store.clone()));
        let identity = web::Data::new(IdentityVerifier::new(
            store.clone(),
            server_config.token_ttl_hours,
        ));

        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(server_config.max_payload_size);

        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(web::Data::new(server_config.clone()))
            .app_data(job_service)
            .app_data(application_service)
            .app_data(feedback_service)
            .app_data(identity)
            .app_data(payload_config) // Global payload size limit
            .app_data(validation::json_config()) // Global validation config
            .configure(health_config) // Health check endpoints
            .configure(auth_config)
            .configure(job_config)
            .configure(application_config)
            .configure(feedback_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    // Bind and start the server
    let server = server.bind((config.host.as_str(), config.port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    // Create shutdown coordinator and wait for shutdown signal
    let coordinator = ShutdownCoordinator::new(server_handle, server_task, pool);

    coordinator.wait_for_shutdown().await
}
