use idhub_config::NodeRole;
use idhub_db::{LocalUserRepository, SiteRegistrationRepository, SyncStatusRepository};
use idhub_server::app_state::AppState;
use idhub_server::{build_router, logger};
use idhub_sync::{
    HttpHubGateway, HttpNodeGateway, LogNotifier, NodeGateway, RequestAggregator, SqliteJobQueue,
    SyncProducer, SyncWorker,
};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = idhub_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = idhub_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting idhub-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(Duration::from_secs(5)),
        )
        .await?;

    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../crates/idhub-db/migrations")
        .run(&pool)
        .await?;
    info!("Migrations complete");

    // Build the role-specific services
    let mut aggregator = None;
    let mut gateway: Option<Arc<dyn NodeGateway>> = None;
    let mut producer = None;

    match config.node.role {
        NodeRole::Governing => {
            let node_gateway: Arc<dyn NodeGateway> = Arc::new(HttpNodeGateway::new(
                &config.node.site_url,
                Duration::from_secs(config.aggregator.per_node_timeout_secs),
            ));
            aggregator = Some(Arc::new(RequestAggregator::new(
                node_gateway.clone(),
                SiteRegistrationRepository::new(pool.clone()),
                config.aggregator.clone(),
            )));
            gateway = Some(node_gateway);
            info!("Governing node: aggregation over registered brand nodes enabled");
        }
        NodeRole::Brand => {
            let (Some(hub_url), Some(shared_secret)) =
                (config.node.hub_url.as_deref(), config.node.shared_secret.as_deref())
            else {
                unreachable!("validate() ensures hub_url and shared_secret on a brand node")
            };

            let queue = Arc::new(SqliteJobQueue::new(pool.clone()));
            let hub = Arc::new(HttpHubGateway::new(
                hub_url,
                shared_secret,
                &config.node.site_url,
                Duration::from_secs(config.sync.delivery_timeout_secs),
            )?);
            let sync_producer = Arc::new(SyncProducer::new(
                queue.clone(),
                hub,
                SyncStatusRepository::new(pool.clone()),
                Arc::new(LocalUserRepository::new(pool.clone())),
                Arc::new(LogNotifier),
                config.sync.clone(),
                &config.node.site_name,
                &config.node.site_url,
            ));

            // Background delivery of queued sync jobs
            let worker = SyncWorker::new(queue, sync_producer.clone());
            tokio::spawn(worker.run());
            info!("Brand node: sync worker started against {}", hub_url);

            producer = Some(sync_producer);
        }
    }

    // Build application state
    let app_state = AppState {
        pool,
        config: Arc::new(config.clone()),
        aggregator,
        gateway,
        producer,
    };

    // Build router
    let app = build_router(app_state);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Start server with graceful shutdown on SIGINT
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down"),
                Err(e) => error!("Failed to listen for SIGINT: {}", e),
            }
        })
        .await?;

    info!("Graceful shutdown complete");
    Ok(())
}
