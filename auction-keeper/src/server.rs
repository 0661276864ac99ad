use {
    crate::{
        auction::{
            entities::ExpirationInterval,
            repository::InMemoryDatabase,
            service::{
                self,
                workers::run_expiration_loop,
                Service,
            },
        },
        config::RunOptions,
        kernel::db::DB,
        per_metrics::{
            setup_metrics_recorder,
            start_metrics,
        },
    },
    anyhow::anyhow,
    futures::future::join_all,
    sqlx::postgres::PgPoolOptions,
    std::{
        sync::atomic::{
            AtomicBool,
            Ordering,
        },
        time::Duration,
    },
};

const DB_MAX_CONNECTIONS: u32 = 10;

async fn connect_database(database_url: &str) -> anyhow::Result<DB> {
    let pool = PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(|err| anyhow!("Failed to connect to database: {:?}", err))?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|err| anyhow!("Failed to run migrations: {:?}", err))?;
    Ok(pool)
}

pub async fn start_server(run_options: RunOptions) -> anyhow::Result<()> {
    tokio::spawn(async move {
        tracing::info!("Registered shutdown signal handler...");
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "Failed to listen for the shut down signal");
        }
        tracing::info!("Shut down signal received, waiting for tasks...");
        SHOULD_EXIT.store(true, Ordering::Release);
    });

    let metrics_recorder = setup_metrics_recorder()?;

    let config = service::Config {
        expiration_interval:    ExpirationInterval::from_config(
            run_options.expiration.auction_interval.as_deref(),
        ),
        max_concurrent_updates: run_options.expiration.max_concurrent_updates,
    };
    let service = match run_options.server.database_url.as_deref() {
        Some(database_url) => Service::new(connect_database(database_url).await?, config),
        None => {
            tracing::warn!("No database url configured, auctions are kept in memory");
            Service::new(InMemoryDatabase::new(), config)
        }
    };

    let expiration_loop = tokio::spawn(run_expiration_loop(
        service,
        run_options.expiration.sweep_interval,
    ));
    let metrics_loop = tokio::spawn(start_metrics(run_options, metrics_recorder));
    for result in join_all(vec![expiration_loop, metrics_loop]).await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(error = ?err, "Task exited with an error"),
            Err(err) => tracing::error!(error = ?err, "Task panicked"),
        }
    }
    Ok(())
}

// A static exit flag to indicate to running tasks that we're shutting down. This is used to
// gracefully shutdown the application.
pub(crate) static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);
pub const EXIT_CHECK_INTERVAL: Duration = Duration::from_secs(1);
