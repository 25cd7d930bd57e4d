use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, filter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use splitwithme::{
    AppState, build_router, graceful_shutdown, logging_middleware, seed_if_empty,
};

/// The REST API server for splitting expenses with friends.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "expenses.db")]
    db_path: String,

    /// The address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: String,

    /// Do not add the sample friends and expenses to an empty database.
    #[arg(long)]
    skip_seed: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let state = match AppState::new(connection) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize database: {error}");
            exit(1);
        }
    };

    if !args.skip_seed {
        seed_database(&state);
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = SocketAddr::new(args.host, args.port);
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn seed_database(state: &AppState) {
    let Ok(connection) = state.db_connection.lock() else {
        tracing::error!("Could not acquire database lock for seeding");
        exit(1);
    };

    match seed_if_empty(&connection) {
        Ok(true) => tracing::info!("Added sample friends and expenses to the empty database"),
        Ok(false) => tracing::debug!("Database already has friends, skipping sample data"),
        Err(error) => {
            tracing::error!("Could not add sample data: {error}");
            exit(1);
        }
    }
}

fn setup_logging(log_path: &str) {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Server errors are already logged where they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
