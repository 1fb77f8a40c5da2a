use std::{env, net::SocketAddr};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use luka_points::{ExecutionMode, build_router, create_app_state, graceful_shutdown};

/// The REST API server for the Luka Points transfer service.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 5140)]
    port: u16,

    /// Run transfers without the per-account-pair critical section,
    /// reproducing the original best-effort behaviour.
    #[arg(long, default_value_t = false)]
    best_effort_transfers: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let api_token = env::var("LUKA_API_TOKEN").ok();
    if api_token.is_none() {
        tracing::warn!(
            "The environment variable 'LUKA_API_TOKEN' is not set, mutating routes are open"
        );
    }

    let mode = if args.best_effort_transfers {
        ExecutionMode::BestEffort
    } else {
        ExecutionMode::Serialized
    };

    let conn = Connection::open(&args.db_path).expect("Could not open the application database");
    let state = create_app_state(conn, mode, api_token).expect("Could not initialize the database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
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
        // By default, `TraceLayer` will log 5xx responses but we're doing our
        // specific logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
