use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use paydesk::{
    AppState, build_router, get_local_offset, graceful_shutdown, logging_middleware,
    payment::{
        HttpPaymentSource, JsonFilePaymentSource, PaymentQuery, PaymentSource,
        SamplePaymentSource, fetch_or_sample, sample_payments,
    },
};

/// The payments dashboard server for paydesk.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a JSON array of payment records.
    #[arg(long, conflicts_with = "source_url")]
    payments: Option<PathBuf>,

    /// URL of a REST endpoint that returns a JSON array of payment records.
    #[arg(long)]
    source_url: Option<String>,

    /// The canonical timezone name used for "now", e.g. "Europe/Lisbon".
    #[arg(long, default_value = "Europe/Lisbon")]
    timezone: String,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

impl Args {
    fn payment_source(&self) -> Box<dyn PaymentSource + Send> {
        match (&self.payments, &self.source_url) {
            (Some(path), _) => Box::new(JsonFilePaymentSource::new(path)),
            (None, Some(url)) => Box::new(HttpPaymentSource::new(url)),
            (None, None) => Box::new(SamplePaymentSource),
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!(
            "\"{}\" is not a valid canonical timezone name, e.g. \"Europe/Lisbon\"",
            args.timezone
        );
        return;
    }

    let source = args.payment_source();
    let payments = tokio::task::spawn_blocking(move || {
        fetch_or_sample(source.as_ref(), &PaymentQuery::default())
    })
    .await
    .unwrap_or_else(|error| {
        tracing::error!("could not load payments, using sample data instead: {error}");
        sample_payments()
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let state = AppState::new(payments, &args.timezone);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("server stopped with an error: {error}");
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let debug_log = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
    {
        Ok(log_file) => Some(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(Arc::new(log_file))
                .with_filter(filter::LevelFilter::DEBUG),
        ),
        Err(error) => {
            eprintln!("Could not create log file, logging to stdout only: {error}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter::LevelFilter::INFO))
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
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
