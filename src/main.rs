//! CLI entry point for the WMATA client.
//!
//! Provides subcommands for rail predictions, incidents, bus positions and
//! the GTFS-realtime feeds.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use wmata::endpoints::{BusPositions, GtfsFeed, NextTrains, RailIncidents};
use wmata::output::{append_record, print_json};
use wmata::summary::FeedSummary;
use wmata::types::StationCode;
use wmata::{BackgroundSession, Client, ClientConfig};

#[derive(Parser)]
#[command(name = "wmata")]
#[command(about = "Query the WMATA rail, bus and GTFS-realtime APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Next train arrivals for the given stations (all stations when empty)
    NextTrains {
        #[arg(value_name = "STATION_CODE")]
        stations: Vec<StationCode>,
    },
    /// Current rail incidents
    Incidents,
    /// Live bus positions
    BusPositions {
        /// Only show buses on this route (e.g. "70")
        #[arg(short, long)]
        route: Option<String>,
    },
    /// Download a GTFS-realtime feed and summarize it
    Feed {
        #[arg(value_enum)]
        system: System,

        #[arg(value_enum)]
        kind: FeedKind,

        /// CSV file to append the summary to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum System {
    Rail,
    Bus,
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedKind {
    TripUpdates,
    VehiclePositions,
    Alerts,
}

fn gtfs_feed(system: System, kind: FeedKind) -> GtfsFeed {
    match (system, kind) {
        (System::Rail, FeedKind::TripUpdates) => GtfsFeed::RailTripUpdates,
        (System::Rail, FeedKind::VehiclePositions) => GtfsFeed::RailVehiclePositions,
        (System::Rail, FeedKind::Alerts) => GtfsFeed::RailAlerts,
        (System::Bus, FeedKind::TripUpdates) => GtfsFeed::BusTripUpdates,
        (System::Bus, FeedKind::VehiclePositions) => GtfsFeed::BusVehiclePositions,
        (System::Bus, FeedKind::Alerts) => GtfsFeed::BusAlerts,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/wmata.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("wmata.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    let client = Client::new(config)?;

    match cli.command {
        Commands::NextTrains { stations } => {
            let predictions = client.request(NextTrains { stations }).await?;
            info!(count = predictions.trains.len(), "Predictions received");
            print_json(&predictions)?;
        }
        Commands::Incidents => {
            let incidents = client.request(RailIncidents).await?;
            info!(count = incidents.incidents.len(), "Incidents received");
            print_json(&incidents)?;
        }
        Commands::BusPositions { route } => {
            let positions = client
                .request(BusPositions {
                    route,
                    radius: None,
                })
                .await?;
            info!(count = positions.bus_positions.len(), "Bus positions received");
            print_json(&positions)?;
        }
        Commands::Feed {
            system,
            kind,
            output,
        } => {
            feed(&client, gtfs_feed(system, kind), output.as_deref()).await?;
        }
    }

    Ok(())
}

/// Downloads a feed through a background session and logs its summary.
#[tracing::instrument(skip(client, feed), fields(feed = feed.file_name()))]
async fn feed(client: &Client, feed: GtfsFeed, output: Option<&Path>) -> Result<()> {
    let session = BackgroundSession::new(client)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let task = session.download(feed, tx);

    let Some(delivery) = rx.recv().await else {
        bail!("background task {task} finished without a result");
    };

    let summary = match delivery.result {
        Ok(message) => FeedSummary::from_feed(&message),
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "Feed download failed");
            FeedSummary::from_error(&e)
        }
    }
    .with_feed(feed.file_name());

    print_json(&summary)?;

    if let Some(path) = output {
        append_record(path, &summary)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    if let Some(message) = &summary.error_message {
        bail!("{message}");
    }
    Ok(())
}
