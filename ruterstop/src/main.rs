use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use ruterstop::cache::{CacheConfig, CachedEnturClient};
use ruterstop::clock::SystemClock;
use ruterstop::domain::Direction;
use ruterstop::entur::{EnturClient, EnturConfig, MockEnturClient, StopFetcher, parse_stops};
use ruterstop::pipeline::{DEFAULT_LONG_ETA_MINS, DepartureOptions};
use ruterstop::web::{AppState, create_router};

type BoxError = Box<dyn std::error::Error>;

/// Realtime departures for a public transport stop in Norway.
///
/// Data comes from the Entur JourneyPlanner API. Upstream calls are cached,
/// which matters mostly in `--server` mode.
#[derive(Parser, Debug)]
#[command(name = "ruterstop")]
#[command(version)]
struct Args {
    /// Search for a stop by name
    #[arg(long, value_name = "name")]
    search_stop: Option<String>,

    /// Stop to show; find ids with --search-stop or https://stoppested.entur.org
    #[arg(long, value_name = "id")]
    stop_id: Option<u32>,

    /// Filter direction of departures (inbound or outbound)
    #[arg(long)]
    direction: Option<Direction>,

    /// Minimum ETA of departures to return
    #[arg(long, value_name = "minutes", default_value_t = 0, allow_negative_numbers = true)]
    min_eta: i64,

    /// Show departure time when ETA is later than this limit (disable with -1)
    #[arg(
        long,
        value_name = "minutes",
        default_value_t = DEFAULT_LONG_ETA_MINS,
        allow_negative_numbers = true
    )]
    long_eta: i64,

    /// Group departures with same ETA together when --direction is also specified
    #[arg(long)]
    grouped: bool,

    /// Start an HTTP server
    #[arg(long)]
    server: bool,

    /// HTTP server hostname
    #[arg(long, value_name = "ip|hostname", default_value = "0.0.0.0", env = "RUTERSTOP_HOST")]
    host: String,

    /// HTTP server listen port
    #[arg(long, value_name = "port", default_value_t = 4000, env = "RUTERSTOP_PORT")]
    port: u16,

    /// Override the JourneyPlanner GraphQL endpoint
    #[arg(long, value_name = "url", env = "RUTERSTOP_ENTUR_URL")]
    entur_url: Option<String>,

    /// Serve stop data from `<id>.json` files in this directory instead of the API
    #[arg(long, value_name = "dir")]
    mock_data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn departure_options(&self) -> DepartureOptions {
        DepartureOptions {
            directions: self.direction.map(|d| vec![d]),
            min_eta_mins: self.min_eta,
            long_eta_mins: self.long_eta,
            grouped: self.grouped,
        }
    }

    /// Reject flag combinations that cannot do anything, before any network access.
    fn validate(&self) -> Result<(), clap::Error> {
        if !self.server && self.search_stop.is_none() && self.stop_id.is_none() {
            return Err(Args::command().error(
                ErrorKind::MissingRequiredArgument,
                "--stop-id is required when not in server mode",
            ));
        }
        Ok(())
    }

    fn entur_config(&self) -> EnturConfig {
        let config = EnturConfig::default();
        match &self.entur_url {
            Some(url) => config.with_journey_planner_url(url),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        e.exit();
    }

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.debug, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` directives, or `info` without them; `--debug` raises the
/// global level on top.
fn log_filter(debug: bool, directives: Option<&str>) -> EnvFilter {
    let filter = directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    if debug {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

async fn run(args: Args) -> Result<ExitCode, BoxError> {
    if let Some(name) = &args.search_stop {
        let client = EnturClient::new(args.entur_config())?;
        let result = client.search_stops(name).await?;
        for stop in parse_stops(&result) {
            println!("{stop}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    match &args.mock_data {
        Some(dir) => {
            let fetcher = MockEnturClient::new(dir)?;
            info!(stops = fetcher.len(), "Using mock stop data");
            show_departures(fetcher, &args).await
        }
        None => {
            let fetcher = EnturClient::new(args.entur_config())?;
            show_departures(fetcher, &args).await
        }
    }
}

async fn show_departures<F: StopFetcher>(fetcher: F, args: &Args) -> Result<ExitCode, BoxError> {
    let entur = CachedEnturClient::new(fetcher, &CacheConfig::default(), Arc::new(SystemClock));
    let options = args.departure_options();

    if args.server {
        let app = create_router(AppState::new(entur, options));
        let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
        info!(addr = %listener.local_addr()?, "Serving departures");
        axum::serve(listener, app).await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Guaranteed by `Args::validate`.
    let Some(stop_id) = args.stop_id else {
        return Ok(ExitCode::FAILURE);
    };

    match entur.render_departures(stop_id, &options).await? {
        Some(board) => {
            print!("{board}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Ugyldig stoppested: {stop_id}");
            Ok(ExitCode::FAILURE)
        }
    }
}
