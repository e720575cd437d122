//! Medialink - web-rendered media link fetcher
//!
//! Serves a small page that resolves a video URL to a direct media link with
//! metadata via yt-dlp, or runs a keyword search against the same service.

use anyhow::Result;
use clap::Parser;
use medialink::extractor::YtDlpExtractor;
use medialink::utils::AppSettings;
use medialink::web::{self, AppState};
use medialink::RetryPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "medialink", about = "Fetch direct media links and metadata via yt-dlp")]
struct Args {
    /// Port to serve the web surface on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Explicit path to the yt-dlp binary (discovered when omitted)
    #[arg(long)]
    ytdlp_path: Option<PathBuf>,

    /// Number of entries requested from a search
    #[arg(long, default_value_t = 10)]
    search_limit: usize,

    /// Cap on the buffered download payload in MiB; 0 means unbounded
    #[arg(long, default_value_t = 256)]
    max_payload_mib: u64,

    /// Attempts for transient extraction failures
    #[arg(long, default_value_t = 3)]
    retry_attempts: usize,

    /// Fixed pause between retry attempts, in seconds
    #[arg(long, default_value_t = 5)]
    retry_delay_secs: u64,
}

impl Args {
    fn settings(&self) -> AppSettings {
        AppSettings {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], self.port)),
            ytdlp_path: self.ytdlp_path.clone(),
            search_limit: self.search_limit,
            max_payload_bytes: match self.max_payload_mib {
                0 => None,
                mib => Some(mib * 1024 * 1024),
            },
            retry: RetryPolicy {
                max_attempts: self.retry_attempts,
                delay: Duration::from_secs(self.retry_delay_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = args.settings();

    let extractor = match &settings.ytdlp_path {
        Some(path) => YtDlpExtractor::with_path(path.clone()),
        None => match YtDlpExtractor::new() {
            Ok(extractor) => extractor,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                eprintln!("Please install yt-dlp:");
                eprintln!("  pip install yt-dlp");
                eprintln!("  or: brew install yt-dlp");
                eprintln!("  or visit: https://github.com/yt-dlp/yt-dlp");
                return Err(e.into());
            }
        },
    };
    info!("Using yt-dlp at: {}", extractor.ytdlp_path().display());

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState {
        extractor: Arc::new(extractor),
        client: reqwest::Client::new(),
        settings,
    });

    let app = web::router(state);

    info!("Medialink listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
