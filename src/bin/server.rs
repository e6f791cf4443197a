//! slamlink Stub Server Binary
//!
//! Answers client requests from canned JSON fixtures.

use clap::Parser;
use slamlink::network::StubServer;
use slamlink::Config;
use tracing_subscriber::{fmt, EnvFilter};

/// slamlink canned-response stub
#[derive(Parser, Debug)]
#[command(name = "slamlink-stub")]
#[command(about = "Replays recorded mapping service responses")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:1445")]
    listen: String,

    /// Directory holding {command}-response.json fixtures
    #[arg(short, long, default_value = "./test_data")]
    fixtures: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slamlink=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("slamlink stub v{}", slamlink::VERSION);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .fixture_dir(&args.fixtures)
        .build();

    let server = match StubServer::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
