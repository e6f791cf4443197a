//! slamlink CLI Client
//!
//! Command-line interface for querying a mapping service.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slamlink::{Client, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// slamlink CLI
#[derive(Parser, Debug)]
#[command(name = "slamlink-cli")]
#[command(about = "CLI for SDP robot mapping services")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "192.168.11.1:1445")]
    server: String,

    /// Record every request/response under this directory
    #[arg(short, long)]
    dump_dir: Option<PathBuf>,

    /// Read timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Clear the stored map after the command
    #[arg(long)]
    clear_map: bool,

    /// Stop live map updates after the command
    #[arg(long)]
    stop_update: bool,

    /// Start live map updates after the command
    #[arg(long)]
    start_update: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print map and localization summary
    Summary,

    /// Print the current pose
    Pose,

    /// Print the known map area
    KnownArea,

    /// Fetch and decode the map
    Map,

    /// Fetch and decode the laser scan
    Laser {
        /// Drop samples without a return
        #[arg(long)]
        valid_only: bool,

        /// Write angle,distance,degrees rows to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print device, version and feature information
    Info,

    /// Issue every read command once
    All,

    /// Turn localization on or off
    Localization {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slamlink=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut builder = Config::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.read_timeout_ms);
    if let Some(dir) = &args.dump_dir {
        builder = builder.dump_dir(dir);
    }
    let config = builder.build();

    let mut client = Client::connect(&config)?;

    match args.command {
        Some(Commands::Summary) => show_summary(&mut client)?,
        Some(Commands::Pose) => {
            let pose = client.get_pose()?;
            println!(
                "x {:.4}, y {:.4}, z {:.4}, heading {:.4}°",
                pose.x,
                pose.y,
                pose.z,
                pose.heading_degrees()
            );
        }
        Some(Commands::KnownArea) => {
            let area = client.get_known_area()?;
            println!(
                "({:.4},{:.4},{:.4},{:.4})",
                area.min_x, area.min_y, area.max_x, area.max_y
            );
        }
        Some(Commands::Map) => {
            let map = client.get_map_data()?;
            let (width_m, height_m) = map.size_meters();
            println!("Cells: {} x {}", map.dimension_x, map.dimension_y);
            println!("Resolution: {:.4} m", map.resolution);
            println!("Size: {:.2}m x {:.2}m", width_m, height_m);
        }
        Some(Commands::Laser { valid_only, csv }) => {
            let samples = client.get_laser_scan(valid_only)?;
            match csv {
                Some(path) => {
                    let mut text = String::new();
                    for sample in &samples {
                        let _ = writeln!(
                            text,
                            "{},{},{}",
                            sample.angle_radian,
                            sample.distance,
                            sample.angle_degrees()
                        );
                    }
                    std::fs::write(&path, text)?;
                    println!("Wrote {} samples to {}", samples.len(), path.display());
                }
                None => {
                    for sample in &samples {
                        println!(
                            "distance: {:.4}m, angle {:.2}°, valid {}",
                            sample.distance,
                            sample.angle_degrees(),
                            sample.valid
                        );
                    }
                }
            }
        }
        Some(Commands::Info) => {
            let info = [
                ("device", client.get_device_info()?),
                ("sdp_version", client.get_sdp_version()?),
                ("features", client.get_robot_features_info()?),
            ];
            for (name, value) in info {
                println!("{}: {}", name, serde_json::Value::Object(value));
            }
        }
        Some(Commands::All) => client.get_all()?,
        Some(Commands::Localization { enabled }) => {
            client.set_localization(enabled)?;
        }
        None => {}
    }

    if args.clear_map {
        client.clear_map()?;
        tracing::info!("Map cleared");
    }
    if args.stop_update {
        client.set_update(false)?;
        tracing::info!("Live update stopped");
    }
    if args.start_update {
        client.set_update(true)?;
        tracing::info!("Live update started");
    }

    client.disconnect()
}

fn show_summary(client: &mut Client) -> Result<()> {
    println!("Fetching Map Info...");
    let known_area = client.get_known_area()?;
    let map = client.get_map_data()?;
    let (width_m, height_m) = map.size_meters();
    println!(
        "> Map Area: ({:.4},{:.4},{:.4},{:.4})",
        known_area.min_x, known_area.min_y, known_area.max_x, known_area.max_y
    );
    println!("> Cell Dimension: ({}, {})", map.dimension_x, map.dimension_y);
    println!("> Cell Resolution: ({:.4}, {:.4})", map.resolution, map.resolution);
    println!("> Map Size: ({:.2}m, {:.2}m)", width_m, height_m);

    println!("Fetching Localization Info...");
    let pose = client.get_pose()?;
    println!("> Position: (x {:.4}, y {:.4}, z {:.4})", pose.x, pose.y, pose.z);
    println!("> Heading: {:.4}°", pose.heading_degrees());
    Ok(())
}
