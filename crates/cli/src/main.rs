// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use geotrail_cli::commands::{inspect, insert, register, search, status, sync, timeline};

#[derive(Parser)]
#[command(name = "geotrail")]
#[command(about = "GeoTrail CLI - record, sync and query per-identity location timelines", long_about = None)]
struct Cli {
    /// Directory holding the snapshot files.
    #[arg(long, short, global = true, default_value = "./geotrail-data")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an identity and write its first snapshot
    Register {
        identity: String,
    },
    /// Record one sample
    Insert {
        identity: String,

        /// Unix seconds or RFC 3339. Defaults to now.
        #[arg(long)]
        ts: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Queue the sample instead of adding it to the timeline
        #[arg(long)]
        offline: bool,
    },
    /// Merge queued offline samples into the timeline
    Sync {
        identity: String,
    },
    /// Show the timeline in time order
    Timeline {
        identity: String,

        /// Only the newest N samples
        #[arg(long)]
        latest: Option<usize>,
    },
    /// Samples with start <= timestamp <= end
    Range {
        identity: String,
        start: String,
        end: String,
    },
    /// Samples closest in time to a target
    Nearest {
        identity: String,
        ts: String,
    },
    /// Sample and pending counts for an identity
    Status {
        identity: String,
    },
    /// Show a snapshot header and verify its checksum
    Inspect {
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dir = cli.dir.as_path();

    match cli.command {
        Commands::Register { identity } => register::run(dir, &identity).map(|_| ()),
        Commands::Insert {
            identity,
            ts,
            lat,
            lon,
            offline,
        } => insert::run(dir, &identity, ts.as_deref(), lat, lon, offline).map(|_| ()),
        Commands::Sync { identity } => sync::run(dir, &identity).map(|_| ()),
        Commands::Timeline { identity, latest } => timeline::run(dir, &identity, latest).map(|_| ()),
        Commands::Range {
            identity,
            start,
            end,
        } => search::range(dir, &identity, &start, &end).map(|_| ()),
        Commands::Nearest { identity, ts } => search::nearest(dir, &identity, &ts).map(|_| ()),
        Commands::Status { identity } => status::run(dir, &identity).map(|_| ()),
        Commands::Inspect { file } => inspect::run(&file).map(|_| ()),
    }
}
