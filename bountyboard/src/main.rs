mod cmd;
mod modules;
mod types;

use crate::cmd::{
    migrate::{self, MigrateArgs},
    server::{self, ServerArgs},
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "bountyboard")]
#[command(about = "Bounty board API for the campus open source program")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the dashboard API.
    Server(ServerArgs),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

fn main() {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .unwrap_or(LevelFilter::INFO)
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().expect("couldn't determine local time offset"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    match Cli::parse().command {
        Commands::Server(args) => runtime.block_on(server::run(args)),
        Commands::Migrate(args) => runtime.block_on(migrate::run(args)),
    }
    .expect("command failed");
}
