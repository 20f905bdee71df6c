use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pipbox", version, about = "PipBox live focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive countdown widget
    Run {
        /// Start from this preset (seconds) instead of the configured default
        #[arg(long, value_parser = commands::parse_preset)]
        preset: Option<u64>,
    },
    /// List the preset durations
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a number of seconds as MM:SS
    Format {
        seconds: u64,
    },
    /// Drive the engine through scripted steps and print the result as JSON
    Simulate {
        /// Session length (a preset, in seconds)
        #[arg(long, value_parser = commands::parse_preset)]
        preset: Option<u64>,
        /// Steps: toggle, start, pause, stop, tick, tick:N, preset:SECS
        #[arg(required = true)]
        steps: Vec<commands::simulate::Step>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PIPBOX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { preset } => commands::run::run(preset).await,
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Format { seconds } => commands::format::run(seconds),
        Commands::Simulate { preset, steps } => commands::simulate::run(preset, steps),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
