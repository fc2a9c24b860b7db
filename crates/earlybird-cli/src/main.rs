use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "earlybird-cli", version, about = "Early Bird CLI")]
struct Cli {
    /// Only log errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Log debug output
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time progress for each task, most urgent first
    Progress(commands::progress::ProgressArgs),
    /// Reward breakdown for completed tasks
    Reward(commands::reward::RewardArgs),
    /// Complete a task and report the coins earned
    Complete(commands::complete::CompleteArgs),
    /// Leaderboard ranking
    Rank(commands::rank::RankArgs),
    /// Completion statistics
    Stats(commands::stats::StatsArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Progress(args) => commands::progress::run(args),
        Commands::Reward(args) => commands::reward::run(args),
        Commands::Complete(args) => commands::complete::run(args),
        Commands::Rank(args) => commands::rank::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("EARLYBIRD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries JSON results
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
