//! Keiba points CLI
//!
//! Betting points calculator with local calculation history.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keiba_points::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr, so JSON output stays clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keiba_points=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Box {
            bet_type,
            horses,
            amount,
            format,
            no_save,
        } => cli::run_box(bet_type, horses, amount, format, no_save).await,
        Commands::Nagashi {
            bet_type,
            axis,
            opponents,
            multi,
            amount,
            format,
        } => cli::run_nagashi(bet_type, axis, opponents, multi, amount, format).await,
        Commands::Formation {
            bet_type,
            first,
            second,
            third,
            amount,
            format,
            no_save,
        } => {
            cli::run_formation(
                bet_type,
                vec![first, second, third],
                amount,
                format,
                no_save,
            )
            .await
        }
        Commands::Win5 {
            races,
            amount,
            format,
            no_save,
        } => cli::run_win5(races, amount, format, no_save).await,
        Commands::History { limit, format } => cli::run_history(limit, format).await,
        Commands::HistoryClear => cli::run_history_clear().await,
        Commands::BetTypes { format } => cli::run_bet_types(format),
    }
}
