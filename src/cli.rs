//! CLI commands for keiba-points.
//!
//! Calculates points for BOX, nagashi, formation and WIN5 bets and keeps a
//! history of past calculations.

use anyhow::{bail, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::bet_type::{BetType, MAX_HORSE_COUNT};
use crate::config::AppConfig;
use crate::format::{format_points, format_yen};
use crate::points::{
    box_points_details, calculate_formation_points, calculate_nagashi_points,
    calculate_win5_points, total_amount, WIN5_RACE_COUNT,
};
use crate::storage::{
    BetResult, CalculationHistory, DebouncedWriter, FileStorage, HistoryStore, MemoryStorage,
    Storage,
};
use crate::types::{
    BetTypeInfo, BoxResponse, FormationResponse, NagashiResponse, PointsRow, Win5Response,
};
use crate::validation::{validate_amount, validate_horse_count};

#[derive(Parser)]
#[command(name = "keiba-points")]
#[command(version, about = "Keiba points: betting combination calculator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Calculate BOX points
    Box {
        /// Bet type (tansho, fukusho, wakuren, umaren, umatan, wide, sanrenpuku, sanrentan, all)
        #[arg(short, long, default_value = "all")]
        bet_type: String,

        /// Number of selected horses
        #[arg(short = 'n', long)]
        horses: u64,

        /// Stake per ticket in yen
        #[arg(short, long)]
        amount: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Do not record this calculation in history
        #[arg(long)]
        no_save: bool,
    },

    /// Calculate nagashi (axis + opponents) points
    Nagashi {
        /// Bet type
        #[arg(short, long)]
        bet_type: String,

        /// Number of axis horses (1 or 2)
        #[arg(long, default_value_t = 1)]
        axis: u64,

        /// Number of opponent horses
        #[arg(short, long)]
        opponents: u64,

        /// Buy as multi (umatan, sanrentan only)
        #[arg(short, long)]
        multi: bool,

        /// Stake per ticket in yen
        #[arg(short, long)]
        amount: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Calculate formation points
    Formation {
        /// Bet type
        #[arg(short, long)]
        bet_type: String,

        /// Horses for 1st place
        #[arg(long, value_delimiter = ',', required = true)]
        first: Vec<u32>,

        /// Horses for 2nd place
        #[arg(long, value_delimiter = ',')]
        second: Vec<u32>,

        /// Horses for 3rd place
        #[arg(long, value_delimiter = ',')]
        third: Vec<u32>,

        /// Stake per ticket in yen
        #[arg(short, long)]
        amount: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Do not record this calculation in history
        #[arg(long)]
        no_save: bool,
    },

    /// Calculate WIN5 points
    Win5 {
        /// Number of horses picked in each of the five races
        #[arg(short, long, value_delimiter = ',', required = true)]
        races: Vec<u64>,

        /// Stake per ticket in yen
        #[arg(short, long)]
        amount: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Do not record this calculation in history
        #[arg(long)]
        no_save: bool,
    },

    /// Show calculation history (newest first)
    History {
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Delete all calculation history
    HistoryClear,

    /// List bet types and their selection rules
    BetTypes {
        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Resolve the stake per ticket: CLI value (validated) or configured default.
fn resolve_amount(amount: Option<String>, config: &AppConfig) -> Result<u64> {
    let Some(input) = amount else {
        return Ok(config.betting.unit_amount);
    };

    let result = validate_amount(&input);
    match (result.is_valid, result.value) {
        (true, Some(value)) => Ok(value),
        _ => bail!(result.error_message.unwrap_or_default()),
    }
}

/// Reject nagashi counts outside a real race.
fn check_nagashi_counts(axis: u64, opponents: u64) -> Result<()> {
    if !(1..=2).contains(&axis) {
        bail!("Axis count must be 1 or 2, got {}", axis);
    }
    if !(1..=MAX_HORSE_COUNT).contains(&opponents) {
        bail!(
            "Opponent count must be between 1 and {}, got {}",
            MAX_HORSE_COUNT,
            opponents
        );
    }
    Ok(())
}

/// Open the history store, falling back to memory if the directory is unusable.
pub fn open_history(config: &AppConfig) -> Arc<HistoryStore> {
    let dir = config.history.dir_path();
    let storage: Arc<dyn Storage> = match std::fs::create_dir_all(&dir) {
        Ok(()) => Arc::new(FileStorage::new(dir)),
        Err(e) => {
            tracing::warn!(
                "History directory {} unavailable ({}), history will not persist",
                dir.display(),
                e
            );
            Arc::new(MemoryStorage::new())
        }
    };

    Arc::new(HistoryStore::with_max_entries(
        storage,
        config.history.max_entries,
    ))
}

/// Record a calculation through the debounced writer and flush before exit.
async fn record_history(config: &AppConfig, record: CalculationHistory) {
    if !config.history.enabled {
        return;
    }

    let store = open_history(config);
    let writer = DebouncedWriter::new(store, config.history.debounce());
    writer.schedule(record);
    writer.flush();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn output<T: serde::Serialize>(format: &str, value: &T, table: impl FnOnce(&T)) -> Result<()> {
    match format {
        "json" => print_json(value),
        "table" => {
            table(value);
            Ok(())
        }
        _ => {
            eprintln!("Unknown format: {}. Using JSON.", format);
            print_json(value)
        }
    }
}

/// Run BOX calculation.
pub async fn run_box(
    bet_type: String,
    horses: u64,
    amount: Option<String>,
    format: String,
    no_save: bool,
) -> Result<()> {
    let config = AppConfig::load()?;
    let unit_amount = resolve_amount(amount, &config)?;

    let bet_types: Vec<BetType> = if bet_type.eq_ignore_ascii_case("all") {
        BetType::ALL.to_vec()
    } else {
        let bet_type: BetType = bet_type.parse()?;
        let check = validate_horse_count(&horses.to_string(), bet_type);
        if !check.is_valid {
            bail!(check.error_message.unwrap_or_default());
        }
        vec![bet_type]
    };

    let rows: Vec<PointsRow> = bet_types
        .into_iter()
        .map(|bet_type| {
            let details = box_points_details(bet_type, horses);
            PointsRow {
                bet_type,
                name: bet_type.name().to_string(),
                points: details.points,
                total_amount: total_amount(details.points, unit_amount),
                formula: details.is_valid.then(|| details.formula.clone()),
                message: (!details.is_valid).then(|| details.description.clone()),
            }
        })
        .collect();

    let response = BoxResponse {
        horse_count: horses,
        unit_amount,
        rows,
    };

    if !no_save {
        let results = response
            .rows
            .iter()
            .filter(|row| row.formula.is_some())
            .map(|row| BetResult::new(row.bet_type, row.points, unit_amount))
            .collect();
        record_history(&config, CalculationHistory::boxed(horses, unit_amount, results)).await;
    }

    output(&format, &response, print_box_table)
}

fn print_box_table(response: &BoxResponse) {
    println!(
        "=== BOX {}頭 / {} per ticket ===",
        response.horse_count,
        format_yen(response.unit_amount)
    );
    for row in &response.rows {
        match (&row.formula, &row.message) {
            (Some(formula), _) => println!(
                "  {:<8} {:>16}  {:>12}",
                row.name,
                formula,
                format_yen(row.total_amount)
            ),
            (None, Some(message)) => println!("  {:<8} {}", row.name, message),
            (None, None) => println!("  {:<8} {}", row.name, format_points(row.points)),
        }
    }
}

/// Run nagashi calculation.
pub async fn run_nagashi(
    bet_type: String,
    axis: u64,
    opponents: u64,
    multi: bool,
    amount: Option<String>,
    format: String,
) -> Result<()> {
    let config = AppConfig::load()?;
    let unit_amount = resolve_amount(amount, &config)?;
    let bet_type: BetType = bet_type.parse()?;
    check_nagashi_counts(axis, opponents)?;

    if multi && !bet_type.supports_multi() {
        eprintln!("{} does not support multi; calculating without it", bet_type.name());
    }

    let points = calculate_nagashi_points(bet_type, axis, opponents, multi);
    let response = NagashiResponse::new(bet_type, axis, opponents, unit_amount, points);

    output(&format, &response, |r| {
        println!(
            "=== {} 流し (軸{}頭 / 相手{}頭) ===",
            r.name, r.axis_count, r.opponent_count
        );
        println!("  通常:   {}", format_points(r.points));
        if let Some(multi) = r.multi_points {
            println!("  マルチ: {}", format_points(multi));
        }
        println!("  合計:   {}", format_yen(r.total_amount));
    })
}

/// Run formation calculation.
pub async fn run_formation(
    bet_type: String,
    positions: Vec<Vec<u32>>,
    amount: Option<String>,
    format: String,
    no_save: bool,
) -> Result<()> {
    let config = AppConfig::load()?;
    let unit_amount = resolve_amount(amount, &config)?;
    let bet_type: BetType = bet_type.parse()?;

    let needed = bet_type.selection_size() as usize;
    let selections: Vec<Vec<u32>> = positions.into_iter().take(needed).collect();

    if selections.len() < needed || selections.iter().any(Vec::is_empty) {
        bail!("{} needs horses for {} positions", bet_type.name(), needed);
    }
    if let Some(&horse) = selections
        .iter()
        .flatten()
        .find(|&&h| h == 0 || u64::from(h) > MAX_HORSE_COUNT)
    {
        bail!("Horse number must be between 1 and {}, got {}", MAX_HORSE_COUNT, horse);
    }

    let points = calculate_formation_points(bet_type, &selections);
    let response = FormationResponse {
        bet_type,
        name: bet_type.name().to_string(),
        selections,
        unit_amount,
        points,
        total_amount: total_amount(points, unit_amount),
    };

    if !no_save {
        let record = CalculationHistory::formation(
            &response.selections,
            unit_amount,
            vec![BetResult::new(bet_type, points, unit_amount)],
        );
        record_history(&config, record).await;
    }

    output(&format, &response, |r| {
        println!("=== {} フォーメーション ===", r.name);
        for (i, horses) in r.selections.iter().enumerate() {
            let horses: Vec<String> = horses.iter().map(|h| h.to_string()).collect();
            println!("  {}着: {}", i + 1, horses.join(", "));
        }
        println!("  点数: {}", format_points(r.points));
        println!("  合計: {}", format_yen(r.total_amount));
    })
}

/// Run WIN5 calculation.
pub async fn run_win5(
    races: Vec<u64>,
    amount: Option<String>,
    format: String,
    no_save: bool,
) -> Result<()> {
    let config = AppConfig::load()?;
    let unit_amount = resolve_amount(amount, &config)?;

    if races.len() != WIN5_RACE_COUNT {
        bail!("WIN5 needs exactly {} races, got {}", WIN5_RACE_COUNT, races.len());
    }

    let points = calculate_win5_points(&races);
    let response = Win5Response {
        race_horse_counts: races.clone(),
        unit_amount,
        points,
        total_amount: total_amount(points, unit_amount),
    };

    if !no_save {
        // WIN5 is not one of the eight bet types; its result list stays empty.
        record_history(&config, CalculationHistory::win5(races, unit_amount, Vec::new())).await;
    }

    output(&format, &response, |r| {
        let counts: Vec<String> = r.race_horse_counts.iter().map(|c| c.to_string()).collect();
        println!("=== WIN5 ===");
        println!("  {} = {}", counts.join(" × "), format_points(r.points));
        println!("  合計: {}", format_yen(r.total_amount));
    })
}

/// Show calculation history.
pub async fn run_history(limit: Option<usize>, format: String) -> Result<()> {
    let config = AppConfig::load()?;
    let store = open_history(&config);

    let mut history = store.get_history();
    if let Some(limit) = limit {
        history.truncate(limit);
    }

    output(&format, &history, |records| {
        if records.is_empty() {
            println!("No history");
            return;
        }
        for record in records {
            let when = DateTime::from_timestamp_millis(record.timestamp)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| record.timestamp.to_string());
            let mode = serde_json::to_value(record.mode)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            println!("{}  {:<9} {}  {}", when, mode, format_yen(record.unit_amount), record.id);

            for result in record.results.iter().flatten() {
                let name = BetType::from_id(&result.bet_type_id)
                    .map(|b| b.name())
                    .unwrap_or(result.bet_type_id.as_str());
                println!(
                    "    {:<8} {:>8}  {:>12}",
                    name,
                    format_points(result.points),
                    format_yen(result.total_amount)
                );
            }
        }
    })
}

/// Delete all calculation history.
pub async fn run_history_clear() -> Result<()> {
    let config = AppConfig::load()?;
    open_history(&config).clear_history();
    eprintln!("History cleared");
    Ok(())
}

/// List bet types.
pub fn run_bet_types(format: String) -> Result<()> {
    let infos: Vec<BetTypeInfo> = BetType::ALL.into_iter().map(BetTypeInfo::from).collect();

    output(&format, &infos, |infos| {
        println!("=== Bet Types ===");
        for info in infos {
            println!(
                "  {:<10} {:<6} {:>2}-{:<2}頭 {:<5} {}",
                info.id,
                info.name,
                info.min_horses,
                info.max_horses,
                if info.multi { "multi" } else { "" },
                info.description
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_formation_args() {
        let cli = Cli::parse_from([
            "keiba-points",
            "formation",
            "--bet-type",
            "sanrentan",
            "--first",
            "1,2",
            "--second",
            "1,2,3",
            "--third",
            "4",
        ]);

        match cli.command {
            Commands::Formation {
                first,
                second,
                third,
                ..
            } => {
                assert_eq!(first, vec![1, 2]);
                assert_eq!(second, vec![1, 2, 3]);
                assert_eq!(third, vec![4]);
            }
            _ => panic!("expected formation command"),
        }
    }

    #[test]
    fn test_resolve_amount() {
        let config = AppConfig::default();
        assert_eq!(resolve_amount(None, &config).unwrap(), 100);
        assert_eq!(resolve_amount(Some("500".to_string()), &config).unwrap(), 500);

        let err = resolve_amount(Some("150".to_string()), &config).unwrap_err();
        assert!(err.to_string().contains("100円単位"));
    }

    #[test]
    fn test_check_nagashi_counts() {
        assert!(check_nagashi_counts(1, 1).is_ok());
        assert!(check_nagashi_counts(2, MAX_HORSE_COUNT).is_ok());

        let err = check_nagashi_counts(3, 4).unwrap_err();
        assert!(err.to_string().contains("Axis count"));
        assert!(check_nagashi_counts(0, 4).is_err());

        let err = check_nagashi_counts(2, u64::MAX).unwrap_err();
        assert!(err.to_string().contains("Opponent count"));
        assert!(check_nagashi_counts(1, 0).is_err());
        assert!(check_nagashi_counts(1, MAX_HORSE_COUNT + 1).is_err());
    }
}
