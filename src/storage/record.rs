//! Persisted calculation history records.
//!
//! Field names follow the stored JSON layout (`camelCase`, `type` for the
//! selection mode), so histories written by earlier versions stay readable.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::bet_type::BetType;
use crate::points::total_amount;
use super::history::generate_history_id;

/// How the horses of a calculation were selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Box,
    Formation,
    Win5,
}

/// Computed points for one bet type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetResult {
    pub bet_type_id: String,
    pub points: u64,
    pub total_amount: u64,
}

impl BetResult {
    pub fn new(bet_type: BetType, points: u64, unit_amount: u64) -> Self {
        Self {
            bet_type_id: bet_type.id().to_string(),
            points,
            total_amount: total_amount(points, unit_amount),
        }
    }
}

/// One calculation made by the user. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationHistory {
    pub id: String,
    #[serde(rename = "type")]
    pub mode: SelectionMode,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horse_count: Option<u64>,
    pub unit_amount: u64,
    /// (position, horse numbers) pairs in position order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<Vec<(u32, Vec<u32>)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_horse_counts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<BetResult>>,
}

impl CalculationHistory {
    fn new(mode: SelectionMode, unit_amount: u64, results: Vec<BetResult>) -> Self {
        Self {
            id: generate_history_id(),
            mode,
            timestamp: Utc::now().timestamp_millis(),
            horse_count: None,
            unit_amount,
            selections: None,
            race_horse_counts: None,
            results: Some(results),
        }
    }

    /// Record for a BOX calculation.
    pub fn boxed(horse_count: u64, unit_amount: u64, results: Vec<BetResult>) -> Self {
        Self {
            horse_count: Some(horse_count),
            ..Self::new(SelectionMode::Box, unit_amount, results)
        }
    }

    /// Record for a formation calculation. `selections[i]` is position `i + 1`.
    pub fn formation(selections: &[Vec<u32>], unit_amount: u64, results: Vec<BetResult>) -> Self {
        let selections = selections
            .iter()
            .enumerate()
            .map(|(i, horses)| (i as u32 + 1, horses.clone()))
            .collect();

        Self {
            selections: Some(selections),
            ..Self::new(SelectionMode::Formation, unit_amount, results)
        }
    }

    /// Record for a WIN5 calculation.
    pub fn win5(race_horse_counts: Vec<u64>, unit_amount: u64, results: Vec<BetResult>) -> Self {
        Self {
            race_horse_counts: Some(race_horse_counts),
            ..Self::new(SelectionMode::Win5, unit_amount, results)
        }
    }
}
