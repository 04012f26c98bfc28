//! Output types for the keiba-points CLI.

use serde::Serialize;

use crate::bet_type::BetType;
use crate::points::NagashiPoints;

/// Points for one bet type
#[derive(Debug, Clone, Serialize)]
pub struct PointsRow {
    pub bet_type: BetType,
    pub name: String,
    pub points: u64,
    pub total_amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// BOX calculation result
#[derive(Debug, Serialize)]
pub struct BoxResponse {
    pub horse_count: u64,
    pub unit_amount: u64,
    pub rows: Vec<PointsRow>,
}

/// Nagashi calculation result
#[derive(Debug, Serialize)]
pub struct NagashiResponse {
    pub bet_type: BetType,
    pub name: String,
    pub axis_count: u64,
    pub opponent_count: u64,
    pub unit_amount: u64,
    pub points: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_points: Option<u64>,
    /// Points actually bought (multi count when マルチ applies)
    pub purchased_points: u64,
    pub total_amount: u64,
}

impl NagashiResponse {
    pub fn new(
        bet_type: BetType,
        axis_count: u64,
        opponent_count: u64,
        unit_amount: u64,
        points: NagashiPoints,
    ) -> Self {
        let multi_points = match points {
            NagashiPoints::Multi { multi, .. } => Some(multi),
            NagashiPoints::Single(_) => None,
        };

        Self {
            bet_type,
            name: bet_type.name().to_string(),
            axis_count,
            opponent_count,
            unit_amount,
            points: points.normal(),
            multi_points,
            purchased_points: points.purchased(),
            total_amount: crate::points::total_amount(points.purchased(), unit_amount),
        }
    }
}

/// Formation calculation result
#[derive(Debug, Serialize)]
pub struct FormationResponse {
    pub bet_type: BetType,
    pub name: String,
    /// Horse numbers per finishing position
    pub selections: Vec<Vec<u32>>,
    pub unit_amount: u64,
    pub points: u64,
    pub total_amount: u64,
}

/// WIN5 calculation result
#[derive(Debug, Serialize)]
pub struct Win5Response {
    pub race_horse_counts: Vec<u64>,
    pub unit_amount: u64,
    pub points: u64,
    pub total_amount: u64,
}

/// Rule table row for `bet-types`
#[derive(Debug, Serialize)]
pub struct BetTypeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub points: u64,
    pub description: &'static str,
    pub min_horses: u64,
    pub max_horses: u64,
    pub ordered: bool,
    pub multi: bool,
}

impl From<BetType> for BetTypeInfo {
    fn from(bet_type: BetType) -> Self {
        Self {
            id: bet_type.id(),
            name: bet_type.name(),
            points: bet_type.points(),
            description: bet_type.description(),
            min_horses: bet_type.min_horses(),
            max_horses: crate::bet_type::MAX_HORSE_COUNT,
            ordered: bet_type.is_ordered(),
            multi: bet_type.supports_multi(),
        }
    }
}
