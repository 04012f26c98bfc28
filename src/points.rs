//! Points (点数) calculation for BOX, nagashi, formation and WIN5 bets.
//!
//! A "point" is one ticket. Every calculator degrades to 0 on inputs that
//! cannot form a ticket instead of returning an error.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, OnceLock};

use crate::bet_type::{BetType, MAX_HORSE_COUNT};
use crate::combinatorics::{combination, permutation};
use crate::format::box_formula;

/// Number of races in a WIN5 ticket.
pub const WIN5_RACE_COUNT: usize = 5;

static BOX_CACHE: OnceLock<Mutex<HashMap<(BetType, u64), u64>>> = OnceLock::new();

/// Calculate BOX points: every combination among `horse_count` horses.
///
/// # Arguments
/// * `bet_type` - Bet type
/// * `horse_count` - Number of selected horses
///
/// # Returns
/// nCr or nPr with `r` fixed by the bet type (0 below one horse)
pub fn calculate_box_points(bet_type: BetType, horse_count: u64) -> u64 {
    if horse_count < 1 {
        return 0;
    }

    let cache = BOX_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let key = (bet_type, horse_count);

    if let Some(&points) = cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
        return points;
    }

    let points = match bet_type {
        BetType::Tansho | BetType::Fukusho => horse_count,
        BetType::Wakuren | BetType::Umaren | BetType::Wide => combination(horse_count, 2),
        BetType::Umatan => permutation(horse_count, 2),
        BetType::Sanrenpuku => combination(horse_count, 3),
        BetType::Sanrentan => permutation(horse_count, 3),
    };

    cache
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(key, points);
    points
}

/// BOX points by wire identifier. Unknown identifiers yield 0.
pub fn calculate_box_points_by_id(bet_type_id: &str, horse_count: u64) -> u64 {
    BetType::from_id(bet_type_id)
        .map(|bet_type| calculate_box_points(bet_type, horse_count))
        .unwrap_or(0)
}

/// BOX points with a human-readable formula and validity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPointsDetails {
    pub points: u64,
    pub formula: String,
    pub description: String,
    pub is_valid: bool,
}

/// Calculate BOX points along with the formula used.
///
/// Horse counts outside `[min_horses, MAX_HORSE_COUNT]` are reported as
/// invalid with zero points and an empty formula.
pub fn box_points_details(bet_type: BetType, horse_count: u64) -> BoxPointsDetails {
    let min = bet_type.min_horses();

    if horse_count < min || horse_count > MAX_HORSE_COUNT {
        return BoxPointsDetails {
            points: 0,
            formula: String::new(),
            description: format!(
                "{}は{}頭から{}頭まで選択できます",
                bet_type.name(),
                min,
                MAX_HORSE_COUNT
            ),
            is_valid: false,
        };
    }

    let points = calculate_box_points(bet_type, horse_count);

    BoxPointsDetails {
        points,
        formula: box_formula(bet_type, horse_count, points),
        description: format!("{} BOX {}頭", bet_type.name(), horse_count),
        is_valid: true,
    }
}

/// Nagashi (流し) points.
///
/// `Multi` is only produced for multi-eligible bet types when マルチ was
/// requested; it carries the plain count and the count with both finishing
/// orders of the axis covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NagashiPoints {
    Single(u64),
    Multi { normal: u64, multi: u64 },
}

impl NagashiPoints {
    /// Points without マルチ.
    pub fn normal(&self) -> u64 {
        match *self {
            NagashiPoints::Single(points) => points,
            NagashiPoints::Multi { normal, .. } => normal,
        }
    }

    /// Points actually purchased: the multi count when present.
    pub fn purchased(&self) -> u64 {
        match *self {
            NagashiPoints::Single(points) => points,
            NagashiPoints::Multi { multi, .. } => multi,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, NagashiPoints::Multi { .. })
    }
}

/// Calculate nagashi points: `axis_count` fixed horses against
/// `opponent_count` opponents.
///
/// # Arguments
/// * `bet_type` - Bet type
/// * `axis_count` - Number of axis (軸) horses, 1 or 2
/// * `opponent_count` - Number of opponent (相手) horses
/// * `is_multi` - Whether マルチ was requested (ignored for non-eligible types)
///
/// # Returns
/// `Single(0)` for unsupported axis counts and single-horse bet types
pub fn calculate_nagashi_points(
    bet_type: BetType,
    axis_count: u64,
    opponent_count: u64,
    is_multi: bool,
) -> NagashiPoints {
    if axis_count < 1 || opponent_count < 1 {
        return NagashiPoints::Single(0);
    }

    let normal = match (bet_type, axis_count) {
        (BetType::Wakuren | BetType::Umaren | BetType::Wide, 1) => opponent_count,
        (BetType::Wakuren | BetType::Umaren | BetType::Wide, 2) => {
            combination(2, 2).saturating_mul(opponent_count)
        }
        (BetType::Umatan, 1) => opponent_count,
        (BetType::Umatan, 2) => permutation(2, 2).saturating_mul(opponent_count),
        (BetType::Sanrenpuku, 1) => combination(opponent_count, 2),
        (BetType::Sanrenpuku, 2) => opponent_count,
        (BetType::Sanrentan, 1) => permutation(opponent_count, 2),
        (BetType::Sanrentan, 2) => opponent_count,
        _ => return NagashiPoints::Single(0),
    };

    if is_multi && bet_type.supports_multi() {
        NagashiPoints::Multi {
            normal,
            multi: normal.saturating_mul(2),
        }
    } else {
        NagashiPoints::Single(normal)
    }
}

/// Nagashi points by wire identifier. Unknown identifiers yield `Single(0)`.
pub fn calculate_nagashi_points_by_id(
    bet_type_id: &str,
    axis_count: u64,
    opponent_count: u64,
    is_multi: bool,
) -> NagashiPoints {
    match BetType::from_id(bet_type_id) {
        Some(bet_type) => calculate_nagashi_points(bet_type, axis_count, opponent_count, is_multi),
        None => NagashiPoints::Single(0),
    }
}

/// Calculate formation points.
///
/// `selections[i]` holds the horse numbers picked for finishing position
/// `i + 1`. Only the first `selection_size` positions are used. A ticket
/// takes one horse per position with no horse repeated; for unordered bet
/// types tickets with the same horse set are counted once.
pub fn calculate_formation_points(bet_type: BetType, selections: &[Vec<u32>]) -> u64 {
    let positions = bet_type.selection_size() as usize;
    if selections.len() < positions {
        return 0;
    }

    let columns: Vec<BTreeSet<u32>> = selections[..positions]
        .iter()
        .map(|horses| horses.iter().copied().collect())
        .collect();

    if columns.iter().any(BTreeSet::is_empty) {
        return 0;
    }

    let mut tickets: BTreeSet<Vec<u32>> = BTreeSet::new();
    let mut current = Vec::with_capacity(positions);
    collect_tickets(&columns, &mut current, &mut |ticket: &[u32]| {
        let mut ticket = ticket.to_vec();
        if !bet_type.is_ordered() {
            ticket.sort_unstable();
        }
        tickets.insert(ticket);
    });

    tickets.len() as u64
}

fn collect_tickets(
    columns: &[BTreeSet<u32>],
    current: &mut Vec<u32>,
    emit: &mut dyn FnMut(&[u32]),
) {
    let depth = current.len();
    if depth == columns.len() {
        emit(current);
        return;
    }

    for &horse in &columns[depth] {
        if current.contains(&horse) {
            continue;
        }
        current.push(horse);
        collect_tickets(columns, current, emit);
        current.pop();
    }
}

/// Calculate WIN5 points: the product of horses picked in each of the
/// five races. Returns 0 unless exactly five races are given.
pub fn calculate_win5_points(race_horse_counts: &[u64]) -> u64 {
    if race_horse_counts.len() != WIN5_RACE_COUNT {
        return 0;
    }

    race_horse_counts
        .iter()
        .fold(1u64, |acc, &count| acc.saturating_mul(count))
}

/// Total stake for `points` tickets at `unit_amount` yen each.
pub fn total_amount(points: u64, unit_amount: u64) -> u64 {
    points.saturating_mul(unit_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_points_known_values() {
        assert_eq!(calculate_box_points(BetType::Umaren, 5), 10);
        assert_eq!(calculate_box_points(BetType::Umatan, 5), 20);
        assert_eq!(calculate_box_points(BetType::Sanrenpuku, 5), 10);
        assert_eq!(calculate_box_points(BetType::Sanrentan, 5), 60);
        assert_eq!(calculate_box_points(BetType::Tansho, 7), 7);
        assert_eq!(calculate_box_points(BetType::Fukusho, 3), 3);
        assert_eq!(calculate_box_points(BetType::Wide, 4), 6);
        assert_eq!(calculate_box_points(BetType::Wakuren, 8), 28);
    }

    #[test]
    fn test_box_points_below_minimum() {
        assert_eq!(calculate_box_points(BetType::Tansho, 0), 0);
        assert_eq!(calculate_box_points(BetType::Umaren, 1), 0);
        assert_eq!(calculate_box_points(BetType::Sanrentan, 2), 0);
    }

    #[test]
    fn test_box_points_by_id() {
        assert_eq!(calculate_box_points_by_id("umaren", 5), 10);
        assert_eq!(calculate_box_points_by_id("win5", 5), 0);
    }

    #[test]
    fn test_box_points_repeatable() {
        let first = calculate_box_points(BetType::Sanrentan, 18);
        let second = calculate_box_points(BetType::Sanrentan, 18);
        assert_eq!(first, 4896);
        assert_eq!(first, second);
    }

    #[test]
    fn test_box_points_details_valid() {
        let details = box_points_details(BetType::Umaren, 5);
        assert!(details.is_valid);
        assert_eq!(details.points, 10);
        assert_eq!(details.formula, "5C2 = 10点");
    }

    #[test]
    fn test_box_points_details_out_of_range() {
        let too_few = box_points_details(BetType::Sanrenpuku, 2);
        assert!(!too_few.is_valid);
        assert_eq!(too_few.points, 0);
        assert!(too_few.formula.is_empty());
        assert!(too_few.description.contains("3頭から18頭"));

        let too_many = box_points_details(BetType::Tansho, 19);
        assert!(!too_many.is_valid);
        assert_eq!(too_many.points, 0);
    }

    #[test]
    fn test_nagashi_unordered_pairs() {
        for bet_type in [BetType::Wakuren, BetType::Umaren, BetType::Wide] {
            assert_eq!(calculate_nagashi_points(bet_type, 1, 4, false), NagashiPoints::Single(4));
            assert_eq!(calculate_nagashi_points(bet_type, 2, 4, false), NagashiPoints::Single(4));
            assert_eq!(calculate_nagashi_points(bet_type, 3, 4, false), NagashiPoints::Single(0));
            // Not multi-eligible
            assert_eq!(calculate_nagashi_points(bet_type, 1, 4, true), NagashiPoints::Single(4));
        }
    }

    #[test]
    fn test_nagashi_umatan() {
        assert_eq!(calculate_nagashi_points(BetType::Umatan, 1, 5, false), NagashiPoints::Single(5));
        assert_eq!(
            calculate_nagashi_points(BetType::Umatan, 1, 5, true),
            NagashiPoints::Multi { normal: 5, multi: 10 }
        );
        assert_eq!(calculate_nagashi_points(BetType::Umatan, 2, 5, false), NagashiPoints::Single(10));
        assert_eq!(
            calculate_nagashi_points(BetType::Umatan, 2, 5, true),
            NagashiPoints::Multi { normal: 10, multi: 20 }
        );
        assert_eq!(calculate_nagashi_points(BetType::Umatan, 3, 5, true), NagashiPoints::Single(0));
    }

    #[test]
    fn test_nagashi_sanrenpuku() {
        assert_eq!(calculate_nagashi_points(BetType::Sanrenpuku, 1, 5, false), NagashiPoints::Single(10));
        assert_eq!(calculate_nagashi_points(BetType::Sanrenpuku, 2, 5, false), NagashiPoints::Single(5));
        assert_eq!(calculate_nagashi_points(BetType::Sanrenpuku, 1, 1, false), NagashiPoints::Single(0));
    }

    #[test]
    fn test_nagashi_sanrentan() {
        assert_eq!(calculate_nagashi_points(BetType::Sanrentan, 1, 5, false), NagashiPoints::Single(20));
        assert_eq!(
            calculate_nagashi_points(BetType::Sanrentan, 1, 5, true),
            NagashiPoints::Multi { normal: 20, multi: 40 }
        );
        assert_eq!(
            calculate_nagashi_points(BetType::Sanrentan, 2, 5, true),
            NagashiPoints::Multi { normal: 5, multi: 10 }
        );
    }

    #[test]
    fn test_nagashi_zero_inputs() {
        assert_eq!(calculate_nagashi_points(BetType::Umaren, 0, 4, false), NagashiPoints::Single(0));
        assert_eq!(calculate_nagashi_points(BetType::Umaren, 1, 0, false), NagashiPoints::Single(0));
        assert_eq!(calculate_nagashi_points(BetType::Tansho, 1, 4, false), NagashiPoints::Single(0));
        assert_eq!(calculate_nagashi_points_by_id("exacta", 1, 4, true), NagashiPoints::Single(0));
    }

    #[test]
    fn test_nagashi_huge_opponent_count_saturates() {
        assert_eq!(
            calculate_nagashi_points(BetType::Umatan, 2, u64::MAX, false),
            NagashiPoints::Single(u64::MAX)
        );
        assert_eq!(
            calculate_nagashi_points(BetType::Umatan, 2, u64::MAX, true),
            NagashiPoints::Multi {
                normal: u64::MAX,
                multi: u64::MAX
            }
        );
        assert_eq!(
            calculate_nagashi_points(BetType::Wide, 2, u64::MAX, false),
            NagashiPoints::Single(u64::MAX)
        );
    }

    #[test]
    fn test_nagashi_accessors() {
        let points = calculate_nagashi_points(BetType::Sanrentan, 1, 5, true);
        assert!(points.is_multi());
        assert_eq!(points.normal(), 20);
        assert_eq!(points.purchased(), 40);

        let single = NagashiPoints::Single(4);
        assert_eq!(single.normal(), 4);
        assert_eq!(single.purchased(), 4);
    }

    #[test]
    fn test_formation_sanrentan() {
        // 1st: 1,2 / 2nd: 1,2,3 / 3rd: 1,2,3,4
        let selections = vec![vec![1, 2], vec![1, 2, 3], vec![1, 2, 3, 4]];
        // 1-2-{3,4}, 1-3-{2,4}, 2-1-{3,4}, 2-3-{1,4}
        assert_eq!(calculate_formation_points(BetType::Sanrentan, &selections), 8);
    }

    #[test]
    fn test_formation_sanrenpuku_dedupes_sets() {
        let selections = vec![vec![1, 2], vec![1, 2, 3], vec![1, 2, 3, 4]];
        // {1,2,3}, {1,2,4}, {1,3,4}, {2,3,4}
        assert_eq!(calculate_formation_points(BetType::Sanrenpuku, &selections), 4);
    }

    #[test]
    fn test_formation_pairs() {
        let selections = vec![vec![1, 2], vec![2, 3, 4]];
        assert_eq!(calculate_formation_points(BetType::Umatan, &selections), 5);
        // {1,2},{1,3},{1,4},{2,3},{2,4}
        assert_eq!(calculate_formation_points(BetType::Umaren, &selections), 5);

        let overlapping = vec![vec![1, 2], vec![1, 2]];
        assert_eq!(calculate_formation_points(BetType::Umatan, &overlapping), 2);
        assert_eq!(calculate_formation_points(BetType::Umaren, &overlapping), 1);
    }

    #[test]
    fn test_formation_matches_box() {
        let horses: Vec<u32> = (1..=6).collect();
        let selections = vec![horses.clone(), horses.clone(), horses];
        for bet_type in BetType::ALL {
            assert_eq!(
                calculate_formation_points(bet_type, &selections),
                calculate_box_points(bet_type, 6),
                "{}",
                bet_type
            );
        }
    }

    #[test]
    fn test_formation_missing_or_empty_positions() {
        assert_eq!(calculate_formation_points(BetType::Sanrentan, &[vec![1], vec![2]]), 0);
        assert_eq!(
            calculate_formation_points(BetType::Umatan, &[vec![1, 2], vec![]]),
            0
        );
        assert_eq!(calculate_formation_points(BetType::Tansho, &[vec![3, 3, 5]]), 2);
    }

    #[test]
    fn test_win5_points() {
        assert_eq!(calculate_win5_points(&[2, 3, 1, 4, 2]), 48);
        assert_eq!(calculate_win5_points(&[1, 1, 1, 1, 1]), 1);
        assert_eq!(calculate_win5_points(&[2, 3, 0, 4, 2]), 0);
        assert_eq!(calculate_win5_points(&[2, 3, 1, 4]), 0);
    }

    #[test]
    fn test_total_amount() {
        assert_eq!(total_amount(10, 100), 1000);
        assert_eq!(total_amount(0, 100), 0);
        assert_eq!(total_amount(u64::MAX, 100), u64::MAX);
    }
}
