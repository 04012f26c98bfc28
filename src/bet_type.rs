//! JRA bet types (券種) and their selection rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of horses in a field. Used for validation messages only.
pub const MAX_HORSE_COUNT: u64 = 18;

/// Bet type identifier.
///
/// Serialized as the lowercase romanized name (`"umaren"`, `"sanrentan"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    /// 単勝 (win)
    Tansho,
    /// 複勝 (place)
    Fukusho,
    /// 枠連 (bracket quinella)
    Wakuren,
    /// 馬連 (quinella)
    Umaren,
    /// 馬単 (exacta)
    Umatan,
    /// ワイド (quinella place)
    Wide,
    /// 3連複 (trio)
    Sanrenpuku,
    /// 3連単 (trifecta)
    Sanrentan,
}

impl BetType {
    /// All bet types in display order.
    pub const ALL: [BetType; 8] = [
        BetType::Tansho,
        BetType::Fukusho,
        BetType::Wakuren,
        BetType::Umaren,
        BetType::Umatan,
        BetType::Wide,
        BetType::Sanrenpuku,
        BetType::Sanrentan,
    ];

    /// Wire identifier.
    pub fn id(&self) -> &'static str {
        match self {
            BetType::Tansho => "tansho",
            BetType::Fukusho => "fukusho",
            BetType::Wakuren => "wakuren",
            BetType::Umaren => "umaren",
            BetType::Umatan => "umatan",
            BetType::Wide => "wide",
            BetType::Sanrenpuku => "sanrenpuku",
            BetType::Sanrentan => "sanrentan",
        }
    }

    /// Japanese display name.
    pub fn name(&self) -> &'static str {
        match self {
            BetType::Tansho => "単勝",
            BetType::Fukusho => "複勝",
            BetType::Wakuren => "枠連",
            BetType::Umaren => "馬連",
            BetType::Umatan => "馬単",
            BetType::Wide => "ワイド",
            BetType::Sanrenpuku => "3連複",
            BetType::Sanrentan => "3連単",
        }
    }

    /// Base points per ticket. Always 1; not used by the calculators.
    pub fn points(&self) -> u64 {
        1
    }

    pub fn description(&self) -> &'static str {
        match self {
            BetType::Tansho => "1着になる馬を当てる",
            BetType::Fukusho => "3着以内に入る馬を当てる",
            BetType::Wakuren => "1着と2着の枠番の組み合わせを当てる（順不同）",
            BetType::Umaren => "1着と2着の馬番の組み合わせを当てる（順不同）",
            BetType::Umatan => "1着と2着の馬番を着順通りに当てる",
            BetType::Wide => "3着以内に入る2頭の組み合わせを当てる（順不同）",
            BetType::Sanrenpuku => "1着から3着の馬の組み合わせを当てる（順不同）",
            BetType::Sanrentan => "1着から3着の馬を着順通りに当てる",
        }
    }

    /// Minimum number of selected horses for a valid BOX.
    pub fn min_horses(&self) -> u64 {
        self.selection_size()
    }

    /// Number of horses on one ticket (the `r` of nCr / nPr).
    pub fn selection_size(&self) -> u64 {
        match self {
            BetType::Tansho | BetType::Fukusho => 1,
            BetType::Wakuren | BetType::Umaren | BetType::Umatan | BetType::Wide => 2,
            BetType::Sanrenpuku | BetType::Sanrentan => 3,
        }
    }

    /// Whether finishing order matters. Single-horse types are never ordered.
    pub fn is_ordered(&self) -> bool {
        matches!(self, BetType::Umatan | BetType::Sanrentan)
    }

    /// Whether nagashi bets of this type can be bought as マルチ.
    pub fn supports_multi(&self) -> bool {
        self.is_ordered()
    }

    /// Look up a bet type by its wire identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bet_type| bet_type.id() == id)
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BetType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Self::from_id(&id).ok_or_else(|| anyhow::anyhow!("Unknown bet type: {}", s))
    }
}
