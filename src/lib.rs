//! Keiba points - betting combination calculator
//!
//! This library provides:
//! - nCr / nPr combinatorics with memoization
//! - The JRA bet type rule table (単勝 through 3連単)
//! - BOX, nagashi (流し), formation and WIN5 point counts
//! - Input validation and yen formatting
//! - A bounded calculation history with debounced writes
//!
//! # Example
//!
//! ```
//! use keiba_points::bet_type::BetType;
//! use keiba_points::points::{calculate_box_points, calculate_nagashi_points, NagashiPoints};
//!
//! assert_eq!(calculate_box_points(BetType::Sanrentan, 5), 60);
//!
//! match calculate_nagashi_points(BetType::Sanrentan, 1, 5, true) {
//!     NagashiPoints::Multi { normal, multi } => assert_eq!((normal, multi), (20, 40)),
//!     NagashiPoints::Single(points) => println!("{} points", points),
//! }
//! ```

pub mod bet_type;
pub mod cli;
pub mod combinatorics;
pub mod config;
pub mod format;
pub mod points;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use bet_type::{BetType, MAX_HORSE_COUNT};
pub use points::{
    box_points_details, calculate_box_points, calculate_formation_points,
    calculate_nagashi_points, calculate_win5_points, BoxPointsDetails, NagashiPoints,
};
pub use storage::{CalculationHistory, DebouncedWriter, HistoryStore};
