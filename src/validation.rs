//! Input validation for stake amounts and horse counts.
//!
//! Validators never fail; they return a [`ValidationResult`] so the caller
//! can show the message inline.

use serde::Serialize;

use crate::bet_type::{BetType, MAX_HORSE_COUNT};
use crate::format::format_yen;

/// Minimum stake per ticket (yen).
pub const MIN_AMOUNT: u64 = 100;
/// Maximum stake per ticket (yen).
pub const MAX_AMOUNT: u64 = 1_000_000;
/// Stakes are sold in units of this many yen.
pub const AMOUNT_UNIT: u64 = 100;

/// Outcome of validating a user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn valid(value: u64) -> Self {
        Self {
            is_valid: true,
            value: Some(value),
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            value: None,
            error_message: Some(message.into()),
        }
    }
}

/// Validate a stake amount entered as text.
pub fn validate_amount(input: &str) -> ValidationResult {
    let amount = match input.trim().parse::<u64>() {
        Ok(amount) => amount,
        Err(_) => return ValidationResult::invalid("金額を数値で入力してください"),
    };

    if amount < MIN_AMOUNT {
        return ValidationResult::invalid(format!(
            "金額は{}以上で入力してください",
            format_yen(MIN_AMOUNT)
        ));
    }
    if amount % AMOUNT_UNIT != 0 {
        return ValidationResult::invalid(format!(
            "金額は{}単位で入力してください",
            format_yen(AMOUNT_UNIT)
        ));
    }
    if amount > MAX_AMOUNT {
        return ValidationResult::invalid(format!(
            "金額は{}以下で入力してください",
            format_yen(MAX_AMOUNT)
        ));
    }

    ValidationResult::valid(amount)
}

/// Validate a BOX horse count entered as text.
pub fn validate_horse_count(input: &str, bet_type: BetType) -> ValidationResult {
    let count = match input.trim().parse::<u64>() {
        Ok(count) => count,
        Err(_) => return ValidationResult::invalid("頭数を数値で入力してください"),
    };

    let min = bet_type.min_horses();
    if !(min..=MAX_HORSE_COUNT).contains(&count) {
        return ValidationResult::invalid(format!(
            "{}は{}頭から{}頭の間で選択してください",
            bet_type.name(),
            min,
            MAX_HORSE_COUNT
        ));
    }

    ValidationResult::valid(count)
}
