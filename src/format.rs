//! Display formatting for amounts and point formulas.

use crate::bet_type::BetType;

/// Format a yen amount with thousands separators, e.g. `1,234円`.
pub fn format_yen(amount: u64) -> String {
    format!("{}円", group_thousands(amount))
}

/// Format a point count, e.g. `10点`.
pub fn format_points(points: u64) -> String {
    format!("{}点", group_thousands(points))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// BOX formula string: `5C2 = 10点`, `5P2 = 20点`, or `7 = 7点` for
/// single-horse bet types.
pub fn box_formula(bet_type: BetType, horse_count: u64, points: u64) -> String {
    let r = bet_type.selection_size();
    let expression = if r == 1 {
        horse_count.to_string()
    } else if bet_type.is_ordered() {
        format!("{}P{}", horse_count, r)
    } else {
        format!("{}C{}", horse_count, r)
    };

    format!("{} = {}", expression, format_points(points))
}
