//! Combination (nCr) and permutation (nPr) counts.
//!
//! Both functions are memoized in a process-wide cache keyed on
//! `(operator, n, r)`. The input domain is tiny (n <= 18, r <= 3 for every
//! bet type), so the cache is unbounded.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Operator {
    Combination,
    Permutation,
}

type CacheKey = (Operator, u64, u64);

static CACHE: OnceLock<Mutex<HashMap<CacheKey, u64>>> = OnceLock::new();

fn cache() -> &'static Mutex<HashMap<CacheKey, u64>> {
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn memoized(key: CacheKey, compute: impl FnOnce() -> u64) -> u64 {
    if let Some(&value) = cache()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&key)
    {
        return value;
    }

    let value = compute();
    cache()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(key, value);
    value
}

/// Number of ways to choose `r` items out of `n`, order ignored.
///
/// Returns 0 when `r > n` and 1 when `r == 0` or `r == n`.
/// Saturates at `u64::MAX` for values that do not fit.
pub fn combination(n: u64, r: u64) -> u64 {
    if r > n {
        return 0;
    }
    if r == 0 || r == n {
        return 1;
    }

    memoized((Operator::Combination, n, r), || compute_combination(n, r))
}

/// Number of ordered arrangements of `r` items out of `n`.
///
/// Returns 0 when `r > n` and 1 when `r == 0`.
pub fn permutation(n: u64, r: u64) -> u64 {
    if r > n {
        return 0;
    }
    if r == 0 {
        return 1;
    }

    memoized((Operator::Permutation, n, r), || compute_permutation(n, r))
}

/// Multiply by the next numerator term, then divide by the growing
/// denominator. Each intermediate value is itself a binomial coefficient,
/// so every division is exact.
fn compute_combination(n: u64, r: u64) -> u64 {
    let r = r.min(n - r);
    let mut result: u128 = 1;

    for i in 0..r {
        result = result * u128::from(n - i) / u128::from(i + 1);
        if result > u128::from(u64::MAX) {
            return u64::MAX;
        }
    }

    result as u64
}

fn compute_permutation(n: u64, r: u64) -> u64 {
    (n - r + 1..=n).fold(1u64, |acc, term| acc.saturating_mul(term))
}

/// Number of memoized entries (test helper).
#[cfg(test)]
fn cached_entries() -> usize {
    cache().lock().unwrap_or_else(|e| e.into_inner()).len()
}

#[cfg(test)]
fn is_cached(operator: Operator, n: u64, r: u64) -> bool {
    cache()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .contains_key(&(operator, n, r))
}
