use crate::errors::CcTreeError;
use std::collections::BTreeMap;

// Validation
pub fn validate_positive_float_parameter(value: f64, parameter: &str) -> Result<(), CcTreeError> {
    validate_float_parameter(value, 0.0, f64::INFINITY, parameter)
}

pub fn validate_float_parameter(value: f64, min: f64, max: f64, parameter: &str) -> Result<(), CcTreeError> {
    if value.is_nan() || value < min || max < value {
        let ex_msg = format!("real value within range {} and {}", min, max);
        Err(CcTreeError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Number of distinct values in a slice.
pub fn n_distinct<L: Ord>(labels: &[L]) -> usize {
    let mut seen: Vec<&L> = labels.iter().collect();
    seen.sort();
    seen.dedup();
    seen.len()
}

/// Empirical frequency of each symbol, in the order of `symbols`.
///
/// Labels that are not among the symbols are ignored, an empty label
/// slice gives all zeros.
pub fn class_frequencies<L: Ord>(labels: &[L], symbols: &[L]) -> Vec<f64> {
    let mut counts: BTreeMap<&L, usize> = symbols.iter().map(|s| (s, 0)).collect();
    for l in labels {
        if let Some(c) = counts.get_mut(l) {
            *c += 1;
        }
    }
    if labels.is_empty() {
        return vec![0.0; symbols.len()];
    }
    let n = labels.len() as f64;
    symbols.iter().map(|s| counts[s] as f64 / n).collect()
}

/// Index of the largest value, first one wins on ties.
#[inline]
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

/// Index of the smallest value that is not NaN, first one wins on ties.
#[inline]
pub fn argmin(v: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, x) in v.iter().enumerate() {
        if x.is_nan() {
            continue;
        }
        match best {
            Some(b) if v[b] <= *x => (),
            _ => best = Some(i),
        }
    }
    best
}

/// Check that a probability vector has the expected length and sums to one.
pub fn is_distribution(p: &[f64], len: usize, tolerance: f64) -> bool {
    p.len() == len && p.iter().all(|x| *x >= 0.0) && (p.iter().sum::<f64>() - 1.0).abs() <= tolerance
}

/// Smallest representable value strictly greater than `x`.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}
