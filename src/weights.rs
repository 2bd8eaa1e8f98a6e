//! Weighted slot selection for `SeededGenerator::pick`.
//!
//! The scan keeps a lower bound that is reset to the previous slot's raw
//! weight rather than its cumulative bound. Published draws depend on this
//! exact scan, so it is kept as is. With non-negative weights the raw weight
//! never exceeds the cumulative bound, and any value that failed earlier slots
//! is already at or above it, so the scan selects the same slot a cumulative
//! lower bound would.

use crate::error::{Result, RngError};
use crate::types::safe_integer;

/// Cumulative bounds over a slice of slot weights.
pub struct WeightTable<'a> {
    weights: &'a [u64],
    /// bounds[i] = weights[0] + ... + weights[i].
    bounds: Vec<u64>,
}

impl<'a> WeightTable<'a> {
    /// Build the table, rejecting empty, overflowing, or all-zero weights.
    pub fn new(weights: &'a [u64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(RngError::invalid_weights("no weights given"));
        }

        let mut bounds = Vec::with_capacity(weights.len());
        let mut total: u64 = 0;
        for &w in weights {
            total = total
                .checked_add(w)
                .ok_or_else(|| RngError::invalid_weights("total weight overflows u64"))?;
            bounds.push(total);
        }

        if total == 0 {
            return Err(RngError::invalid_weights("total weight is zero"));
        }

        Ok(Self { weights, bounds })
    }

    #[inline(always)]
    pub fn total(&self) -> u64 {
        // Non-empty by construction.
        self.bounds[self.bounds.len() - 1]
    }

    /// Slot whose range contains `p`, scanning from slot 0.
    ///
    /// `p` is expected in `[0, total)`.
    pub fn select(&self, p: u64) -> Option<usize> {
        let mut last_weight = 0;
        for (i, &bound) in self.bounds.iter().enumerate() {
            if p >= last_weight && p < bound {
                return Some(i);
            }
            last_weight = self.weights[i];
        }
        None
    }
}

/// Convert JS number weights, rejecting anything that is not a
/// non-negative safe integer.
pub fn weights_from_f64(weights: &[f64]) -> Result<Vec<u64>> {
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| match safe_integer(w) {
            Some(v) if v >= 0 => Ok(v as u64),
            _ => Err(RngError::invalid_weights(format!(
                "weight {i} must be a non-negative integer, got {w}"
            ))),
        })
        .collect()
}
