//! Compensated floating point accumulation.
//!
//! Exposure totals sum millions of products of very different magnitude
//! (dense urban cells next to empty rural ones). Neumaier's variant of Kahan
//! summation keeps the running error term so the total does not depend on
//! iteration order beyond rounding of the final value.

use std::iter::Sum;

/// Running sum with a compensation term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    /// Create an empty accumulator.
    pub const fn new() -> Self {
        Self {
            sum: 0.0,
            compensation: 0.0,
        }
    }

    /// Add a value.
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Current total.
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl Sum<f64> for CompensatedSum {
    fn sum<I: Iterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for value in iter {
            acc.add(value);
        }
        acc
    }
}

impl<'a> Sum<&'a f64> for CompensatedSum {
    fn sum<I: Iterator<Item = &'a f64>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Compensated sum of a sequence.
pub fn compensated_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().sum::<CompensatedSum>().total()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(CompensatedSum::new().total(), 0.0);
    }

    #[test]
    fn test_recovers_cancelled_terms() {
        // Naive summation returns 0.0 here.
        let values = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(compensated_sum(values), 2.0);
    }

    #[test]
    fn test_many_small_terms() {
        let values = std::iter::repeat_n(0.1, 10_000);
        assert!((compensated_sum(values) - 1000.0).abs() < 1e-12);
    }
}
