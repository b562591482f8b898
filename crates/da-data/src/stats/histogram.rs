//! Equal-width histogram binning

use serde::{Deserialize, Serialize};

/// One histogram bucket covering `[lower, upper)`; the last bucket also
/// holds `upper` itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    /// Axis label, e.g. `"1.0-2.5"`
    pub fn label(&self) -> String {
        format!("{:.1}-{:.1}", self.lower, self.upper)
    }
}

/// Partition `values` into `bin_count` equal-width bins over `[min, max]`.
///
/// Empty input gives no bins and identical values give a single bin. A
/// `bin_count` of zero is treated as one. Non-finite values are ignored.
pub fn bin(values: &[f64], bin_count: usize) -> Vec<Bin> {
    let finite = || values.iter().copied().filter(|v| v.is_finite());

    let min = finite().fold(f64::INFINITY, f64::min);
    let max = finite().fold(f64::NEG_INFINITY, f64::max);
    if min > max {
        return Vec::new();
    }

    if min == max {
        return vec![Bin {
            lower: min,
            upper: max,
            count: finite().count(),
        }];
    }

    if !(max - min).is_finite() {
        // The span overflows f64; halving is exact and brings it back in range
        let halved: Vec<f64> = finite().map(|v| v / 2.0).collect();
        return bin(&halved, bin_count)
            .into_iter()
            .map(|b| Bin {
                lower: b.lower * 2.0,
                upper: b.upper * 2.0,
                count: b.count,
            })
            .collect();
    }

    let bin_count = bin_count.max(1);
    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    if let Some(last) = bins.last_mut() {
        last.upper = max;
    }

    for value in finite() {
        let index = (((value - min) / width).floor() as usize).min(bin_count - 1);
        bins[index].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(bin(&[], 10).is_empty());
        assert!(bin(&[f64::NAN], 10).is_empty());
    }

    #[test]
    fn test_identical_values_single_bin() {
        let bins = bin(&[1.0, 1.0, 1.0, 1.0], 10);
        assert_eq!(bins, vec![Bin { lower: 1.0, upper: 1.0, count: 4 }]);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let bins = bin(&values, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[9].upper, 10.0);
        assert_eq!(bins[9].count, 2); // 9 and 10
        assert!(bins[..9].iter().all(|b| b.count == 1));
    }

    #[test]
    fn test_counts_sum_to_input_length() {
        let values = [0.1, 0.2, 0.3, 7.7, 3.3, 9.99, 2.5, 2.5, 1e-9, 0.7];
        for bin_count in [1, 2, 3, 7, 10, 50] {
            let bins = bin(&values, bin_count);
            assert_eq!(bins.len(), bin_count);
            assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        }
    }

    #[test]
    fn test_negative_range() {
        let bins = bin(&[-5.0, 0.0, 5.0], 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[1].label(), "0.0-5.0");
    }

    #[test]
    fn test_span_wider_than_f64() {
        let bins = bin(&[-1e308, 0.0, 1e308], 2);
        assert_eq!(bins[0], Bin { lower: -1e308, upper: 0.0, count: 1 });
        assert_eq!(bins[1], Bin { lower: 0.0, upper: 1e308, count: 2 });

        let bins = bin(&[-f64::MAX, f64::MAX], 10);
        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.lower.is_finite() && b.upper.is_finite()));
        assert_eq!(bins[0].lower, -f64::MAX);
        assert_eq!(bins[9].upper, f64::MAX);
        assert_eq!(bins[0].count + bins[9].count, 2);
    }
}
