//! Statistical helpers for the bias analyses.

use crate::config::SkewnessMethod;
use indexmap::IndexMap;
use polars::prelude::*;

/// Frequencies of each distinct non-null value, keyed by its string form,
/// in order of first appearance.
pub(crate) fn class_frequencies(series: &Series) -> PolarsResult<IndexMap<String, usize>> {
    let non_null = series.drop_nulls();
    let str_series = non_null.cast(&DataType::String)?;
    let str_chunked = str_series.str()?;

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for val in str_chunked.into_iter().flatten() {
        *counts.entry(val.to_string()).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Most and least frequent entries. Ties go to the value seen first.
pub(crate) fn majority_and_minority(
    counts: &IndexMap<String, usize>,
) -> Option<((&str, usize), (&str, usize))> {
    let mut entries = counts.iter().map(|(value, count)| (value.as_str(), *count));
    let first = entries.next()?;

    let (majority, minority) = entries.fold((first, first), |(max, min), entry| {
        (
            if entry.1 > max.1 { entry } else { max },
            if entry.1 < min.1 { entry } else { min },
        )
    });

    Some((majority, minority))
}

/// Finite values of a numeric series as f64. Nulls, NaN and infinities are dropped.
pub(crate) fn finite_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.drop_nulls().cast(&DataType::Float64)?;
    let values = float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    Ok(values)
}

/// Skewness of a sample: the mean of ((x - mean) / sd)^3, optionally
/// adjusted for sample size.
///
/// Returns `None` when it is undefined: fewer than three values or zero
/// variance.
pub(crate) fn skewness(values: &[f64], method: SkewnessMethod) -> Option<f64> {
    let n = values.len();
    if n < 3 || values.iter().all(|v| *v == values[0]) {
        return None;
    }
    let n_f = n as f64;

    // running mean, avoids summing large values
    let mean = values
        .iter()
        .enumerate()
        .fold(0.0_f64, |mean, (i, &v)| mean + (v - mean) / (i + 1) as f64);

    // deviations are scaled into [-1, 1] before any power is taken
    let scale = values
        .iter()
        .map(|&v| (v - mean).abs())
        .fold(0.0_f64, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let scaled: Vec<f64> = values.iter().map(|&v| (v - mean) / scale).collect();

    let sd = (scaled.iter().map(|z| z * z).sum::<f64>() / n_f).sqrt();
    if sd == 0.0 {
        return None;
    }

    let g1 = scaled.iter().map(|z| (z / sd).powi(3)).sum::<f64>() / n_f;
    let value = match method {
        SkewnessMethod::FisherPearson => g1,
        SkewnessMethod::AdjustedFisherPearson => g1 * (n_f * (n_f - 1.0)).sqrt() / (n_f - 2.0),
    };

    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== class_frequencies tests ====================

    #[test]
    fn test_class_frequencies_first_appearance_order() {
        let series = Series::new("val".into(), &[Some("b"), Some("a"), None, Some("b")]);
        let counts = class_frequencies(&series).unwrap();

        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            vec![("b".to_string(), 2), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_class_frequencies_boolean() {
        let series = Series::new("flag".into(), &[true, true, false]);
        let counts = class_frequencies(&series).unwrap();
        assert_eq!(counts.get("true"), Some(&2));
        assert_eq!(counts.get("false"), Some(&1));
    }

    // ==================== majority_and_minority tests ====================

    #[test]
    fn test_majority_and_minority_multi_class() {
        let counts: IndexMap<String, usize> = [("a", 5), ("b", 1), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let (majority, minority) = majority_and_minority(&counts).unwrap();
        assert_eq!(majority, ("a", 5));
        assert_eq!(minority, ("b", 1));
    }

    #[test]
    fn test_majority_and_minority_ties_keep_first() {
        let counts: IndexMap<String, usize> = [("x", 2), ("y", 2), ("z", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let (majority, minority) = majority_and_minority(&counts).unwrap();
        assert_eq!(majority.0, "x");
        assert_eq!(minority.0, "x");
    }

    #[test]
    fn test_majority_and_minority_empty() {
        assert!(majority_and_minority(&IndexMap::new()).is_none());
    }

    // ==================== skewness tests ====================

    #[test]
    fn test_skewness_symmetric() {
        let skew = skewness(&[1.0, 2.0, 3.0, 4.0, 5.0], SkewnessMethod::FisherPearson).unwrap();
        assert!(skew.abs() < 1e-12);
    }

    #[test]
    fn test_skewness_known_value() {
        // mean 2.8, sd = 3.6, mean of cubed z-scores = 1.5
        let skew =
            skewness(&[1.0, 1.0, 1.0, 1.0, 10.0], SkewnessMethod::FisherPearson).unwrap();
        assert!((skew - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_skewness_adjusted() {
        // G1 = 1.5 * sqrt(5 * 4) / 3
        let skew = skewness(
            &[1.0, 1.0, 1.0, 1.0, 10.0],
            SkewnessMethod::AdjustedFisherPearson,
        )
        .unwrap();
        assert!((skew - 1.5 * 20f64.sqrt() / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_skewness_is_scale_invariant() {
        let base = [1.0, 1.0, 1.0, 1.0, 10.0];
        let expected = skewness(&base, SkewnessMethod::FisherPearson).unwrap();

        for factor in [1e-200, 1e110, 1e200] {
            let scaled = base.map(|v| v * factor);
            let skew = skewness(&scaled, SkewnessMethod::FisherPearson)
                .unwrap_or_else(|| panic!("skewness undefined at scale {factor}"));
            assert!(
                (skew - expected).abs() < 1e-9,
                "scale {factor}: {skew} vs {expected}"
            );
        }
    }

    #[test]
    fn test_skewness_sign_mirrors() {
        let pos = skewness(&[1.0, 1.0, 1.0, 1.0, 10.0], SkewnessMethod::FisherPearson).unwrap();
        let neg = skewness(
            &[-1.0, -1.0, -1.0, -1.0, -10.0],
            SkewnessMethod::FisherPearson,
        )
        .unwrap();
        assert!(pos > 0.0);
        assert!(neg < 0.0);
        assert!((pos + neg).abs() < 1e-12);
    }

    #[test]
    fn test_skewness_undefined() {
        assert_eq!(skewness(&[1.0, 100.0], SkewnessMethod::FisherPearson), None);
        assert_eq!(skewness(&[0.1, 0.1, 0.1, 0.1], SkewnessMethod::FisherPearson), None);
        assert_eq!(skewness(&[], SkewnessMethod::AdjustedFisherPearson), None);
    }

    // ==================== finite_values tests ====================

    #[test]
    fn test_finite_values_drops_nulls_and_nan() {
        let series = Series::new(
            "val".into(),
            &[Some(1.0f64), None, Some(f64::NAN), Some(f64::INFINITY), Some(2.0)],
        );
        assert_eq!(finite_values(&series).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_finite_values_from_integers() {
        let series = Series::new("val".into(), &[Some(3i64), None, Some(5)]);
        assert_eq!(finite_values(&series).unwrap(), vec![3.0, 5.0]);
    }
}
