use proptest::prelude::*;
use vitals_baseline::BaselineStats;
use vitals_scorer::scoring::score_vital;

proptest! {
    #[test]
    fn score_is_always_in_unit_range(value in -500.0f64..500.0, mean in -200.0f64..200.0, stddev in 0.1f64..50.0) {
        let stats = BaselineStats { mean, stddev, count: 20 };
        let result = score_vital("heart_rate", value, Some(stats), 20);
        prop_assert!(result.score >= 0.0 && result.score <= 1.0);
    }

    #[test]
    fn is_anomaly_matches_the_half_threshold(value in -500.0f64..500.0, mean in -200.0f64..200.0, stddev in 0.1f64..50.0) {
        let stats = BaselineStats { mean, stddev, count: 20 };
        let result = score_vital("heart_rate", value, Some(stats), 20);
        prop_assert_eq!(result.is_anomaly, result.score > 0.5);
    }
}
