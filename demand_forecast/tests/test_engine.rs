use chrono::{Datelike, Months, NaiveDate};
use demand_forecast::error::ForecastError;
use demand_forecast::{
    ForecastEngine, ForecastParameters, ForecastSummarizer, TimeSeries, TrainedForecastModel,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;

fn month_ends(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| {
            let first = NaiveDate::from_ymd_opt(start.year(), start.month(), 1).unwrap()
                + Months::new(i as u32 + 1);
            first.pred_opt().unwrap()
        })
        .collect()
}

fn series_from(values: Vec<f64>) -> TimeSeries {
    let dates = month_ends(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(), values.len());
    TimeSeries::new("P001", dates, values).unwrap()
}

fn noisy_constant(n: usize, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 2.0).unwrap();
    series_from((0..n).map(|_| 100.0 + noise.sample(&mut rng)).collect())
}

fn seasonal_trend(n: usize) -> TimeSeries {
    series_from(
        (0..n)
            .map(|t| {
                let angle = 2.0 * std::f64::consts::PI * t as f64 / 12.0;
                200.0 + 1.5 * t as f64 + 25.0 * angle.sin()
            })
            .collect(),
    )
}

#[test]
fn test_noisy_constant_scenario() {
    let series = noisy_constant(36, 42);
    let last_date = series.last_date();
    let params = ForecastParameters::new(6, 0.3, 12).unwrap();

    let result = ForecastEngine::new().forecast_series(series, params).unwrap();
    assert_eq!(result.forecast_values().len(), 6);
    assert_eq!(result.forecast_dates()[0], NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    assert!(result.forecast_dates()[0] > last_date);

    let summary = ForecastSummarizer::new()
        .summarize(&result, "P001", "Blue Widget")
        .unwrap();
    assert_eq!(summary.periods, 6);
    assert!(
        (summary.statistics.mean - 100.0).abs() < 10.0,
        "mean {} outside the noise band",
        summary.statistics.mean
    );
    assert!(summary.statistics.min <= summary.statistics.mean);
    assert!(summary.statistics.mean <= summary.statistics.max);
}

#[test]
fn test_short_series_scenario() {
    let series = noisy_constant(10, 7);
    let params = ForecastParameters::new(6, 0.3, 12).unwrap();

    let err = ForecastEngine::new().forecast_series(series, params).unwrap_err();
    match err {
        ForecastError::InsufficientData { n, m } => {
            assert_eq!(n, 10);
            assert_eq!(m, 12);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_nan_scenario() {
    let mut values: Vec<f64> = seasonal_trend(36).values().to_vec();
    values[17] = f64::NAN;
    let params = ForecastParameters::new(6, 0.3, 12).unwrap();

    let err = ForecastEngine::new()
        .forecast_series(series_from(values), params)
        .unwrap_err();
    assert!(matches!(err, ForecastError::ModelFit(_)));
    assert!(err.to_string().contains("observation 18"));
}

#[test]
fn test_constant_series_is_model_fit_error() {
    let params = ForecastParameters::new(6, 0.3, 12).unwrap();
    let err = ForecastEngine::new()
        .forecast_series(series_from(vec![50.0; 36]), params)
        .unwrap_err();
    assert!(matches!(err, ForecastError::ModelFit(_)));
}

#[test]
fn test_small_unit_series_is_not_constant() {
    let values = (0..36)
        .map(|i| 1e-7 * ((i % 12) as f64 + 0.1 * i as f64))
        .collect();
    let params = ForecastParameters::new(6, 0.3, 12).unwrap();

    let result = ForecastEngine::new()
        .forecast_series(series_from(values), params)
        .unwrap();
    assert_eq!(result.forecast_values().len(), 6);
    assert!(result.forecast_values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_idempotence() {
    let params = ForecastParameters::new(12, 0.4, 12).unwrap();
    let engine = ForecastEngine::new();

    let first = engine.forecast_series(noisy_constant(48, 3), params).unwrap();
    let second = engine.forecast_series(noisy_constant(48, 3), params).unwrap();

    assert_eq!(first.forecast_values(), second.forecast_values());
    assert_eq!(first.forecast_dates(), second.forecast_dates());
    assert_eq!(first.model().beta(), second.model().beta());
    assert_eq!(first.model().gamma(), second.model().gamma());
}

#[rstest]
#[case(1)]
#[case(6)]
#[case(24)]
fn test_horizon_boundaries(#[case] horizon: usize) {
    let params = ForecastParameters::new(horizon, 0.3, 12).unwrap();
    let result = ForecastEngine::new()
        .forecast_series(seasonal_trend(36), params)
        .unwrap();

    assert_eq!(result.forecast_values().len(), horizon);
    assert_eq!(result.forecast_dates().len(), horizon);
    assert!(result.forecast_dates().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(
        *result.forecast_dates().last().unwrap(),
        month_ends(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), horizon)[horizon - 1]
    );
}

#[rstest]
#[case(0.01)]
#[case(0.3)]
#[case(1.0)]
fn test_coefficient_bounds(#[case] alpha: f64) {
    let params = ForecastParameters::new(6, alpha, 12).unwrap();
    let result = ForecastEngine::new()
        .forecast_series(seasonal_trend(36), params)
        .unwrap();

    let model = result.model();
    assert_eq!(model.alpha(), alpha);
    assert!((0.0..=1.0).contains(&model.beta()));
    assert!(model.gamma() >= 0.0 && model.gamma() <= 1.0 - alpha + 1e-12);
}

#[test]
fn test_tracks_seasonal_trend() {
    let params = ForecastParameters::new(12, 0.3, 12).unwrap();
    let result = ForecastEngine::new()
        .forecast_series(seasonal_trend(48), params)
        .unwrap();

    let expected = seasonal_trend(60).values()[48..].to_vec();
    for (forecast, truth) in result.forecast_values().iter().zip(expected) {
        assert!(
            (forecast - truth).abs() < 2.0,
            "forecast {} too far from {}",
            forecast,
            truth
        );
    }

    let accuracy = result.model().in_sample_accuracy().unwrap();
    assert!(accuracy.mae >= 0.0);
    assert!(accuracy.rmse >= accuracy.mae);
}

#[test]
fn test_shorter_season_accepts_shorter_history() {
    let series = noisy_constant(10, 11);
    let params = ForecastParameters::new(3, 0.3, 4).unwrap();

    let result = ForecastEngine::new().forecast_series(series, params).unwrap();
    assert_eq!(result.forecast_values().len(), 3);
}

proptest! {
    #[test]
    fn prop_long_enough_series_forecasts_h_values(
        noise in prop::collection::vec(-50.0f64..50.0, 24..60),
        horizon in 1usize..=24,
        period in 1usize..=12,
        alpha in 0.01f64..=1.0,
    ) {
        let values: Vec<f64> = noise
            .iter()
            .enumerate()
            .map(|(i, v)| 500.0 + v + i as f64)
            .collect();
        let series = series_from(values);
        let params = ForecastParameters::new(horizon, alpha, period).unwrap();

        let (forecast, _) = ForecastEngine::new().fit_and_forecast(&series, &params).unwrap();
        prop_assert_eq!(forecast.len(), horizon);
        prop_assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn prop_short_series_is_rejected(
        period in 2usize..=12,
        len_seed in 0usize..1000,
    ) {
        let n = 1 + len_seed % (2 * period - 1);
        let values: Vec<f64> = (0..n).map(|i| 10.0 + i as f64).collect();
        let series = series_from(values);
        let params = ForecastParameters::new(6, 0.3, period).unwrap();

        let err = ForecastEngine::new().fit_and_forecast(&series, &params).unwrap_err();
        let is_insufficient = matches!(err, ForecastError::InsufficientData { n: got_n, m } if got_n == n && m == period);
        prop_assert!(is_insufficient);
    }
}
