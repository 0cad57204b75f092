// Forecast pipeline - Nowcast validation, 24h extrapolation, derived metrics
//
// Pure and stateless: one invocation maps (historical series, live reading)
// to (advisory, nowcast, forecast) with nothing retained across runs. The
// validation model must never see the point it predicts, while the
// production model should use every observation, so the pipeline fits the
// same fixed order twice on different slices of the series.
use crate::domain::advisory::AdvisoryStatus;
use crate::domain::arima::{FitError, FittedArima, ModelOrder};
use crate::domain::dashboard::Trend;
use crate::domain::observation::HourlySeries;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub const MODEL_ORDER: ModelOrder = ModelOrder::new(8, 0, 1);
pub const FORECAST_HORIZON: usize = 24;
/// Fewest training observations the estimators will accept after the
/// validation point is withheld.
pub const MIN_TRAIN_LEN: usize = 10;
/// Nowcast variance below this is flagged as good agreement with the sensor.
pub const AGREEMENT_THRESHOLD: i64 = 15;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("upstream acquisition failed: {0}")]
    Acquisition(#[source] anyhow::Error),

    #[error("insufficient history: {observed} training observations, need {required}")]
    InsufficientHistory { observed: usize, required: usize },

    #[error("model fit failed for order ({p}, {d}, {q}) on {observations} observations: {source}")]
    Fit {
        p: usize,
        d: usize,
        q: usize,
        observations: usize,
        #[source]
        source: FitError,
    },
}

impl PipelineError {
    fn fit(order: ModelOrder, observations: usize, source: FitError) -> Self {
        PipelineError::Fit {
            p: order.ar,
            d: order.diff,
            q: order.ma,
            observations,
            source,
        }
    }
}

/// Model-derived estimate of the most recent reading, with its distance
/// from the live sensor value. `time` is the withheld observation's
/// timestamp, anchoring the validation point on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Nowcast {
    pub value: i64,
    pub time: DateTime<Utc>,
    pub variance: i64,
    pub good_agreement: bool,
}

/// The 24-hour forecast horizon plus the next-hour summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub points: Vec<(DateTime<Utc>, f64)>,
    pub next_hour: i64,
    pub delta: i64,
    pub trend: Trend,
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub advisory: AdvisoryStatus,
    pub nowcast: Option<Nowcast>,
    pub forecast: Option<Forecast>,
}

/// Run one full pipeline invocation. Estimator failures degrade their own
/// output to `None`; the advisory is always produced.
pub fn run(series: &HourlySeries, live_pm25: f64) -> PipelineRun {
    let advisory = AdvisoryStatus::classify(live_pm25);

    let nowcast = match nowcast(series, live_pm25) {
        Ok(nowcast) => Some(nowcast),
        Err(e) => {
            tracing::warn!("nowcast unavailable: {e}");
            None
        }
    };

    let forecast = match extrapolate(series, live_pm25) {
        Ok(forecast) => Some(forecast),
        Err(e) => {
            tracing::warn!("forecast unavailable: {e}");
            None
        }
    };

    PipelineRun {
        advisory,
        nowcast,
        forecast,
    }
}

/// Fit the fixed-order model on `values` and predict `horizon` steps.
/// Both estimators go through this one stateless operation; they differ
/// only in the slice of the series they train on.
pub fn fit_and_forecast(values: &[f64], horizon: usize) -> Result<Vec<f64>, FitError> {
    let model = FittedArima::fit(MODEL_ORDER, values)?;
    Ok(model.forecast(horizon))
}

/// Withhold the latest observation, fit on the rest, predict the withheld
/// step. Fractional predictions are truncated toward zero (matching the
/// upstream dashboard's integer coercion).
pub fn nowcast(series: &HourlySeries, live_pm25: f64) -> Result<Nowcast, PipelineError> {
    let (train, holdout) = series
        .holdout_split()
        .ok_or(PipelineError::InsufficientHistory {
            observed: 0,
            required: MIN_TRAIN_LEN,
        })?;
    if train.len() < MIN_TRAIN_LEN {
        return Err(PipelineError::InsufficientHistory {
            observed: train.len(),
            required: MIN_TRAIN_LEN,
        });
    }

    let values: Vec<f64> = train.iter().map(|o| o.pm25).collect();
    let predicted = fit_and_forecast(&values, 1)
        .map_err(|e| PipelineError::fit(MODEL_ORDER, values.len(), e))?;

    let value = predicted[0] as i64;
    let (variance, good_agreement) = nowcast_variance(live_pm25, value);

    Ok(Nowcast {
        value,
        time: holdout.time,
        variance,
        good_agreement,
    })
}

/// Fit on the full series and predict the 24-hour horizon, aligned to
/// hourly timestamps starting one hour after the series' last observation.
pub fn extrapolate(series: &HourlySeries, live_pm25: f64) -> Result<Forecast, PipelineError> {
    // Same minimum-history gate as the nowcast: a series too short to
    // validate is too short to trust a day-ahead extrapolation from.
    if series.len() < MIN_TRAIN_LEN + 1 {
        return Err(PipelineError::InsufficientHistory {
            observed: series.len().saturating_sub(1),
            required: MIN_TRAIN_LEN,
        });
    }
    let last_time = series
        .last()
        .map(|o| o.time)
        .ok_or(PipelineError::InsufficientHistory {
            observed: 0,
            required: MIN_TRAIN_LEN,
        })?;

    let values = series.values();
    let predicted = fit_and_forecast(&values, FORECAST_HORIZON)
        .map_err(|e| PipelineError::fit(MODEL_ORDER, values.len(), e))?;

    let points: Vec<(DateTime<Utc>, f64)> = predicted
        .into_iter()
        .enumerate()
        .map(|(i, value)| (last_time + Duration::hours(i as i64 + 1), value))
        .collect();

    let next_hour = points[0].1 as i64;
    let (delta, trend) = forecast_delta(live_pm25, next_hour);

    Ok(Forecast {
        points,
        next_hour,
        delta,
        trend,
    })
}

fn nowcast_variance(live_pm25: f64, nowcast: i64) -> (i64, bool) {
    let variance = (live_pm25 - nowcast as f64).abs() as i64;
    (variance, variance < AGREEMENT_THRESHOLD)
}

fn forecast_delta(live_pm25: f64, next_hour: i64) -> (i64, Trend) {
    let delta = (next_hour as f64 - live_pm25).abs() as i64;
    let trend = if next_hour as f64 > live_pm25 {
        Trend::Rising
    } else {
        Trend::Falling
    };
    (delta, trend)
}
