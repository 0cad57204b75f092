// Air-quality observation domain models
use chrono::{DateTime, NaiveDateTime, Utc};

/// A single PM2.5 reading (µg/m³) at an hourly timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    pub pm25: f64,
}

impl Observation {
    pub fn new(time: DateTime<Utc>, pm25: f64) -> Self {
        Self { time, pm25 }
    }
}

/// Hourly PM2.5 series covering the upstream lookback window.
///
/// Invariant: observations are sorted ascending by timestamp with no
/// duplicates. Both constructors normalize their input, so the rest of the
/// pipeline can rely on ordering without re-checking.
#[derive(Debug, Clone)]
pub struct HourlySeries {
    observations: Vec<Observation>,
}

impl HourlySeries {
    /// Build a series from the upstream wire shape: parallel arrays of hour
    /// stamps and optional values. Entries with a missing value or an
    /// unparseable timestamp are dropped.
    pub fn from_raw(times: &[String], values: &[Option<f64>]) -> Self {
        let observations = times
            .iter()
            .zip(values)
            .filter_map(|(time, value)| {
                let value = (*value)?;
                let time = parse_hour_stamp(time)?;
                Some(Observation::new(time, value))
            })
            .collect();
        Self::from_observations(observations)
    }

    /// Normalize a raw observation list: sort ascending, de-duplicate
    /// timestamps (last entry wins).
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.time);
        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(prev) if prev.time == obs.time => *prev = obs,
                _ => deduped.push(obs),
            }
        }
        Self {
            observations: deduped,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Concentration values in time order, the model input shape.
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.pm25).collect()
    }

    /// Trailing `n` observations (the whole series when shorter).
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    /// Split off the most recent observation as validation ground truth.
    /// Returns `None` on an empty series.
    pub fn holdout_split(&self) -> Option<(&[Observation], &Observation)> {
        let (holdout, train) = self.observations.split_last()?;
        Some((train, holdout))
    }
}

/// Parse an upstream hour stamp. The feed emits zone-less ISO-8601
/// ("2026-08-07T14:00", UTC implied); RFC 3339 is accepted as a fallback.
fn parse_hour_stamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamps(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_raw_parses_and_sorts() {
        let times = stamps(&[
            "2026-08-07T02:00",
            "2026-08-07T00:00",
            "2026-08-07T01:00",
        ]);
        let values = vec![Some(30.0), Some(10.0), Some(20.0)];

        let series = HourlySeries::from_raw(&times, &values);

        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_from_raw_drops_gaps_and_garbage() {
        let times = stamps(&["2026-08-07T00:00", "not-a-time", "2026-08-07T02:00"]);
        let values = vec![Some(10.0), Some(20.0), None];

        let series = HourlySeries::from_raw(&times, &values);

        assert_eq!(series.len(), 1);
        assert_eq!(series.values(), vec![10.0]);
    }

    #[test]
    fn test_duplicate_timestamps_last_wins() {
        let times = stamps(&["2026-08-07T00:00", "2026-08-07T00:00", "2026-08-07T01:00"]);
        let values = vec![Some(10.0), Some(15.0), Some(20.0)];

        let series = HourlySeries::from_raw(&times, &values);

        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), vec![15.0, 20.0]);
    }

    #[test]
    fn test_rfc3339_fallback() {
        let times = stamps(&["2026-08-07T00:00:00+00:00"]);
        let series = HourlySeries::from_raw(&times, &[Some(5.0)]);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_holdout_split_is_strict_prefix() {
        let times: Vec<String> = (0..12).map(|h| format!("2026-08-07T{h:02}:00")).collect();
        let values: Vec<Option<f64>> = (0..12).map(|h| Some(h as f64)).collect();
        let series = HourlySeries::from_raw(&times, &values);

        let (train, holdout) = series.holdout_split().unwrap();

        assert_eq!(train.len(), series.len() - 1);
        assert_eq!(holdout.pm25, 11.0);
        assert!(train.windows(2).all(|w| w[0].time < w[1].time));
        assert!(train.last().unwrap().time < holdout.time);
    }

    #[test]
    fn test_holdout_split_empty() {
        let series = HourlySeries::from_observations(Vec::new());
        assert!(series.holdout_split().is_none());
    }

    #[test]
    fn test_tail_shorter_than_request() {
        let times = stamps(&["2026-08-07T00:00", "2026-08-07T01:00"]);
        let series = HourlySeries::from_raw(&times, &[Some(1.0), Some(2.0)]);
        assert_eq!(series.tail(24).len(), 2);
        assert_eq!(series.tail(1)[0].pm25, 2.0);
    }
}
