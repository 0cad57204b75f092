// Advisory service - Use case for one dashboard refresh
use crate::application::air_quality_repository::{AirQualityReading, AirQualityRepository, Geocoder};
use crate::application::pipeline::{self, PipelineError};
use crate::domain::dashboard::{
    AdvisoryDashboard, AdvisoryView, ChartPayload, NextHourCard, NowcastCard, SeriesPoint,
};
use crate::domain::location::{Coordinates, Location};
use crate::domain::observation::HourlySeries;
use std::sync::Arc;

/// Trailing history window shown on the chart.
const CHART_HISTORY_HOURS: usize = 24;

/// How the caller identified the place to monitor.
#[derive(Debug, Clone)]
pub enum LocationQuery {
    /// A named preset from the locations config.
    Preset(String),
    /// Free text, resolved through the geocoder.
    Address(String),
    /// An explicit coordinate.
    Point(Coordinates),
    /// Nothing given; use the configured default.
    Default,
}

#[derive(Clone)]
pub struct AdvisoryService {
    repository: Arc<dyn AirQualityRepository>,
    geocoder: Arc<dyn Geocoder>,
    presets: Vec<Location>,
    default_location: Location,
}

impl AdvisoryService {
    pub fn new(
        repository: Arc<dyn AirQualityRepository>,
        geocoder: Arc<dyn Geocoder>,
        presets: Vec<Location>,
        default_location: Location,
    ) -> Self {
        Self {
            repository,
            geocoder,
            presets,
            default_location,
        }
    }

    pub fn presets(&self) -> &[Location] {
        &self.presets
    }

    /// Run one dashboard refresh. An acquisition fault surfaces as
    /// `PipelineError::Acquisition` so the handler can render the offline
    /// state; estimator faults have already been absorbed into missing
    /// cards by the pipeline.
    pub async fn get_dashboard(
        &self,
        query: LocationQuery,
    ) -> Result<AdvisoryDashboard, PipelineError> {
        let location = self.resolve_location(query).await;

        let reading = self
            .repository
            .fetch_air_quality(location.coords)
            .await
            .map_err(PipelineError::Acquisition)?;

        let run = pipeline::run(&reading.series, reading.live_pm25);
        Ok(assemble_dashboard(location, reading, run))
    }

    /// Resolve the query to a concrete location. Unknown presets, geocoder
    /// faults, and unmatched addresses all fall back to the default
    /// location; the fallback only changes what gets fetched next.
    async fn resolve_location(&self, query: LocationQuery) -> Location {
        match query {
            LocationQuery::Preset(name) => self
                .presets
                .iter()
                .find(|l| l.name.eq_ignore_ascii_case(&name))
                .cloned()
                .unwrap_or_else(|| {
                    tracing::warn!("unknown location preset {name:?}, using default");
                    self.default_location.clone()
                }),
            LocationQuery::Address(address) => match self.geocoder.geocode(&address).await {
                Ok(Some(coords)) => Location::new(address, coords),
                Ok(None) => {
                    tracing::warn!("no geocoder match for {address:?}, using default");
                    self.default_location.clone()
                }
                Err(e) => {
                    tracing::warn!("geocoder failed for {address:?}: {e:#}, using default");
                    self.default_location.clone()
                }
            },
            LocationQuery::Point(coords) => Location::new(
                format!("{:.4}, {:.4}", coords.latitude, coords.longitude),
                coords,
            ),
            LocationQuery::Default => self.default_location.clone(),
        }
    }
}

fn assemble_dashboard(
    location: Location,
    reading: AirQualityReading,
    run: pipeline::PipelineRun,
) -> AdvisoryDashboard {
    let chart = ChartPayload {
        history: history_points(&reading.series),
        forecast: run
            .forecast
            .as_ref()
            .map(|f| {
                f.points
                    .iter()
                    .map(|(time, value)| SeriesPoint::new(time.timestamp_millis(), *value))
                    .collect()
            })
            .unwrap_or_default(),
        validation_point: run
            .nowcast
            .as_ref()
            .map(|n| SeriesPoint::new(n.time.timestamp_millis(), n.value as f64)),
    };

    AdvisoryDashboard {
        location,
        live_pm25: reading.live_pm25,
        live_aqi: reading.live_aqi,
        advisory: AdvisoryView::new(run.advisory),
        nowcast: run.nowcast.map(|n| NowcastCard {
            value: n.value,
            variance: n.variance,
            good_agreement: n.good_agreement,
        }),
        next_hour: run.forecast.map(|f| NextHourCard {
            value: f.next_hour,
            delta: f.delta,
            trend: f.trend,
        }),
        chart,
    }
}

fn history_points(series: &HourlySeries) -> Vec<SeriesPoint> {
    series
        .tail(CHART_HISTORY_HOURS)
        .iter()
        .map(|o| SeriesPoint::new(o.time.timestamp_millis(), o.pm25))
        .collect()
}
