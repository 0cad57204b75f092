// Dashboard payload domain model
use super::advisory::AdvisoryStatus;
use super::location::Location;
use serde::Serialize;

/// A plotted point, timestamp as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
}

/// Nowcast validation card: the model's estimate of the current reading and
/// how far it sits from the live sensor value.
#[derive(Debug, Clone, Serialize)]
pub struct NowcastCard {
    pub value: i64,
    pub variance: i64,
    pub good_agreement: bool,
}

/// Next-hour forecast card with the expected change against the live value.
#[derive(Debug, Clone, Serialize)]
pub struct NextHourCard {
    pub value: i64,
    pub delta: i64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryView {
    pub status: AdvisoryStatus,
    pub label: String,
    pub color: String,
}

impl AdvisoryView {
    pub fn new(status: AdvisoryStatus) -> Self {
        Self {
            status,
            label: status.label().to_string(),
            color: status.color().to_string(),
        }
    }
}

/// Data for the external chart renderer: trailing history, the forecast
/// horizon, and the single nowcast validation point.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    pub history: Vec<SeriesPoint>,
    pub forecast: Vec<SeriesPoint>,
    pub validation_point: Option<SeriesPoint>,
}

/// One full dashboard refresh. The report generator embeds `live_pm25`,
/// `nowcast.value`, `next_hour.value`, and `advisory.label` verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryDashboard {
    pub location: Location,
    pub live_pm25: f64,
    pub live_aqi: Option<f64>,
    pub advisory: AdvisoryView,
    pub nowcast: Option<NowcastCard>,
    pub next_hour: Option<NextHourCard>,
    pub chart: ChartPayload,
}
