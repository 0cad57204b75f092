// Advisory tier classification
use serde::Serialize;

/// Severity tier derived from the live PM2.5 reading. Thresholds are
/// evaluated highest first with strict comparisons, so a reading of exactly
/// 150 stays at normal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryStatus {
    NormalOperations,
    Unhealthy,
    SevereRisk,
    LockdownLikely,
}

impl AdvisoryStatus {
    pub fn classify(live_pm25: f64) -> Self {
        if live_pm25 > 300.0 {
            AdvisoryStatus::LockdownLikely
        } else if live_pm25 > 200.0 {
            AdvisoryStatus::SevereRisk
        } else if live_pm25 > 150.0 {
            AdvisoryStatus::Unhealthy
        } else {
            AdvisoryStatus::NormalOperations
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdvisoryStatus::LockdownLikely => "LOCKDOWN LIKELY",
            AdvisoryStatus::SevereRisk => "SEVERE RISK",
            AdvisoryStatus::Unhealthy => "UNHEALTHY",
            AdvisoryStatus::NormalOperations => "NORMAL OPERATIONS",
        }
    }

    /// Display color for the tier; presentation metadata only.
    pub fn color(&self) -> &'static str {
        match self {
            AdvisoryStatus::LockdownLikely => "#D50000",
            AdvisoryStatus::SevereRisk => "#AA00FF",
            AdvisoryStatus::Unhealthy => "#FF6D00",
            AdvisoryStatus::NormalOperations => "#00C853",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tiers() {
        assert_eq!(AdvisoryStatus::classify(50.0), AdvisoryStatus::NormalOperations);
        assert_eq!(AdvisoryStatus::classify(160.0), AdvisoryStatus::Unhealthy);
        assert_eq!(AdvisoryStatus::classify(250.0), AdvisoryStatus::SevereRisk);
        assert_eq!(AdvisoryStatus::classify(310.0), AdvisoryStatus::LockdownLikely);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(AdvisoryStatus::classify(150.0), AdvisoryStatus::NormalOperations);
        assert_eq!(AdvisoryStatus::classify(151.0), AdvisoryStatus::Unhealthy);
        assert_eq!(AdvisoryStatus::classify(200.0), AdvisoryStatus::Unhealthy);
        assert_eq!(AdvisoryStatus::classify(300.0), AdvisoryStatus::SevereRisk);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AdvisoryStatus::classify(310.0).label(), "LOCKDOWN LIKELY");
        assert_eq!(AdvisoryStatus::classify(0.0).label(), "NORMAL OPERATIONS");
    }
}
