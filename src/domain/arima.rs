// ARIMA model fitting for the forecast pipeline
//
// AR coefficients come from the Yule-Walker equations solved with
// Levinson-Durbin recursion; MA coefficients are estimated from the
// autocorrelation of the fit residuals and clamped for stability.
use thiserror::Error;

/// The (p, d, q) triple controlling how the model weights past values,
/// differencing, and past errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOrder {
    pub ar: usize,
    pub diff: usize,
    pub ma: usize,
}

impl ModelOrder {
    pub const fn new(ar: usize, diff: usize, ma: usize) -> Self {
        Self { ar, diff, ma }
    }

    /// Fewest observations a fit will accept for this order.
    pub const fn min_observations(&self) -> usize {
        self.ar + self.diff + self.ma + 1
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("series contains NaN or infinite values")]
    InvalidData,

    #[error("degenerate series: {0}")]
    Degenerate(&'static str),
}

/// An immutable fitted model. Fitting consumes nothing and shares nothing:
/// two fits on the same input are independent and produce identical
/// forecasts, so the validation and production models can coexist.
#[derive(Debug, Clone)]
pub struct FittedArima {
    order: ModelOrder,
    ar_coeffs: Vec<f64>,
    ma_coeffs: Vec<f64>,
    mean: f64,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    // Last value of the series at each differencing level, innermost first,
    // recorded for undifferencing forecasts back to the original scale.
    level_anchors: Vec<f64>,
}

impl FittedArima {
    pub fn fit(order: ModelOrder, data: &[f64]) -> Result<Self, FitError> {
        let required = order.min_observations();
        if data.len() < required {
            return Err(FitError::InsufficientData {
                required,
                actual: data.len(),
            });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(FitError::InvalidData);
        }

        let mut level_anchors = Vec::with_capacity(order.diff);
        let mut differenced = data.to_vec();
        for _ in 0..order.diff {
            level_anchors.push(*differenced.last().unwrap_or(&0.0));
            differenced = difference(&differenced);
        }

        let n = differenced.len();
        let mean = differenced.iter().sum::<f64>() / n as f64;
        let autocov = autocovariance(&differenced, mean, order.ar);
        if autocov[0] <= 1e-12 {
            return Err(FitError::Degenerate("series has no variance"));
        }

        let ar_coeffs = levinson_durbin(&autocov, order.ar);

        // One-step in-sample residuals from the AR part
        let mut residuals = vec![0.0; n];
        for i in order.ar..n {
            let mut prediction = mean;
            for (j, coeff) in ar_coeffs.iter().enumerate() {
                prediction += coeff * (differenced[i - j - 1] - mean);
            }
            residuals[i] = differenced[i] - prediction;
        }

        let ma_coeffs = estimate_ma(&residuals, order.ma);

        Ok(Self {
            order,
            ar_coeffs,
            ma_coeffs,
            mean,
            differenced,
            residuals,
            level_anchors,
        })
    }

    /// Point forecasts for the next `steps` values on the original scale.
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        if steps == 0 {
            return Vec::new();
        }

        let n = self.differenced.len();
        let mut extended = self.differenced.clone();
        let mut extended_residuals = self.residuals.clone();

        for _ in 0..steps {
            let mut next = self.mean;
            for (j, coeff) in self.ar_coeffs.iter().enumerate() {
                let idx = extended.len() - j - 1;
                next += coeff * (extended[idx] - self.mean);
            }
            for (j, coeff) in self.ma_coeffs.iter().enumerate() {
                if extended_residuals.len() > j {
                    let idx = extended_residuals.len() - j - 1;
                    next += coeff * extended_residuals[idx];
                }
            }
            extended.push(next);
            // Future shocks are taken as zero
            extended_residuals.push(0.0);
        }

        self.undifference(&extended[n..])
    }

    pub fn order(&self) -> ModelOrder {
        self.order
    }

    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for anchor in self.level_anchors.iter().rev() {
            let mut level = *anchor;
            for value in result.iter_mut() {
                level += *value;
                *value = level;
            }
        }
        result
    }
}

fn difference(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

fn autocovariance(data: &[f64], mean: f64, max_lag: usize) -> Vec<f64> {
    let n = data.len();
    let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();
    (0..=max_lag)
        .map(|lag| {
            let mut sum = 0.0;
            for i in lag..n {
                sum += centered[i] * centered[i - lag];
            }
            sum / n as f64
        })
        .collect()
}

/// Solve the Yule-Walker equations via Levinson-Durbin recursion.
/// `autocov` must hold lags 0..=p with `autocov[0] > 0`.
fn levinson_durbin(autocov: &[f64], p: usize) -> Vec<f64> {
    if p == 0 {
        return Vec::new();
    }

    let mut coeffs = vec![0.0; p];
    coeffs[0] = autocov[1] / autocov[0];

    for k in 1..p {
        let mut numer = autocov[k + 1];
        for j in 0..k {
            numer -= coeffs[j] * autocov[k - j];
        }

        let mut denom = autocov[0];
        for j in 0..k {
            denom -= coeffs[j] * autocov[j + 1];
        }

        // Near-singular step: keep the lower-order solution
        if denom.abs() <= 1e-10 {
            continue;
        }

        let reflection = numer / denom;
        let previous = coeffs.clone();
        coeffs[k] = reflection;
        for j in 0..k {
            coeffs[j] = previous[j] - reflection * previous[k - 1 - j];
        }
    }

    coeffs
}

fn estimate_ma(residuals: &[f64], q: usize) -> Vec<f64> {
    if q == 0 || residuals.is_empty() {
        return vec![0.0; q];
    }

    let n = residuals.len();
    let mean = residuals.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = residuals.iter().map(|x| x - mean).collect();
    let variance = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;

    let mut coeffs = vec![0.0; q];
    if variance > 1e-12 {
        for k in 0..q {
            let mut sum = 0.0;
            for i in (k + 1)..n {
                sum += centered[i] * centered[i - k - 1];
            }
            coeffs[k] = ((sum / n as f64) / variance).clamp(-0.99, 0.99);
        }
    }
    coeffs
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: ModelOrder = ModelOrder::new(8, 0, 1);

    fn noisy_series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 80.0 + 20.0 * (i as f64 * 0.4).sin() + (i % 5) as f64)
            .collect()
    }

    #[test]
    fn test_min_observations() {
        assert_eq!(ORDER.min_observations(), 10);
        assert_eq!(ModelOrder::new(1, 1, 0).min_observations(), 3);
    }

    #[test]
    fn test_fit_and_forecast() {
        let data = noisy_series(72);
        let model = FittedArima::fit(ORDER, &data).unwrap();
        assert_eq!(model.order(), ORDER);

        let forecast = model.forecast(24);
        assert_eq!(forecast.len(), 24);
        assert!(forecast.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_fit_at_exact_minimum() {
        let data = noisy_series(10);
        let model = FittedArima::fit(ORDER, &data).unwrap();
        assert_eq!(model.forecast(1).len(), 1);
    }

    #[test]
    fn test_insufficient_data() {
        let data = noisy_series(9);
        let err = FittedArima::fit(ORDER, &data).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientData {
                required: 10,
                actual: 9
            }
        );
    }

    #[test]
    fn test_invalid_data() {
        let mut data = noisy_series(20);
        data[7] = f64::NAN;
        assert_eq!(FittedArima::fit(ORDER, &data).unwrap_err(), FitError::InvalidData);
    }

    #[test]
    fn test_constant_series_is_degenerate() {
        let data = vec![42.0; 30];
        assert!(matches!(
            FittedArima::fit(ORDER, &data).unwrap_err(),
            FitError::Degenerate(_)
        ));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = noisy_series(60);
        let a = FittedArima::fit(ORDER, &data).unwrap().forecast(24);
        let b = FittedArima::fit(ORDER, &data).unwrap().forecast(24);
        assert_eq!(a, b);
    }

    #[test]
    fn test_differencing_restores_scale() {
        // Strong upward trend: with d=1 the forecast keeps climbing
        let data: Vec<f64> = (0..40)
            .map(|i| 10.0 + 3.0 * i as f64 + 0.5 * (i as f64).sin())
            .collect();
        let model = FittedArima::fit(ModelOrder::new(1, 1, 0), &data).unwrap();
        let forecast = model.forecast(3);

        assert_eq!(forecast.len(), 3);
        assert!(forecast[0] > data[data.len() - 1]);
        assert!(forecast.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_zero_steps() {
        let model = FittedArima::fit(ORDER, &noisy_series(30)).unwrap();
        assert!(model.forecast(0).is_empty());
    }
}
