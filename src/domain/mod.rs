// Domain layer - Pure models and the forecasting model itself
pub mod advisory;
pub mod arima;
pub mod dashboard;
pub mod location;
pub mod observation;
