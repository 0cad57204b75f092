// Application state for HTTP handlers
use crate::application::advisory_service::AdvisoryService;

#[derive(Clone)]
pub struct AppState {
    pub advisory_service: AdvisoryService,
}
