use crate::{config::Config, services::dashboard::DashboardService};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub config: Config,
}

impl FromRef<AppState> for DashboardService {
    fn from_ref(state: &AppState) -> Self {
        state.dashboard.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
