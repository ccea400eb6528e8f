// Application state for HTTP handlers
use tokio::sync::watch;

use crate::domain::display::DashboardView;

#[derive(Clone)]
pub struct AppState {
    pub view: watch::Receiver<DashboardView>,
}
