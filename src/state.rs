use std::sync::Arc;

use crate::config::Config;
use crate::submission::Intake;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub intake: Intake,
}
