use std::sync::Arc;

use crate::auth::{AuthService, PhoneVerifier, SimulatedSmsGateway};
use crate::classifier::{IssueClassifier, KeywordClassifier};
use crate::config::AppConfig;
use crate::sensors::{SimulatedSensorHub, TelemetrySource};
use crate::tickets::TicketStore;

/// Everything the handlers need, owned in one place and passed by handle.
/// The ticket collection lives here for the life of the process; nothing is
/// persisted or shared across processes.
pub struct AppState {
    pub config: AppConfig,
    pub tickets: TicketStore,
    pub auth: AuthService,
    pub classifier: Arc<dyn IssueClassifier>,
    pub telemetry: Arc<dyn TelemetrySource>,
}

impl AppState {
    /// State with the simulated service implementations behind every seam.
    pub fn new(config: AppConfig) -> Self {
        let verifier: Arc<dyn PhoneVerifier> = Arc::new(SimulatedSmsGateway::new());
        Self {
            auth: AuthService::new(verifier, config.admin.clone()),
            tickets: TicketStore::new(),
            classifier: Arc::new(KeywordClassifier::new()),
            telemetry: Arc::new(SimulatedSensorHub::new()),
            config,
        }
    }
}
