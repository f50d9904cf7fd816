use std::sync::Arc;

use crate::application::services::SignupService;
use crate::web::session::SessionSigner;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub signup_service: Arc<SignupService>,
    pub session: Arc<SessionSigner>,
    pub site_name: Arc<str>,
}

impl AppState {
    pub fn new(
        signup_service: Arc<SignupService>,
        session: Arc<SessionSigner>,
        site_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            signup_service,
            session,
            site_name: site_name.into(),
        }
    }
}
