use crate::auth::service::AuthService;
use crate::campaign::service::CampaignService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every collaborator is constructed in `main` and passed in explicitly.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub campaigns: CampaignService,
}
