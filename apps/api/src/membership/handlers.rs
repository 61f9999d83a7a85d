use axum::Json;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::membership::{tier_catalog, TierPlan};

/// GET /api/membership/tiers
pub async fn handle_list_tiers() -> Json<Vec<TierPlan>> {
    Json(tier_catalog())
}

/// POST /api/membership/subscribe
/// Billing is handled outside this service.
pub async fn handle_subscribe(CurrentUser(_user): CurrentUser) -> Result<(), AppError> {
    Err(AppError::NotImplemented("Subscriptions are not available yet"))
}
