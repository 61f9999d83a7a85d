use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::models::site::{is_valid_section_name, ContentValue, SiteSection};
use crate::state::AppState;
use crate::store::{self, Collection, DocumentStore, StoreError};

/// Loads a section, returning an empty one if it has never been saved.
pub async fn load_section(docs: &dyn DocumentStore, section: &str) -> Result<SiteSection, AppError> {
    check_section_name(section)?;
    let stored: Option<SiteSection> = store::get_as(docs, Collection::SiteContent, section).await?;
    Ok(stored.unwrap_or_else(|| SiteSection::empty(section)))
}

/// Replaces every field of a section.
pub async fn save_section(
    docs: &dyn DocumentStore,
    section: &str,
    data: BTreeMap<String, ContentValue>,
) -> Result<SiteSection, AppError> {
    check_section_name(section)?;
    let saved = SiteSection {
        id: section.to_string(),
        section: section.to_string(),
        data,
        updated_at: Some(Utc::now()),
    };
    let doc = serde_json::to_value(&saved).map_err(StoreError::from)?;
    docs.upsert(Collection::SiteContent, doc).await?;
    tracing::info!(section, fields = saved.data.len(), "Site section updated");
    Ok(saved)
}

fn check_section_name(section: &str) -> Result<(), AppError> {
    if is_valid_section_name(section) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid section name '{section}'")))
    }
}

/// GET /api/content/:section
pub async fn handle_get_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<SiteSection>, AppError> {
    Ok(Json(load_section(state.documents.as_ref(), &section).await?))
}
