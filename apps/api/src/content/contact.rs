use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::content::ContactSubmission;
use crate::state::AppState;
use crate::store::{to_documents, Collection};

const MAX_MESSAGE_CHARS: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub id: String,
    pub message: &'static str,
}

impl ContactRequest {
    /// Trims every field and checks it is usable. Blank subjects become `None`.
    pub fn into_submission(self) -> Result<ContactSubmission, AppError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let message = self.message.trim().to_string();
        let subject = self
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => {
                return Err(AppError::Validation(
                    "A valid email address is required".to_string(),
                ))
            }
        }
        if message.is_empty() {
            return Err(AppError::Validation("Message is required".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "Message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        Ok(ContactSubmission {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            subject,
            message,
            status: "new".to_string(),
            created_at: Utc::now(),
        })
    }
}

/// POST /api/contact
/// Stored for follow-up; no email is sent.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ContactReceipt>, AppError> {
    let submission = req.into_submission()?;
    let id = submission.id.clone();
    state
        .documents
        .insert_many(Collection::ContactSubmissions, to_documents(&[submission])?)
        .await?;
    info!(submission_id = %id, "Contact form submitted");

    Ok(Json(ContactReceipt {
        success: true,
        id,
        message: "Thank you for your message! We'll get back to you soon.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: " Dana ".to_string(),
            email: "dana@example.com".to_string(),
            subject: Some("   ".to_string()),
            message: "Interested in coaching".to_string(),
        }
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let submission = request().into_submission().unwrap();
        assert_eq!(submission.name, "Dana");
        assert_eq!(submission.subject, None);
        assert_eq!(submission.status, "new");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut req = request();
        req.message = "  ".to_string();
        assert!(matches!(req.into_submission(), Err(AppError::Validation(_))));

        let mut req = request();
        req.email = "dana".to_string();
        assert!(matches!(req.into_submission(), Err(AppError::Validation(_))));

        let mut req = request();
        req.name.clear();
        assert!(matches!(req.into_submission(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_oversized_message_is_rejected() {
        let mut req = request();
        req.message = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(req.into_submission(), Err(AppError::Validation(_))));
    }
}
