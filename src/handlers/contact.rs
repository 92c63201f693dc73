//! Contact form intake.
//!
//! Validates and acknowledges a submission. Delivery happens out of band;
//! this endpoint exists to be the abuse target the strict `forms` rate
//! limit protects.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::ApiError;

const MAX_NAME_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub accepted: bool,
    /// Reference ID returned to the submitter and attached to the log line.
    pub reference: Uuid,
}

pub async fn submit(
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    validate(&request)?;

    let reference = Uuid::new_v4();
    tracing::info!(
        reference = %reference,
        email = %request.email,
        subject = %request.subject,
        message_len = request.message.len(),
        "Contact form submission accepted"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(ContactResponse {
            accepted: true,
            reference,
        }),
    ))
}

fn validate(request: &ContactRequest) -> Result<(), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    if request.name.len() > MAX_NAME_LEN {
        return Err(ApiError::Validation(format!("name exceeds {MAX_NAME_LEN} characters")));
    }
    if request.message.trim().is_empty() {
        return Err(ApiError::Validation("message must not be empty".into()));
    }
    if request.message.len() > MAX_MESSAGE_LEN {
        return Err(ApiError::Validation(format!(
            "message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    if !is_plausible_email(&request.email) {
        return Err(ApiError::Validation("email address is not valid".into()));
    }
    Ok(())
}

/// Deliberately loose: one `@`, non-empty local part, dotted domain. Real
/// verification happens when the reply is sent.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}
