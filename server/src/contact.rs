use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalization;

/// A raw enquiry submission from the public contact form.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub name: String,

    /// Free text: a phone number or an email address.
    pub contact: String,

    pub message: String,
}

/// A stored enquiry message.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub contact: String,
    pub message: String,
    pub is_resolved: bool,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

/// The PATCH body for resolving or reopening a message. Deliberately not
/// defaulted: a missing or non-boolean value must fail the request.
#[derive(Clone, Debug, Deserialize)]
pub struct ResolveUpdate {
    #[serde(rename = "isResolved")]
    pub is_resolved: bool,
}
