use sqlx;
use thiserror::Error;
use uuid::Uuid;
use warp::reject;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// Represents a password-hashing error.
    #[error("password hash error")]
    Bcrypt { source: bcrypt::BcryptError },

    /// A required submission field was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A submission field was present but malformed.
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// An application with the same phone number already exists. Carries
    /// the stored reference ID so the caller can recover it instead of
    /// resubmitting.
    #[error("an application with this phone number already exists")]
    DuplicatePhone { reference_id: String },

    /// The phone unique constraint fired before the duplicate check saw
    /// the conflicting row.
    #[error("phone number already exists in database")]
    PhoneAlreadyExists,

    /// The generated reference ID collided with a stored one.
    #[error("reference ID already exists in database")]
    ReferenceIdAlreadyExists,

    /// Represents a status outside the accepted enumeration.
    #[error("invalid status value: {0}")]
    InvalidStatus(String),

    /// Represents an unparseable ID.
    #[error("invalid ID: {0}")]
    InvalidId(String),

    /// Represents a missing record.
    #[error("no record found for ID {0}")]
    NonExistentId(Uuid),

    /// Represents a failed credential check.
    #[error("invalid email or password")]
    InvalidCredentials,
}

impl reject::Reject for PortalError {}
