use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::normalization;

/// The review status of an application. Changed only by admin action;
/// any transition between values is allowed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    New,
    Reviewing,
    Shortlisted,
    Contacted,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::Reviewing,
        Status::Shortlisted,
        Status::Contacted,
        Status::Rejected,
    ];

    pub fn parse(value: &str) -> Option<Status> {
        match value {
            "NEW" => Some(Status::New),
            "REVIEWING" => Some(Status::Reviewing),
            "SHORTLISTED" => Some(Status::Shortlisted),
            "CONTACTED" => Some(Status::Contacted),
            "REJECTED" => Some(Status::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "NEW",
            Status::Reviewing => "REVIEWING",
            Status::Shortlisted => "SHORTLISTED",
            Status::Contacted => "CONTACTED",
            Status::Rejected => "REJECTED",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Gender> {
        match value {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "OTHER" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

/// A raw expression-of-interest submission, as posted by the form. Every
/// field is defaulted so the boundary checks can name the missing field
/// instead of failing wholesale during deserialization.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationSubmission {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub first_name: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub last_name: String,

    #[serde(deserialize_with = "normalization::deserialize_option")]
    pub middle_name: Option<String>,

    pub phone: String,

    pub email: Option<String>,

    pub gender: String,

    pub date_of_birth: String,

    pub lga: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub place_of_origin: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub home_address: String,

    #[serde(deserialize_with = "normalization::deserialize")]
    pub current_address: String,

    pub qualification: String,

    pub number_of_passes: Option<i32>,

    pub number_of_sittings: Option<i32>,

    pub year_of_exam: Option<String>,

    pub branches: Vec<String>,

    pub skills: Vec<String>,
}

/// A submission that has passed every boundary check, ready to persist.
#[derive(Clone, Debug)]
pub struct NewApplication {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Date,
    pub lga: String,
    pub place_of_origin: String,
    pub home_address: String,
    pub current_address: String,
    pub qualification: String,
    pub number_of_passes: Option<i32>,
    pub number_of_sittings: Option<i32>,
    pub year_of_exam: Option<String>,
    pub branches: Vec<String>,
    pub skills: Vec<String>,
}

/// A stored application row.
#[derive(Clone, Debug)]
pub struct Application {
    pub id: Uuid,
    pub reference_id: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Date,
    pub lga: String,
    pub place_of_origin: String,
    pub home_address: String,
    pub current_address: String,
    pub qualification: String,
    pub number_of_passes: Option<i32>,
    pub number_of_sittings: Option<i32>,
    pub year_of_exam: Option<String>,
    pub branches: Vec<String>,
    pub skills: Vec<String>,
    pub status: Status,
    pub created_at: OffsetDateTime,
}

impl Application {
    /// Builds the display shape consumed by the admin dashboard: the
    /// composed full name and the serialized lists joined into
    /// human-readable strings, order preserved.
    pub fn to_view(&self) -> ApplicationView {
        let full_name = match &self.middle_name {
            Some(middle_name) => {
                format!("{} {} {}", self.first_name, middle_name, self.last_name)
            }
            None => format!("{} {}", self.first_name, self.last_name),
        };

        let preferred_skills = if self.skills.is_empty() {
            None
        } else {
            Some(self.skills.join(", "))
        };

        ApplicationView {
            id: self.id,
            reference_id: self.reference_id.clone(),
            full_name,
            phone: self.phone.clone(),
            email: self.email.clone().unwrap_or_default(),
            date_of_birth: self.date_of_birth.format("%Y-%m-%d"),
            gender: self.gender,
            lga: self.lga.clone(),
            current_address: self.current_address.clone(),
            permanent_address: self.home_address.clone(),
            highest_qualification: self.qualification.clone(),
            number_of_passes: self.number_of_passes.unwrap_or(0),
            exam_year: self.year_of_exam.clone().unwrap_or_default(),
            branches: self.branches.join(", "),
            preferred_skills,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// The minimal identifying projection of a stored application.
#[derive(Clone, Debug)]
pub struct ApplicationKey {
    pub id: Uuid,
    pub reference_id: String,
}

/// The display shape returned by the listing and detail endpoints.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: Uuid,
    pub reference_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub lga: String,
    pub current_address: String,
    pub permanent_address: String,
    pub highest_qualification: String,
    pub number_of_passes: i32,
    pub exam_year: String,
    pub branches: String,
    pub preferred_skills: Option<String>,
    pub status: Status,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

/// The PATCH body for a status transition.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    pub status: String,
}
