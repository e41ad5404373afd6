use lazy_static::lazy_static;
use regex::Regex;
use time::{Date, OffsetDateTime};

use crate::application::{ApplicationSubmission, Gender, NewApplication};
use crate::catalog;
use crate::contact::ContactSubmission;
use crate::errors::PortalError;

/// The canonical Nigerian mobile pattern. Enforced identically at the
/// trust boundary and by the registration wizard.
pub const PHONE_PATTERN: &str = r"^(\+234|0)[789]\d{9}$";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// The acceptable age band, inclusive.
pub const MINIMUM_AGE: i32 = 18;
pub const MAXIMUM_AGE: i32 = 35;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_ADDRESS_LENGTH: usize = 10;
pub const MIN_CONTACT_LENGTH: usize = 10;
pub const MIN_MESSAGE_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref PHONE: Regex = Regex::new(PHONE_PATTERN).expect("compile phone pattern");
    static ref EMAIL: Regex = Regex::new(EMAIL_PATTERN).expect("compile email pattern");
}

pub fn phone_is_valid(phone: &str) -> bool {
    PHONE.is_match(phone)
}

pub fn email_is_valid(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Age in whole years on the given day.
pub fn age_on(date_of_birth: Date, today: Date) -> i32 {
    let mut age = today.year() - date_of_birth.year();

    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }

    age
}

pub fn parse_date_of_birth(value: &str) -> Result<Date, PortalError> {
    Date::parse(value, "%Y-%m-%d").map_err(|_| PortalError::InvalidField {
        field: "dateOfBirth",
        message: "invalid date of birth".to_owned(),
    })
}

/// Checks a submission against every boundary rule and converts it into
/// its typed form. Stops at the first offending field; nothing is
/// persisted on failure.
pub fn validate_application(
    submission: ApplicationSubmission,
) -> Result<NewApplication, PortalError> {
    require("firstName", &submission.first_name)?;
    require("lastName", &submission.last_name)?;
    require("phone", &submission.phone)?;
    require("gender", &submission.gender)?;
    require("dateOfBirth", &submission.date_of_birth)?;
    require("lga", &submission.lga)?;
    require("placeOfOrigin", &submission.place_of_origin)?;
    require("homeAddress", &submission.home_address)?;
    require("currentAddress", &submission.current_address)?;
    require("qualification", &submission.qualification)?;

    if submission.branches.is_empty() {
        return Err(PortalError::MissingField("branches"));
    }

    if submission.first_name.chars().count() < MIN_NAME_LENGTH {
        return Err(invalid(
            "firstName",
            "first name must be at least 2 characters",
        ));
    }

    if submission.last_name.chars().count() < MIN_NAME_LENGTH {
        return Err(invalid(
            "lastName",
            "last name must be at least 2 characters",
        ));
    }

    if !phone_is_valid(&submission.phone) {
        return Err(invalid("phone", "invalid phone number format"));
    }

    let email = submission.email.filter(|email| !email.is_empty());

    if let Some(ref email) = email {
        if !email_is_valid(email) {
            return Err(invalid("email", "invalid email format"));
        }
    }

    let gender = Gender::parse(&submission.gender)
        .ok_or_else(|| invalid("gender", "gender must be MALE, FEMALE or OTHER"))?;

    let date_of_birth = parse_date_of_birth(&submission.date_of_birth)?;
    let age = age_on(date_of_birth, OffsetDateTime::now_utc().date());

    if age < MINIMUM_AGE || age > MAXIMUM_AGE {
        return Err(invalid("dateOfBirth", "age must be between 18 and 35"));
    }

    if submission.place_of_origin.chars().count() < MIN_NAME_LENGTH {
        return Err(invalid(
            "placeOfOrigin",
            "place of origin must be at least 2 characters",
        ));
    }

    if submission.home_address.chars().count() < MIN_ADDRESS_LENGTH {
        return Err(invalid(
            "homeAddress",
            "home address must be at least 10 characters",
        ));
    }

    if submission.current_address.chars().count() < MIN_ADDRESS_LENGTH {
        return Err(invalid(
            "currentAddress",
            "current address must be at least 10 characters",
        ));
    }

    if !catalog::is_qualification(&submission.qualification) {
        return Err(invalid("qualification", "unknown qualification"));
    }

    if let Some(passes) = submission.number_of_passes {
        if passes < 0 {
            return Err(invalid(
                "numberOfPasses",
                "number of passes must not be negative",
            ));
        }
    }

    if let Some(sittings) = submission.number_of_sittings {
        if sittings < 1 || sittings > 2 {
            return Err(invalid(
                "numberOfSittings",
                "number of sittings must be 1 or 2",
            ));
        }
    }

    for branch in &submission.branches {
        if !catalog::is_branch(branch) {
            return Err(invalid("branches", "unknown branch selection"));
        }
    }

    for skill in &submission.skills {
        if !catalog::is_skill(skill) {
            return Err(invalid("skills", "unknown skill selection"));
        }
    }

    Ok(NewApplication {
        first_name: submission.first_name,
        last_name: submission.last_name,
        middle_name: submission.middle_name.filter(|name| !name.is_empty()),
        phone: submission.phone,
        email,
        gender,
        date_of_birth,
        lga: submission.lga,
        place_of_origin: submission.place_of_origin,
        home_address: submission.home_address,
        current_address: submission.current_address,
        qualification: submission.qualification,
        number_of_passes: submission.number_of_passes,
        number_of_sittings: submission.number_of_sittings,
        year_of_exam: submission.year_of_exam.filter(|year| !year.is_empty()),
        branches: submission.branches,
        skills: submission.skills,
    })
}

pub fn validate_contact(submission: &ContactSubmission) -> Result<(), PortalError> {
    if submission.name.chars().count() < MIN_NAME_LENGTH {
        return Err(invalid("name", "name must be at least 2 characters"));
    }

    if submission.contact.chars().count() < MIN_CONTACT_LENGTH {
        return Err(invalid("contact", "contact must be at least 10 characters"));
    }

    if submission.message.chars().count() < MIN_MESSAGE_LENGTH {
        return Err(invalid("message", "message must be at least 20 characters"));
    }

    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), PortalError> {
    if !email_is_valid(email) {
        return Err(invalid("email", "invalid email address"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(invalid(
            "password",
            "password must be at least 6 characters",
        ));
    }

    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        Err(PortalError::MissingField(field))
    } else {
        Ok(())
    }
}

fn invalid(field: &'static str, message: &str) -> PortalError {
    PortalError::InvalidField {
        field,
        message: message.to_owned(),
    }
}
