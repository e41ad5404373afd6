//! Step validation for the guided registration flow. The browser walks
//! these five screens in order and may only advance past a step once it
//! validates; the same rules run again at the service boundary, so
//! nothing here is trusted for integrity.

use serde::Deserialize;

use crate::application::{ApplicationSubmission, Gender};
use crate::validation::{
    self, MAXIMUM_AGE, MINIMUM_AGE, MIN_ADDRESS_LENGTH, MIN_NAME_LENGTH,
};

/// The five screens of the registration flow, in order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WizardStep {
    PersonalInfo,
    IndigeneInfo,
    Education,
    BranchSelection,
    Consent,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::PersonalInfo,
        WizardStep::IndigeneInfo,
        WizardStep::Education,
        WizardStep::BranchSelection,
        WizardStep::Consent,
    ];
}

/// A per-field problem found while validating a step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepError {
    pub field: &'static str,
    pub message: String,
}

impl StepError {
    fn new(field: &'static str, message: &str) -> Self {
        StepError {
            field,
            message: message.to_owned(),
        }
    }
}

/// The wizard's working state: the submission under construction plus
/// the consent checkbox.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RegistrationDraft {
    #[serde(flatten)]
    pub application: ApplicationSubmission,

    #[serde(default)]
    pub consent: bool,
}

/// Collects every problem on one step. An empty result lets the flow
/// advance.
pub fn validate_step(step: WizardStep, draft: &RegistrationDraft) -> Vec<StepError> {
    let application = &draft.application;
    let mut errors = vec![];

    match step {
        WizardStep::PersonalInfo => {
            if application.first_name.chars().count() < MIN_NAME_LENGTH {
                errors.push(StepError::new(
                    "firstName",
                    "First name must be at least 2 characters",
                ));
            }

            if application.last_name.chars().count() < MIN_NAME_LENGTH {
                errors.push(StepError::new(
                    "lastName",
                    "Last name must be at least 2 characters",
                ));
            }

            if !validation::phone_is_valid(&application.phone) {
                errors.push(StepError::new("phone", "Enter a valid phone number"));
            }

            if let Some(ref email) = application.email {
                if !email.is_empty() && !validation::email_is_valid(email) {
                    errors.push(StepError::new("email", "Enter a valid email address"));
                }
            }

            if Gender::parse(&application.gender).is_none() {
                errors.push(StepError::new("gender", "Select a gender"));
            }

            match validation::parse_date_of_birth(&application.date_of_birth) {
                Ok(date_of_birth) => {
                    let age = validation::age_on(
                        date_of_birth,
                        time::OffsetDateTime::now_utc().date(),
                    );

                    if age < MINIMUM_AGE || age > MAXIMUM_AGE {
                        errors.push(StepError::new(
                            "dateOfBirth",
                            "Age must be between 18 and 35",
                        ));
                    }
                }
                Err(_) => {
                    errors.push(StepError::new("dateOfBirth", "Date of birth is required"));
                }
            }
        }

        WizardStep::IndigeneInfo => {
            if application.lga.trim().is_empty() {
                errors.push(StepError::new("lga", "LGA is required"));
            }

            if application.place_of_origin.chars().count() < MIN_NAME_LENGTH {
                errors.push(StepError::new("placeOfOrigin", "Place of origin is required"));
            }

            if application.home_address.chars().count() < MIN_ADDRESS_LENGTH {
                errors.push(StepError::new("homeAddress", "Home address is required"));
            }

            if application.current_address.chars().count() < MIN_ADDRESS_LENGTH {
                errors.push(StepError::new(
                    "currentAddress",
                    "Current address is required",
                ));
            }
        }

        WizardStep::Education => {
            if application.qualification.trim().is_empty() {
                errors.push(StepError::new("qualification", "Qualification is required"));
            }

            if let Some(sittings) = application.number_of_sittings {
                if sittings < 1 || sittings > 2 {
                    errors.push(StepError::new(
                        "numberOfSittings",
                        "Number of sittings must be 1 or 2",
                    ));
                }
            }
        }

        WizardStep::BranchSelection => {
            if application.branches.is_empty() {
                errors.push(StepError::new("branches", "Select at least one branch"));
            }
        }

        WizardStep::Consent => {
            if !draft.consent {
                errors.push(StepError::new("consent", "You must agree to the terms"));
            }
        }
    }

    errors
}

/// Runs every step in order, as the final pre-submission check.
pub fn validate_all(draft: &RegistrationDraft) -> Vec<StepError> {
    WizardStep::ALL
        .iter()
        .flat_map(|step| validate_step(*step, draft))
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, OffsetDateTime};

    use super::*;

    fn date_of_birth_for_age(age: i32) -> String {
        let today = OffsetDateTime::now_utc().date();

        Date::try_from_ymd(today.year() - age, 1, 1)
            .expect("build date of birth")
            .format("%Y-%m-%d")
    }

    fn complete_draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::default();

        draft.application.first_name = "Ade".to_owned();
        draft.application.last_name = "Bello".to_owned();
        draft.application.phone = "08012345678".to_owned();
        draft.application.gender = "MALE".to_owned();
        draft.application.date_of_birth = date_of_birth_for_age(25);
        draft.application.lga = "Ikeja".to_owned();
        draft.application.place_of_origin = "Ikeja".to_owned();
        draft.application.home_address = "12 Allen Ave, Ikeja, Lagos".to_owned();
        draft.application.current_address = "12 Allen Ave, Ikeja, Lagos".to_owned();
        draft.application.qualification = "WAEC/NECO".to_owned();
        draft.application.branches = vec!["army".to_owned()];
        draft.consent = true;

        draft
    }

    #[test]
    fn a_complete_draft_passes_every_step() {
        let draft = complete_draft();

        for step in &WizardStep::ALL {
            assert_eq!(
                validate_step(*step, &draft),
                vec![],
                "step {:?} accepts the draft",
                step
            );
        }

        assert_eq!(validate_all(&draft), vec![]);
    }

    #[test]
    fn personal_info_collects_all_problems_at_once() {
        let mut draft = complete_draft();
        draft.application.first_name = "A".to_owned();
        draft.application.phone = "12345".to_owned();

        let errors = validate_step(WizardStep::PersonalInfo, &draft);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();

        assert_eq!(fields, vec!["firstName", "phone"]);
    }

    #[test]
    fn the_age_band_blocks_the_first_step() {
        let mut draft = complete_draft();
        draft.application.date_of_birth = date_of_birth_for_age(17);

        let errors = validate_step(WizardStep::PersonalInfo, &draft);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "dateOfBirth");
    }

    #[test]
    fn short_addresses_block_the_indigene_step() {
        let mut draft = complete_draft();
        draft.application.home_address = "Ikeja".to_owned();

        let errors = validate_step(WizardStep::IndigeneInfo, &draft);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "homeAddress");
    }

    #[test]
    fn branch_selection_requires_at_least_one_entry() {
        let mut draft = complete_draft();
        draft.application.branches = vec![];

        let errors = validate_step(WizardStep::BranchSelection, &draft);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "branches");
    }

    #[test]
    fn consent_is_required_to_finish() {
        let mut draft = complete_draft();
        draft.consent = false;

        let errors = validate_step(WizardStep::Consent, &draft);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "consent");

        let all = validate_all(&draft);
        assert_eq!(all.len(), 1);
    }
}
