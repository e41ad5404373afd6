use std::collections::HashMap;

use serde::Serialize;

use crate::admission::ArmyAdmission;
use crate::application::ApplicationView;
use crate::contact::ContactMessage;
use crate::dashboard::StatusCounts;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Admissions {
        admissions: Vec<ArmyAdmission>,
        counts: HashMap<String, i64>,
        total: usize,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Login {
        success: bool,
        name: String,
        email: String,
    },
    MessageResolved {
        success: bool,
        message: ContactMessage,
    },
    Sent {
        success: bool,
        message: &'a str,
    },
    Stats(StatusCounts),
    StatusUpdated {
        success: bool,
        application: ApplicationView,
        message: &'a str,
    },
    Submission {
        success: bool,
        #[serde(rename = "referenceId")]
        reference_id: String,
        message: &'a str,
    },
}
