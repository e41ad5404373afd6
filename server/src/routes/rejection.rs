use serde::Serialize;
use warp::reject;

use crate::errors::PortalError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: PortalError,
}

impl Rejection {
    pub fn new(context: Context, error: PortalError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        let reference_id = match &self.error {
            PortalError::DuplicatePhone { reference_id } => Some(reference_id.clone()),
            _ => None,
        };

        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
            reference_id,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,

    pub(crate) message: String,

    #[serde(rename = "referenceId", skip_serializing_if = "Option::is_none")]
    pub(crate) reference_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Admissions {},
    DeleteMessage { id: String },
    Export {},
    ListApplications {},
    ListMessages {},
    Login {},
    ResolveMessage { id: String },
    RetrieveApplication { id: String },
    Settings {},
    Stats {},
    SubmitApplication {},
    SubmitMessage {},
    UpdateSettings {},
    UpdateStatus { id: String },
}

impl Context {
    pub fn admissions() -> Context {
        Context::Admissions {}
    }

    pub fn delete_message(id: String) -> Context {
        Context::DeleteMessage { id }
    }

    pub fn export() -> Context {
        Context::Export {}
    }

    pub fn list_applications() -> Context {
        Context::ListApplications {}
    }

    pub fn list_messages() -> Context {
        Context::ListMessages {}
    }

    pub fn login() -> Context {
        Context::Login {}
    }

    pub fn resolve_message(id: String) -> Context {
        Context::ResolveMessage { id }
    }

    pub fn retrieve_application(id: String) -> Context {
        Context::RetrieveApplication { id }
    }

    pub fn settings() -> Context {
        Context::Settings {}
    }

    pub fn stats() -> Context {
        Context::Stats {}
    }

    pub fn submit_application() -> Context {
        Context::SubmitApplication {}
    }

    pub fn submit_message() -> Context {
        Context::SubmitMessage {}
    }

    pub fn update_settings() -> Context {
        Context::UpdateSettings {}
    }

    pub fn update_status(id: String) -> Context {
        Context::UpdateStatus { id }
    }
}
