use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;
use time::OffsetDateTime;
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::admission::{AdmissionFilter, ListType};
use crate::application::{
    Application, ApplicationSubmission, NewApplication, Status, StatusUpdate,
};
use crate::auth::{Authenticator, LoginSubmission};
use crate::contact::{ContactSubmission, ResolveUpdate};
use crate::dashboard::{self, ApplicationFilter};
use crate::db::Db;
use crate::environment::Environment;
use crate::errors::PortalError;
use crate::reference;
use crate::routes::{
    query::{AdmissionsQuery, ExportQuery},
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::settings;
use crate::validation;

const SERVER_TIMING_HEADER: &str = "server-timing";
const CSV_CONTENT_TYPE: &str = "text/csv";

/// How many reference IDs to generate before giving up on a unique one.
const MAX_REFERENCE_ATTEMPTS: usize = 3;

type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($body:tt)+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($body)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn submit_application(
    environment: Environment,
    submission: ApplicationSubmission,
) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::submit_application(), e);

        debug!(environment.logger, "Validating submission...");
        let application = validation::validate_application(submission).map_err(error_handler)?;

        debug!(environment.logger, "Checking for an existing application..."; "phone" => &application.phone);
        check_for_duplicate(&environment, &application.phone)
            .await
            .map_err(error_handler)?;

        debug!(environment.logger, "Persisting application...");
        let stored = store_application(&environment, application)
            .await
            .map_err(error_handler)?;

        debug!(environment.logger, "Application stored"; "reference_id" => &stored.reference_id);

        with_status(
            json(&SuccessResponse::Submission {
                success: true,
                reference_id: stored.reference_id.clone(),
                message: "Application submitted successfully",
            }),
            StatusCode::OK,
        )
    }
}

pub async fn list_applications(environment: Environment) -> RouteResult {
    timed! {
        let applications = environment
            .db
            .list_applications()
            .await
            .map_err(|e: PortalError| Rejection::new(Context::list_applications(), e))?;

        let views = applications
            .iter()
            .map(|application| application.to_view())
            .collect::<Vec<_>>();

        json(&views)
    }
}

pub async fn retrieve_application(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::retrieve_application(id.clone()), e);

        let id = Uuid::parse_str(&id)
            .map_err(|_| PortalError::InvalidId(id.clone()))
            .map_err(error_handler)?;
        debug!(environment.logger, "Retrieving application..."; "id" => format!("{}", &id));

        let option = environment
            .db
            .retrieve_application(&id)
            .await
            .map_err(error_handler)?;

        match option {
            Some(application) => with_status(json(&application.to_view()), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn update_status(
    environment: Environment,
    id: String,
    update: StatusUpdate,
) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::update_status(id.clone()), e);

        let status = Status::parse(&update.status)
            .ok_or_else(|| PortalError::InvalidStatus(update.status.clone()))
            .map_err(error_handler)?;

        let id = Uuid::parse_str(&id)
            .map_err(|_| PortalError::InvalidId(id.clone()))
            .map_err(error_handler)?;
        debug!(environment.logger, "Updating application status..."; "id" => format!("{}", &id), "status" => status.as_str());

        let updated = environment
            .db
            .update_application_status(&id, status)
            .await
            .map_err(error_handler)?;

        with_status(
            json(&SuccessResponse::StatusUpdated {
                success: true,
                application: updated.to_view(),
                message: "Application status updated successfully",
            }),
            StatusCode::OK,
        )
    }
}

pub async fn export_applications(environment: Environment, query: ExportQuery) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::export(), e);

        let filter = application_filter_from(&query).map_err(error_handler)?;

        let applications = environment
            .db
            .list_applications()
            .await
            .map_err(error_handler)?;

        let views = filter.apply(
            applications
                .iter()
                .map(|application| application.to_view())
                .collect(),
        );

        debug!(environment.logger, "Exporting applications..."; "count" => views.len());
        let csv = dashboard::to_csv(&views);

        let disposition = format!(
            "attachment; filename=\"applications-{}.csv\"",
            OffsetDateTime::now_utc().date().format("%Y-%m-%d")
        );

        with_header(
            with_header(csv, "content-type", CSV_CONTENT_TYPE),
            "content-disposition",
            disposition,
        )
    }
}

pub async fn application_stats(environment: Environment) -> RouteResult {
    timed! {
        let applications = environment
            .db
            .list_applications()
            .await
            .map_err(|e: PortalError| Rejection::new(Context::stats(), e))?;

        let views = applications
            .iter()
            .map(|application| application.to_view())
            .collect::<Vec<_>>();

        json(&SuccessResponse::Stats(dashboard::status_counts(&views)))
    }
}

pub async fn submit_message(
    environment: Environment,
    submission: ContactSubmission,
) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::submit_message(), e);

        validation::validate_contact(&submission).map_err(error_handler)?;

        debug!(environment.logger, "Persisting contact message...");
        environment
            .db
            .create_message(submission)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Sent {
            success: true,
            message: "Message sent successfully",
        })
    }
}

pub async fn list_messages(environment: Environment) -> RouteResult {
    timed! {
        let messages = environment
            .db
            .list_messages()
            .await
            .map_err(|e: PortalError| Rejection::new(Context::list_messages(), e))?;

        json(&messages)
    }
}

pub async fn resolve_message(
    environment: Environment,
    id: String,
    update: ResolveUpdate,
) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::resolve_message(id.clone()), e);

        let id = Uuid::parse_str(&id)
            .map_err(|_| PortalError::InvalidId(id.clone()))
            .map_err(error_handler)?;
        debug!(environment.logger, "Updating message resolution..."; "id" => format!("{}", &id), "is_resolved" => update.is_resolved);

        let message = environment
            .db
            .set_message_resolved(&id, update.is_resolved)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::MessageResolved {
            success: true,
            message,
        })
    }
}

pub async fn delete_message(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::delete_message(id.clone()), e);

        let id = Uuid::parse_str(&id)
            .map_err(|_| PortalError::InvalidId(id.clone()))
            .map_err(error_handler)?;
        debug!(environment.logger, "Deleting message..."; "id" => format!("{}", &id));

        environment
            .db
            .delete_message(&id)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Sent {
            success: true,
            message: "Message deleted successfully",
        })
    }
}

pub async fn settings(environment: Environment) -> RouteResult {
    timed! {
        let stored = environment
            .db
            .retrieve_settings()
            .await
            .map_err(|e: PortalError| Rejection::new(Context::settings(), e))?;

        json(&settings::fold(stored))
    }
}

pub async fn update_settings(
    environment: Environment,
    updates: HashMap<String, String>,
) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::update_settings(), e);

        debug!(environment.logger, "Upserting settings..."; "count" => updates.len());
        apply_settings(&environment, &updates)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Sent {
            success: true,
            message: "Settings updated successfully",
        })
    }
}

pub async fn admissions(environment: Environment, query: AdmissionsQuery) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::admissions(), e);

        let filter = admission_filter_from(&query, environment.config.admissions_limit)
            .map_err(error_handler)?;

        let admissions = environment
            .db
            .search_admissions(filter)
            .await
            .map_err(error_handler)?;

        // counts are grouped over the whole table on purpose: the lookup
        // page shows the published list sizes beside any filtered view
        let counts = environment
            .db
            .count_admissions()
            .await
            .map_err(error_handler)?
            .into_iter()
            .map(|(list_type, count)| (list_type.as_str().to_owned(), count))
            .collect::<HashMap<_, _>>();

        let total = admissions.len();

        json(&SuccessResponse::Admissions {
            admissions,
            counts,
            total,
        })
    }
}

pub async fn login(environment: Environment, submission: LoginSubmission) -> RouteResult {
    timed! {
        let error_handler = |e: PortalError| Rejection::new(Context::login(), e);

        validation::validate_login(&submission.email, &submission.password)
            .map_err(error_handler)?;

        let admin = environment
            .auth
            .authenticate(&submission.email, &submission.password)
            .await
            .map_err(error_handler)?;

        match admin {
            Some(admin) => with_status(
                json(&SuccessResponse::Login {
                    success: true,
                    name: admin.name,
                    email: admin.email,
                }),
                StatusCode::OK,
            ),
            None => return Err(error_handler(PortalError::InvalidCredentials).into()),
        }
    }
}

async fn check_for_duplicate(
    environment: &Environment,
    phone: &str,
) -> Result<(), PortalError> {
    let existing = environment.db.find_application_by_phone(phone).await?;

    match existing {
        Some(existing) => Err(PortalError::DuplicatePhone {
            reference_id: existing.reference_id,
        }),
        None => Ok(()),
    }
}

async fn store_application(
    environment: &Environment,
    application: NewApplication,
) -> Result<Application, PortalError> {
    let mut attempts = 0;

    loop {
        attempts += 1;
        let reference_id = reference::generate(&environment.config.reference_prefix);

        match environment
            .db
            .create_application(&reference_id, application.clone())
            .await
        {
            Ok(stored) => return Ok(stored),
            Err(PortalError::ReferenceIdAlreadyExists) if attempts < MAX_REFERENCE_ATTEMPTS => {
                continue
            }
            Err(PortalError::PhoneAlreadyExists) => {
                // lost the race between the duplicate check and the
                // insert; recover the winning row's reference ID
                let existing = environment
                    .db
                    .find_application_by_phone(&application.phone)
                    .await?;

                return Err(match existing {
                    Some(existing) => PortalError::DuplicatePhone {
                        reference_id: existing.reference_id,
                    },
                    None => PortalError::PhoneAlreadyExists,
                });
            }
            Err(e) => return Err(e),
        }
    }
}

// independent per-key upserts: a failure partway through leaves the
// earlier keys written
async fn apply_settings(
    environment: &Environment,
    updates: &HashMap<String, String>,
) -> Result<(), PortalError> {
    for (key, value) in updates {
        environment.db.upsert_setting(key, value).await?;
    }

    Ok(())
}

fn application_filter_from(query: &ExportQuery) -> Result<ApplicationFilter, PortalError> {
    let status = match &query.status {
        Some(value) if !value.is_empty() => {
            Some(Status::parse(value).ok_or_else(|| PortalError::InvalidStatus(value.clone()))?)
        }
        _ => None,
    };

    Ok(ApplicationFilter {
        search: query.search.clone().filter(|term| !term.is_empty()),
        status,
        lga: query.lga.clone().filter(|lga| !lga.is_empty()),
        branch: query.branch.clone().filter(|branch| !branch.is_empty()),
    })
}

fn admission_filter_from(
    query: &AdmissionsQuery,
    default_limit: i64,
) -> Result<AdmissionFilter, PortalError> {
    let list_type = match &query.list_type {
        Some(value) if !value.is_empty() => {
            Some(ListType::parse(value).ok_or_else(|| PortalError::InvalidField {
                field: "listType",
                message: format!("unknown list type: {}", value),
            })?)
        }
        _ => None,
    };

    Ok(AdmissionFilter {
        list_type,
        search: query.search.clone().filter(|term| !term.is_empty()),
        limit: query.limit.unwrap_or(default_limit),
    })
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
