use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::PortalError;

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

/// The maximum request body size to accept. This should be enforced by
/// the HTTP gateway, so on the Rust side it's set to a generous number.
const MAX_CONTENT_LENGTH: u64 = 1024 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Portal error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &PortalError) -> StatusCode {
    use PortalError::*;

    match e {
        MissingField(..) | InvalidField { .. } | InvalidStatus(..) | InvalidId(..) => {
            StatusCode::BAD_REQUEST
        }
        DuplicatePhone { .. } | PhoneAlreadyExists => StatusCode::CONFLICT,
        NonExistentId(..) => StatusCode::NOT_FOUND,
        InvalidCredentials => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use serde::de::DeserializeOwned;
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{body, delete, get as g, patch, path as p, path::param as par, post, query};

    use super::{handlers, query as q, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any()
                .map(move || environment.clone())
                .and(p("api"));

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    fn json_body<T: DeserializeOwned + Send>(
    ) -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
        body::content_length_limit(MAX_CONTENT_LENGTH).and(body::json())
    }

    route!(make_submit_application_route => submit_application, rt; p("applications"), end(), post(), json_body());
    route!(make_list_applications_route => list_applications, rt; p("applications"), end(), g());
    route!(make_export_applications_route => export_applications, rt; p!("applications" / "export"), end(), g(), query::<q::ExportQuery>());
    route!(make_application_stats_route => application_stats, rt; p!("applications" / "stats"), end(), g());
    route!(make_retrieve_application_route => retrieve_application, rt; p("applications"), par::<String>(), end(), g());
    route!(make_update_status_route => update_status, rt; p("applications"), par::<String>(), end(), patch(), json_body());
    route!(make_submit_message_route => submit_message, rt; p("contact"), end(), post(), json_body());
    route!(make_list_messages_route => list_messages, rt; p("contact"), end(), g());
    route!(make_resolve_message_route => resolve_message, rt; p("contact"), par::<String>(), end(), patch(), json_body());
    route!(make_delete_message_route => delete_message, rt; p("contact"), par::<String>(), end(), delete());
    route!(make_settings_route => settings, rt; p("settings"), end(), g());
    route!(make_update_settings_route => update_settings, rt; p("settings"), end(), post(), json_body());
    route!(make_admissions_route => admissions, rt; p("army-admissions"), end(), g(), query::<q::AdmissionsQuery>());
    route!(make_login_route => login, rt; p!("auth" / "login"), end(), post(), json_body());
}
