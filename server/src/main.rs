use std::error::Error;
use std::sync::Arc;

use warp::Filter;

use futures::future::FutureExt;
use log::{info, initialize_logger};
use tokio::sync::mpsc;

use portal::auth::PgAuthenticator;
use portal::config::{get_variable, get_variable_or};
use portal::db::PgDb;
use portal::environment::{Config, Environment};
use portal::routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("PORTAL_PORT")
        .parse()
        .expect("parse PORTAL_PORT as u16");
    let admin_port: u16 = get_variable("PORTAL_ADMIN_PORT")
        .parse()
        .expect("parse PORTAL_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    info!(logger, "Creating database pool...");
    let connection_string = get_variable("PORTAL_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from PORTAL_DB_CONNECTION_STRING");
    let db = Arc::new(PgDb::new(pool.clone()));
    let auth = Arc::new(PgAuthenticator::new(pool));

    let config = Config::new(
        get_variable_or("PORTAL_REFERENCE_PREFIX", "LAGOS"),
        get_variable_or("PORTAL_ADMISSIONS_LIMIT", "50")
            .parse()
            .expect("parse PORTAL_ADMISSIONS_LIMIT as i64"),
    );
    let environment = Environment::new(logger.clone(), db, auth, config);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate =
        Arc::new(move || {
            let termination_sender = termination_sender.clone();

            async move {
            let termination_sender = termination_sender.clone();
                termination_sender.send(()).await.unwrap();
            }
            .boxed()
        });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            let terminate = terminate.clone();

            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let logger2 = logger.clone();

        let submit_application_route = routes::make_submit_application_route(environment.clone());
        let list_applications_route = routes::make_list_applications_route(environment.clone());
        let export_applications_route = routes::make_export_applications_route(environment.clone());
        let application_stats_route = routes::make_application_stats_route(environment.clone());
        let retrieve_application_route = routes::make_retrieve_application_route(environment.clone());
        let update_status_route = routes::make_update_status_route(environment.clone());
        let submit_message_route = routes::make_submit_message_route(environment.clone());
        let list_messages_route = routes::make_list_messages_route(environment.clone());
        let resolve_message_route = routes::make_resolve_message_route(environment.clone());
        let delete_message_route = routes::make_delete_message_route(environment.clone());
        let settings_route = routes::make_settings_route(environment.clone());
        let update_settings_route = routes::make_update_settings_route(environment.clone());
        let admissions_route = routes::make_admissions_route(environment.clone());
        let login_route = routes::make_login_route(environment.clone());

        // the export and stats routes must precede the id-parameter route
        let routes = submit_application_route
            .or(list_applications_route)
            .or(export_applications_route)
            .or(application_stats_route)
            .or(retrieve_application_route)
            .or(update_status_route)
            .or(submit_message_route)
            .or(list_messages_route)
            .or(resolve_message_route)
            .or(delete_message_route)
            .or(settings_route)
            .or(update_settings_route)
            .or(admissions_route)
            .or(login_route)
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
