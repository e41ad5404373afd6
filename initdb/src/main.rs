//! A helper program to initialize the portal database: runs the
//! migrations, then seeds the admin user, the default site settings
//! and the static admission lists.

use std::env;

use movine::Movine;
use postgres::{Client, NoTls};
use uuid::Uuid;

use log::{debug, initialize_logger};

const SITE_SETTINGS_SEED: &str = include_str!("../seeds/site_settings.sql");
const ARMY_ADMISSIONS_SEED: &str = include_str!("../seeds/army_admissions.sql");

fn main() {
    dotenv::dotenv().ok();

    let logger = initialize_logger();
    let connection_string = env::var("PORTAL_DB_CONNECTION_STRING")
        .expect("could not read PORTAL_DB_CONNECTION_STRING");

    debug!(logger, "Connecting to database...");

    let mut client =
        Client::connect(&connection_string, NoTls).expect("could not connect to database");

    {
        let mut movine = Movine::new(&mut client);
        movine.set_migration_dir("./migrations");

        if movine.status().is_err() {
            debug!(logger, "Initializing movine...");
            movine.initialize().expect("failed to initialize movine")
        }

        debug!(logger, "Running migrations...");
        movine.up().expect("failed to run migrations");
    }

    debug!(logger, "Seeding admin user...");
    seed_admin_user(&mut client);

    debug!(logger, "Seeding site settings...");
    client
        .batch_execute(SITE_SETTINGS_SEED)
        .expect("failed to seed site settings");

    debug!(logger, "Seeding admission lists...");
    client
        .batch_execute(ARMY_ADMISSIONS_SEED)
        .expect("failed to seed admission lists");

    debug!(logger, "Completed initialization.");
}

fn seed_admin_user(client: &mut Client) {
    let email = env::var("PORTAL_ADMIN_SEED_EMAIL")
        .unwrap_or_else(|_| "admin@ossg.lagos.gov.ng".to_owned());
    let password =
        env::var("PORTAL_ADMIN_SEED_PASSWORD").unwrap_or_else(|_| "Change@123".to_owned());
    let password_hash =
        bcrypt::hash(&password, bcrypt::DEFAULT_COST).expect("failed to hash admin seed password");

    client
        .execute(
            "INSERT INTO admin_users (id, email, password_hash, name, role)
             VALUES ($1, $2, $3, $4, 'admin')
             ON CONFLICT (email) DO NOTHING",
            &[
                &Uuid::new_v4(),
                &email,
                &password_hash,
                &"OSSG Administrator",
            ],
        )
        .expect("failed to seed admin user");
}
