//! A helper program to create the `quotes` table and its index.

use std::env;

use movine::Movine;
use postgres::{Client, NoTls};

use log::{debug, info, initialize_logger};

fn main() {
    dotenv::dotenv().ok();

    let logger = initialize_logger();
    let connection_string = env::var("QUOTES_DB_CONNECTION_STRING")
        .expect("could not read QUOTES_DB_CONNECTION_STRING");
    let migration_dir =
        env::var("QUOTES_MIGRATION_DIR").unwrap_or_else(|_| "./migrations".to_owned());

    debug!(logger, "Connecting to database...");

    let client = Client::connect(&connection_string, NoTls).expect("could not connect to database");

    let mut movine = Movine::new(client);
    movine.set_migration_dir(&migration_dir);

    if movine.status().is_err() {
        debug!(logger, "Initializing movine...");
        movine.initialize().expect("failed to initialize movine")
    }

    info!(logger, "Running migrations..."; "dir" => &migration_dir);
    movine.up().expect("failed to run migrations");

    debug!(logger, "Completed initialization.");
}
