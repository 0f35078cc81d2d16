pub mod config;
pub mod db;
pub mod environment;
pub mod errors;
pub mod quote;
pub mod routes;
pub mod selector;
pub mod templates;
pub mod urls;
