pub mod config;
pub mod db;
pub mod error;
pub mod extract;
mod models;
pub mod routes;
mod schema;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;
