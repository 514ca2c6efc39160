#![forbid(unsafe_code)]

pub mod aggregate;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod flights;
pub mod geometry;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod sqlite;
pub mod validate;

pub use cli::app::{Cli, Command};
pub use flights::FlightData;
