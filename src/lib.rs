pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod picker;
pub mod session;
pub mod unit_of_work;
