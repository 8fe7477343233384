pub mod bpm_gateway;
pub mod cli;
pub mod config;
pub mod logging;
pub mod projects;
