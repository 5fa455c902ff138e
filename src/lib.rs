pub mod aws;
pub mod cdk;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod process;
