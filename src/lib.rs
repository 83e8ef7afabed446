pub mod aggregate;
pub mod cli;
pub mod config;
pub mod counter;
pub mod decompile;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod reporting;
pub mod scanner;
pub mod stats;
pub mod types;
