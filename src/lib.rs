pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod mode;
pub mod server;
