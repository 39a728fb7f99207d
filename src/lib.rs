pub mod config;
pub mod error;
pub mod fixer;
pub mod logging;
pub mod outputs;
