pub mod config;
pub mod contracts;
pub mod providers;
pub mod tokens;
