pub mod attendance;
pub mod config;
pub mod csrf;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod report;
pub mod templates_structs;
