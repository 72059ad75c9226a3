pub mod api;
pub mod app;
pub mod auth;
pub mod errors;
pub mod metrics;
pub mod workspace;
