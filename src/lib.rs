pub mod app;
pub mod auth;
pub mod categories;
pub mod client;
pub mod config;
pub mod email;
pub mod state;
