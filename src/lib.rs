pub mod client;
pub mod config;
pub mod core;
pub mod database;
pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
