pub mod grading;
pub mod models;
pub mod ports;
pub mod services;
