pub mod config;
pub mod dashboard;
pub mod error;
pub mod indicator;
pub mod model;
pub mod provider;
pub mod render;
pub mod server;
