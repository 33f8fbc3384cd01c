// src/core/mod.rs
//! Configuration and backend transport shared by the flows

pub mod config_manager;
pub mod service_client;

pub use config_manager::AppConfig;
pub use service_client::{JobBoardApi, ServiceClient};
