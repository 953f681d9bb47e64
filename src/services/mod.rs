// src/services/mod.rs
pub mod backend;
pub mod completion;
pub mod metrics_manager;
pub mod prediction;
pub mod relay;
pub mod session_manager;
