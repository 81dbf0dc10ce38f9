pub mod gcp_secret_manager;
pub mod memory_backend;
