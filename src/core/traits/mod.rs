pub mod decoder;
pub mod secret_backend;
