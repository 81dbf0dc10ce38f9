pub mod config_document;
pub mod resolved_env;
pub mod secret_ref;
