pub mod config_loader;
pub mod env_assembler;
pub mod placeholder_resolver;
pub mod secret_fetcher;
