pub mod toml_decoder;
