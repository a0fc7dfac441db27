/// TOML-based infrastructure configuration.
pub mod toml_config;
