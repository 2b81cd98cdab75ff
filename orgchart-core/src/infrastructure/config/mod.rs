pub mod connection;
pub mod loader;

pub use connection::{ConnectionConfig, Driver, DuckDbSettings, PostgresSettings, TableSettings};
pub use loader::{apply_env_overrides, load_config, parse_config};
