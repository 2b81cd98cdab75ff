pub mod duckdb;
pub mod postgres;
