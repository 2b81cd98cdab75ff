// orgchart-core/src/application/mod.rs

pub mod history;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use orgchart_core::application::{fetch_history, FetchOptions};`
pub use history::{FetchOptions, fetch_history, render_history_query};
