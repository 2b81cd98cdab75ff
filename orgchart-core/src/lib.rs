// orgchart-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports: the Connector contract
pub mod ports;

// 2. Domain: query builder, org-chart model and history query.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure: DuckDB / Postgres adapters, connection profile
pub mod infrastructure;

// 4. Application: fetch_history use case
pub mod application;

pub mod error;

pub use error::OrgChartError;
