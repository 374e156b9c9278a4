//! BigQuery integration
//!
//! - [`client`] - [`WarehouseClient`] trait and the REST implementation
//! - [`auth`] - access token sources (static or metadata server)
//! - [`models`] - request/response bodies of the Jobs API

pub mod auth;
pub mod client;
pub mod models;

pub use auth::TokenSource;
pub use client::{BigQueryClient, WarehouseClient};
