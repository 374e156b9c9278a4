//! Export orchestration
//!
//! - [`naming`] - table, destination and job id derivation
//! - [`exporter`] - submit, poll and classify one dataset export
//! - [`coordinator`] - concurrent fan-out over all datasets
//! - [`summary`] - per-run reporting

pub mod coordinator;
pub mod exporter;
pub mod naming;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use exporter::Exporter;
pub use naming::{destination_uri, job_id, table_name};
pub use summary::RunSummary;
