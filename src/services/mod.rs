//! Service objects over the record API, one per business entity.
//!
//! Every operation is best-effort: failures are logged and the caller gets
//! an empty value (`[]`, `None` or `false`).

mod client_service;
mod error;
mod project_service;
mod table;

pub use client_service::{ClientService, CLIENT_TABLE};
pub use error::ServiceError;
pub use project_service::{ProjectService, MILESTONE_TABLE, PROJECT_TABLE};
pub use table::RecordTable;
