//! Data model and pure logic for running reporting and printing jobs.
//!
//! Builds job submission payloads from caller parameters, interprets
//! job status snapshots, and derives every service address from a base
//! URL. All network I/O lives in `reportrun-client`.

pub mod job;
pub mod params;
pub mod status;
pub mod types;
pub mod urls;

pub use job::{build_submission, JobOptions, JobParameter, JobSubmission, JobTemplateRef};
pub use params::{JobParameters, ParameterValue};
pub use status::{interpret, JobOutcome, JobStatusEvent, JobStatusSnapshot};
pub use types::JobTicket;
