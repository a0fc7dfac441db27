//! Job lifecycle: records and the concurrency-safe store that owns them.
//!
//! - [`record::JobRecord`] - status, progress, message and result of one job
//! - [`store::JobStore`] - create/get/update with synchronized read-modify-write

pub mod record;
pub mod store;

pub use record::{
    JobId, JobMode, JobRecord, JobResult, JobStatus, ReportData, Trend, TrendAnalysis, TREND_COUNT,
};
pub use store::{JobEvent, JobStore};
