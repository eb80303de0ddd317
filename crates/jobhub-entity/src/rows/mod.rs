//! Row types for the backend tables the notification feed consumes.

pub mod application;
pub mod job;
pub mod notice;
pub mod pending_job;
pub mod profile;

pub use application::{ApplicationRow, ApplicationStatus};
pub use job::JobRow;
pub use notice::DirectNotificationRow;
pub use pending_job::{PendingJobRow, PendingJobStatus};
pub use profile::{EmployerProfileRow, JobseekerProfileRow};
