//! Viewing-role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The viewing user's role, which determines which sources and filters
/// feed their notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A candidate applying to jobs.
    Jobseeker,
    /// A company account posting jobs and reviewing applications.
    Employer,
    /// A platform administrator reviewing pending job postings.
    Admin,
}

impl UserRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jobseeker => "jobseeker",
            Self::Employer => "employer",
            Self::Admin => "admin",
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = jobhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jobseeker" => Ok(Self::Jobseeker),
            "employer" => Ok(Self::Employer),
            "admin" => Ok(Self::Admin),
            _ => Err(jobhub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: jobseeker, employer, admin"
            ))),
        }
    }
}
