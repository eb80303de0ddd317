//! Employer and jobseeker profile rows.

use serde::{Deserialize, Serialize};

use jobhub_core::types::id::UserId;

/// A row from the `employer_profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerProfileRow {
    /// The owning user.
    pub user_id: UserId,
    /// Company display name.
    pub company_name: Option<String>,
    /// Contact first name.
    pub first_name: Option<String>,
    /// Contact last name.
    pub last_name: Option<String>,
    /// Contact name suffix.
    pub suffix: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl EmployerProfileRow {
    /// Best available display name: company, else contact name, else email.
    pub fn display_name(&self) -> Option<String> {
        if let Some(company) = non_empty(self.company_name.as_deref()) {
            return Some(company.to_string());
        }
        personal_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.suffix.as_deref(),
        )
        .or_else(|| non_empty(self.email.as_deref()).map(str::to_string))
    }
}

/// A row from the `jobseeker_profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobseekerProfileRow {
    /// The owning user.
    pub user_id: UserId,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Name suffix.
    pub suffix: Option<String>,
    /// Account email.
    pub email: Option<String>,
}

impl JobseekerProfileRow {
    /// Best available display name: full name, else email.
    pub fn display_name(&self) -> Option<String> {
        personal_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.suffix.as_deref(),
        )
        .or_else(|| non_empty(self.email.as_deref()).map(str::to_string))
    }
}

/// Join the non-empty parts of a personal name.
fn personal_name(
    first: Option<&str>,
    last: Option<&str>,
    suffix: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [first, last, suffix]
        .into_iter()
        .filter_map(non_empty)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
