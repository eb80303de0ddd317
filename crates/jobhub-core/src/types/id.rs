//! Newtype wrappers around [`uuid::Uuid`] for all domain entity identifiers,
//! plus the composite [`NotificationId`] value type.
//!
//! Using distinct types prevents accidentally passing a `UserId` where a
//! `JobId` is expected. `NotificationId` makes the feed identity rule
//! (source, record and timestamp together) explicit and type-checkable
//! instead of living in ad hoc string concatenation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }

            /// Return a reference to the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user (jobseeker, employer, or admin).
    UserId
);

define_id!(
    /// Unique identifier for a job application.
    ApplicationId
);

define_id!(
    /// Unique identifier for a job posting.
    JobId
);

define_id!(
    /// Unique identifier for a direct notification row.
    NoticeId
);

define_id!(
    /// Unique identifier for a pending job vacancy record.
    PendingJobId
);

/// The backing record type a feed notification was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A job application row.
    Application,
    /// A direct notification row.
    Notification,
    /// A pending job vacancy row.
    Jobvacancy,
}

impl SourceKind {
    /// Return the source as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Notification => "notification",
            Self::Jobvacancy => "jobvacancy",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application" => Ok(Self::Application),
            "notification" => Ok(Self::Notification),
            "jobvacancy" => Ok(Self::Jobvacancy),
            _ => Err(AppError::validation(format!(
                "Invalid notification source: '{s}'. Expected one of: application, notification, jobvacancy"
            ))),
        }
    }
}

/// Composite identity of a feed notification.
///
/// Two notifications with the same `NotificationId` refer to the same
/// underlying event at the same timestamp. A status change that bumps the
/// record's `updated_at` therefore yields a *new* identity, which is what
/// re-arms the unread state for that record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId {
    /// The backing record type.
    pub source: SourceKind,
    /// The backing record's primary key.
    pub record: Uuid,
    /// The event timestamp that participates in identity.
    pub timestamp: DateTime<Utc>,
}

impl NotificationId {
    /// Create a notification identity from its components.
    pub fn new(source: SourceKind, record: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            source,
            record,
            timestamp,
        }
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.source,
            self.record,
            self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )
    }
}

impl FromStr for NotificationId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '_');
        let (source, record, timestamp) = match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => {
                return Err(AppError::validation(format!(
                    "Malformed notification id: '{s}'"
                )));
            }
        };

        let source = SourceKind::from_str(source)?;
        let record = Uuid::parse_str(record)
            .map_err(|e| AppError::validation(format!("Bad record id in '{s}': {e}")))?;
        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|e| AppError::validation(format!("Bad timestamp in '{s}': {e}")))?
            .with_timezone(&Utc);

        Ok(Self {
            source,
            record,
            timestamp,
        })
    }
}

impl Serialize for NotificationId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NotificationId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
