//! Appointment domain model.
//!
//! This module defines the persisted appointment record together with its
//! enumerated type and status. The record is stored as JSON, one file per
//! appointment, under a sharded directory derived from the appointment UUID
//! (see [`crate::repository`]).
//!
//! Immutability rules: `id`, `appointment_type`, `date` and `time` are fixed
//! at creation. Re-booking a different slot means creating a new appointment;
//! only `status` (and `updated_at`) change over an appointment's lifetime.

use crate::error::SchedulingError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rdv_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// The two bookable appointment kinds.
///
/// Each kind has its own slot grid; see [`crate::slots`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    /// Training session.
    Formation,
    /// Deliverables review.
    Livrables,
}

impl AppointmentType {
    /// All known appointment types, in display order.
    pub const ALL: [AppointmentType; 2] = [AppointmentType::Formation, AppointmentType::Livrables];

    /// Canonical lowercase name used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Formation => "formation",
            AppointmentType::Livrables => "livrables",
        }
    }
}

impl std::fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentType {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "formation" => Ok(AppointmentType::Formation),
            "livrables" => Ok(AppointmentType::Livrables),
            other => Err(SchedulingError::InvalidType(other.to_owned())),
        }
    }
}

/// Lifecycle status of an appointment.
///
/// The legal transitions between statuses are defined by
/// [`crate::state_machine::BookingStateMachine`]; nothing else may change a
/// status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Initial status of every new booking.
    Pending,
    /// Accepted by staff; still occupies its slot.
    Confirmed,
    /// Terminal. The slot is released.
    Cancelled,
    /// Terminal. The appointment took place.
    Completed,
}

impl AppointmentStatus {
    /// All known statuses, in lifecycle order.
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Completed,
    ];

    /// Canonical lowercase name used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Whether an appointment in this status occupies its `(date, time, type)`
    /// slot for availability purposes.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        )
    }

    /// Whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::Completed
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(SchedulingError::InvalidStatus(other.to_owned())),
        }
    }
}

/// Contact details captured with a booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactInfo {
    /// Full name of the person booking.
    pub name: NonEmptyText,

    /// Contact email address.
    pub email: EmailAddress,

    /// Optional phone number, stored as given.
    #[serde(default)]
    pub phone: Option<String>,
}

/// A persisted appointment record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appointment {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,

    /// Who booked the appointment.
    pub contact: ContactInfo,

    /// Which kind of appointment this is.
    pub appointment_type: AppointmentType,

    /// Calendar date of the appointment.
    pub date: NaiveDate,

    /// Start time, drawn from the type's slot grid.
    pub time: NaiveTime,

    /// Optional subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// Optional notes or special requests.
    #[serde(default)]
    pub notes: Option<String>,

    /// Current lifecycle status.
    pub status: AppointmentStatus,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last modified (status changes only).
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// The `(date, time, type)` tuple this appointment occupies while its
    /// status is blocking.
    pub fn slot_key(&self) -> (NaiveDate, NaiveTime, AppointmentType) {
        (self.date, self.time, self.appointment_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parses_canonical_names() {
        assert_eq!(
            "formation".parse::<AppointmentType>().unwrap(),
            AppointmentType::Formation
        );
        assert_eq!(
            "livrables".parse::<AppointmentType>().unwrap(),
            AppointmentType::Livrables
        );
    }

    #[test]
    fn test_type_rejects_unknown_names() {
        let err = "consulting".parse::<AppointmentType>().unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidType(t) if t == "consulting"));
    }

    #[test]
    fn test_status_blocking_and_terminal_sets_are_disjoint() {
        for status in AppointmentStatus::ALL {
            assert!(
                !(status.is_blocking() && status.is_terminal()),
                "{status} cannot be both blocking and terminal"
            );
        }
        assert!(AppointmentStatus::Pending.is_blocking());
        assert!(AppointmentStatus::Confirmed.is_blocking());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in AppointmentStatus::ALL {
            assert_eq!(status.as_str().parse::<AppointmentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AppointmentType::Livrables).unwrap();
        assert_eq!(json, "\"livrables\"");
        let json = serde_json::to_string(&AppointmentStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
