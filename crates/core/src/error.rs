use crate::appointment::{AppointmentStatus, AppointmentType};
use crate::calendar::DateRejection;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// Errors raised by the appointment store's persistence layer.
///
/// These are infrastructure failures, not business rejections; the service
/// surfaces them to callers as [`SchedulingError::RepositoryUnavailable`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create appointment directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to write appointment file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read appointment file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize appointment: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize appointment: {0}")]
    Deserialization(serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("invalid date: {0}")]
    InvalidDate(DateRejection),
    #[error("invalid appointment time: {0}")]
    InvalidTime(String),
    #[error("unknown appointment type: {0}")]
    InvalidType(String),
    #[error("unknown appointment status: {0}")]
    InvalidStatus(String),
    #[error("the {time} slot on {date} is no longer available for {appointment_type}")]
    SlotTaken {
        date: NaiveDate,
        time: NaiveTime,
        appointment_type: AppointmentType,
    },
    #[error("cannot change appointment status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("appointment {0} not found")]
    NotFound(Uuid),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("appointment store unavailable: {0}")]
    RepositoryUnavailable(#[from] StoreError),
}

pub type SchedulingResult<T> = std::result::Result<T, SchedulingError>;
