//! Booking lifecycle state machine.
//!
//! An appointment starts in `pending` and moves through the table below.
//! `cancelled` and `completed` are terminal; nothing transitions out of them.
//!
//! | From      | To                     |
//! |-----------|------------------------|
//! | pending   | confirmed, cancelled   |
//! | confirmed | cancelled, completed   |
//! | cancelled | (terminal)             |
//! | completed | (terminal)             |
//!
//! Leaving the blocking set (`pending`/`confirmed`) releases the
//! appointment's slot; the store performs that release in the same critical
//! section as the status write (see [`crate::repository`]).

use crate::appointment::AppointmentStatus;
use crate::error::{SchedulingError, SchedulingResult};

/// Validates status transitions against the lifecycle table.
///
/// This is a zero-sized type used for namespacing; all methods are associated
/// functions.
pub struct BookingStateMachine;

impl BookingStateMachine {
    /// All statuses reachable in one step from `from`.
    ///
    /// Terminal statuses return an empty slice.
    pub fn allowed_transitions(from: AppointmentStatus) -> &'static [AppointmentStatus] {
        match from {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Confirmed => {
                &[AppointmentStatus::Cancelled, AppointmentStatus::Completed]
            }
            AppointmentStatus::Cancelled | AppointmentStatus::Completed => &[],
        }
    }

    /// Checks that `from -> to` is in the lifecycle table.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::InvalidTransition` naming both statuses when
    /// the pair is not allowed, including any transition out of a terminal
    /// status and all self-transitions.
    pub fn validate_transition(
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> SchedulingResult<()> {
        if Self::allowed_transitions(from).contains(&to) {
            Ok(())
        } else {
            Err(SchedulingError::InvalidTransition { from, to })
        }
    }
}
