//! Booking orchestration.
//!
//! [`SchedulingService`] ties the calendar window, the availability engine
//! and the appointment repository together behind the narrow interface the
//! API layer consumes. The service is stateless between requests: every
//! decision re-reads current appointment state, so nothing here can act on a
//! stale view under concurrent bookings.

use crate::appointment::{Appointment, AppointmentStatus, AppointmentType, ContactInfo};
use crate::calendar::CalendarWindow;
use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::dashboard::AppointmentFilter;
use crate::error::{SchedulingError, SchedulingResult};
use crate::repository::{AppointmentRepository, NewAppointment};
use crate::slots::{format_slot_time, AvailabilityEngine, Slot};
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;

/// A booking submission, already parsed into domain types.
#[derive(Clone, Debug)]
pub struct BookingRequest {
    pub appointment_type: AppointmentType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub contact: ContactInfo,
    pub subject: Option<String>,
    pub notes: Option<String>,
}

/// Orchestrates slot queries, bookings and status changes.
#[derive(Clone)]
pub struct SchedulingService {
    cfg: Arc<CoreConfig>,
    repository: Arc<dyn AppointmentRepository>,
    engine: AvailabilityEngine,
    clock: Arc<dyn Clock>,
}

impl SchedulingService {
    /// Creates a service using the wall clock.
    pub fn new(cfg: Arc<CoreConfig>, repository: Arc<dyn AppointmentRepository>) -> Self {
        Self::with_clock(cfg, repository, Arc::new(SystemClock))
    }

    /// Creates a service with an injected clock, for deterministic tests.
    pub fn with_clock(
        cfg: Arc<CoreConfig>,
        repository: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let engine = AvailabilityEngine::new(cfg.clone());
        Self {
            cfg,
            repository,
            engine,
            clock,
        }
    }

    /// The booking window anchored at the clock's current date.
    pub fn calendar_window(&self) -> CalendarWindow {
        CalendarWindow::for_today(self.clock.today(), self.cfg.booking_window_months())
    }

    /// Bookable slots for `(date, appointment_type)`, in chronological order.
    ///
    /// Pure read: safe to retry and safe under unlimited concurrency. An
    /// empty vector means "no availability" and is a normal outcome.
    ///
    /// # Errors
    ///
    /// `SchedulingError::InvalidDate` for dates the window rejects;
    /// `RepositoryUnavailable` on storage failure.
    pub fn available_slots(
        &self,
        date: NaiveDate,
        appointment_type: AppointmentType,
    ) -> SchedulingResult<Vec<Slot>> {
        let window = self.calendar_window();
        self.engine
            .available_slots(self.repository.as_ref(), &window, date, appointment_type)
    }

    /// Creates a `pending` appointment for the requested slot.
    ///
    /// Validation order: the calendar window first, then grid membership of
    /// the time, then a fresh availability check. The final uniqueness
    /// decision happens inside the repository insert, so of two concurrent
    /// submissions for the same `(date, time, type)` exactly one succeeds
    /// and the other observes `SlotTaken`.
    ///
    /// # Errors
    ///
    /// `InvalidDate`, `InvalidTime`, `SlotTaken`, or
    /// `RepositoryUnavailable`.
    pub fn create_booking(&self, request: BookingRequest) -> SchedulingResult<Appointment> {
        let window = self.calendar_window();
        if let Some(rejection) = window.rejection(request.date) {
            return Err(SchedulingError::InvalidDate(rejection));
        }

        if !self
            .engine
            .is_grid_time(request.appointment_type, request.time)
        {
            return Err(SchedulingError::InvalidTime(format!(
                "{} is not a bookable {} slot",
                format_slot_time(request.time),
                request.appointment_type
            )));
        }

        // Close the race window between the client's slot query and this
        // submission: re-check availability before attempting the insert.
        let free = self.engine.available_slots(
            self.repository.as_ref(),
            &window,
            request.date,
            request.appointment_type,
        )?;
        if !free.iter().any(|slot| slot.time == request.time) {
            return Err(SchedulingError::SlotTaken {
                date: request.date,
                time: request.time,
                appointment_type: request.appointment_type,
            });
        }

        self.repository.insert_pending(NewAppointment {
            contact: request.contact,
            appointment_type: request.appointment_type,
            date: request.date,
            time: request.time,
            subject: request.subject,
            notes: request.notes,
        })
    }

    /// Applies a staff status change through the lifecycle state machine.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition`, or `RepositoryUnavailable`.
    pub fn update_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> SchedulingResult<Appointment> {
        self.repository.update_status(id, new_status)
    }

    /// Appointments for the staff dashboard, ordered by `(date, time)`.
    pub fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> SchedulingResult<Vec<Appointment>> {
        self.repository.list_all(filter)
    }

    /// Single appointment lookup.
    pub fn find_appointment(&self, id: Uuid) -> SchedulingResult<Option<Appointment>> {
        self.repository.find_by_id(id)
    }
}
