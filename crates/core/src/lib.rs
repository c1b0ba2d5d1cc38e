//! # RDV Core
//!
//! Core scheduling logic for the rendez-vous booking system:
//! - Calendar window and weekday/look-ahead validation
//! - Slot grids and availability computation per appointment type
//! - Booking lifecycle state machine (`pending -> confirmed/cancelled/completed`)
//! - File-backed appointment store with race-safe slot claiming
//! - Contact message intake
//!
//! **No API concerns**: HTTP servers, request parsing, or authentication
//! belong in `api-rest` and `api-shared`.

pub mod appointment;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod constants;
pub mod contact;
pub mod dashboard;
pub mod error;
pub mod repository;
pub mod scheduling;
pub mod slots;
pub mod state_machine;

pub use appointment::{Appointment, AppointmentStatus, AppointmentType, ContactInfo};
pub use calendar::{CalendarWindow, DateRejection};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BusinessHours, CoreConfig};
pub use contact::{ContactMessage, ContactMessageStore};
pub use dashboard::{AppointmentFilter, DashboardQuery};
pub use error::{SchedulingError, SchedulingResult, StoreError};
pub use rdv_types::{EmailAddress, NonEmptyText, TextError};
pub use repository::{AppointmentRepository, FileAppointmentStore, NewAppointment};
pub use scheduling::{BookingRequest, SchedulingService};
pub use slots::{AvailabilityEngine, Slot};
pub use state_machine::BookingStateMachine;
